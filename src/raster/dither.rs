//! # Grayscale to 1-bit Conversion
//!
//! Thermal printers can only print black or white. This module turns an
//! 8-bit grayscale raster (0 = black, 255 = white) into packed 1-bit rows.
//!
//! ## Methods
//!
//! | Method | Speed | Quality | Artifacts |
//! |--------|-------|---------|-----------|
//! | Threshold (Li) | Fastest | Good for line art | Banding in photos |
//! | Atkinson | Slower | Good for photos | Lighter shadows |
//!
//! ## Li Threshold
//!
//! Minimum cross-entropy thresholding. Starting from the mean, the
//! threshold is refined until it stops moving:
//!
//! ```text
//! t' = (mean_below - mean_above) / (ln(mean_below) - ln(mean_above))
//! ```
//!
//! ## Atkinson Dithering
//!
//! Error diffusion that spreads 6/8 of the quantization error; the remaining
//! quarter is dropped, which keeps highlights clean on thermal paper:
//!
//! ```text
//!         X   1/8 1/8
//!   1/8  1/8  1/8
//!        1/8
//! ```
//!
//! ## Bit Packing
//!
//! - Bit 7 (MSB) = leftmost pixel
//! - 1 = black (print dot), 0 = white (no dot)
//! - Rows are padded with white to a whole byte
//!
//! ```
//! use paperang::raster::dither::pack_row;
//!
//! let row = vec![true, true, false, false, true, false, true, false];
//! assert_eq!(pack_row(&row), vec![0b11001010]);
//! ```

use rayon::prelude::*;

/// Gray level at or above which Atkinson output stays white
pub const DITHER_THRESHOLD: i32 = 127;

/// Threshold used for images with a single gray level
const MID_GRAY: u8 = 128;

/// Stop refining the Li threshold once it moves less than this
const LI_TOLERANCE: f64 = 0.5;

const LI_MAX_ITERATIONS: usize = 256;

/// Pack a row of boolean pixel values into bytes.
///
/// If the row length is not a multiple of 8, the last byte is padded
/// with zeros (white) on the right.
pub fn pack_row(pixels: &[bool]) -> Vec<u8> {
    let num_bytes = pixels.len().div_ceil(8);
    let mut bytes = vec![0u8; num_bytes];

    for (i, &pixel) in pixels.iter().enumerate() {
        if pixel {
            bytes[i / 8] |= 0x80 >> (i % 8);
        }
    }

    bytes
}

/// Li's minimum cross-entropy threshold for a grayscale buffer.
///
/// Pixels strictly darker than the result print black.
pub fn li_threshold(gray: &[u8]) -> u8 {
    let mut histogram = [0u64; 256];
    for &g in gray {
        histogram[g as usize] += 1;
    }

    // Shift levels by one so ln() stays finite for black pixels
    let mean_of = |range: std::ops::RangeInclusive<usize>| -> Option<f64> {
        let (count, sum) = range.fold((0u64, 0f64), |(count, sum), level| {
            let n = histogram[level];
            (count + n, sum + n as f64 * (level as f64 + 1.0))
        });
        (count > 0).then(|| sum / count as f64)
    };

    let Some(mut t) = mean_of(0..=255) else {
        return MID_GRAY;
    };

    for _ in 0..LI_MAX_ITERATIONS {
        let split = (t.floor() as usize).min(255);
        let (Some(below), Some(above)) = (mean_of(0..=split), mean_of(split + 1..=255)) else {
            // A single gray level; split at mid-gray instead
            return MID_GRAY;
        };
        let next = (below - above) / (below.ln() - above.ln());
        let done = (next - t).abs() < LI_TOLERANCE;
        t = next;
        if done {
            break;
        }
    }

    // Undo the shift; a pixel at the threshold level stays white
    (t - 1.0).round().clamp(0.0, 255.0) as u8
}

/// Threshold every row of `gray` and pack it. Rows are processed in parallel.
pub fn threshold_rows(gray: &[u8], width: usize, threshold: u8) -> Vec<u8> {
    if width == 0 {
        return Vec::new();
    }
    gray.par_chunks(width)
        .flat_map_iter(|row| {
            let pixels: Vec<bool> = row.iter().map(|&g| g < threshold).collect();
            pack_row(&pixels)
        })
        .collect()
}

/// Atkinson-dither `gray` (`width` × `height`) and pack the rows.
pub fn atkinson(gray: &[u8], width: usize, height: usize) -> Vec<u8> {
    let mut levels: Vec<i32> = gray.iter().map(|&g| g as i32).collect();
    let mut data = Vec::with_capacity(width.div_ceil(8) * height);
    let mut row_pixels = vec![false; width];

    for y in 0..height {
        for x in 0..width {
            let value = levels[y * width + x];
            let (black, error) = if value >= DITHER_THRESHOLD {
                (false, value - 255)
            } else {
                (true, value)
            };
            row_pixels[x] = black;

            let share = error / 8;
            let neighbours = [
                (x + 1, y, x + 1 < width),
                (x + 2, y, x + 2 < width),
                (x.wrapping_sub(1), y + 1, x > 0 && y + 1 < height),
                (x, y + 1, y + 1 < height),
                (x + 1, y + 1, x + 1 < width && y + 1 < height),
                (x, y + 2, y + 2 < height),
            ];
            for (nx, ny, inside) in neighbours {
                if inside {
                    levels[ny * width + nx] += share;
                }
            }
        }
        data.extend(pack_row(&row_pixels));
    }

    data
}

// ============================================================================
// TESTS
// ============================================================================
