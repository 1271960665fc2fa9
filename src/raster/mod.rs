//! # Raster Encoding
//!
//! Turns images into the 1-bit bitstream carried by the print-data command.
//! The protocol layer treats the result as opaque bytes.
//!
//! - [`dither`]: Thresholding, Atkinson dithering and bit packing
//! - [`edge`]: Canny edge outlines
//!
//! ## Pipeline
//!
//! ```text
//! image file → grayscale → resize to print width → 1-bit → MSB-first rows
//! ```
//!
//! ```
//! use image::{DynamicImage, GrayImage, Luma};
//! use paperang::raster::{encode_image, Conversion};
//!
//! let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(8, 2, Luma([0])));
//! let bitmap = encode_image(&img, 16, Conversion::Threshold);
//! assert_eq!((bitmap.width, bitmap.height), (16, 4));
//! assert!(bitmap.data.iter().all(|&b| b == 0xFF));
//! ```

pub mod dither;
pub mod edge;

use std::path::Path;

use image::{DynamicImage, imageops::FilterType};
use log::debug;

use crate::error::{PaperangError, Result};

/// How grayscale is reduced to black and white
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Conversion {
    /// Li threshold; crisp text and line art
    #[default]
    Threshold,
    /// Atkinson error diffusion; photos
    Dither,
    /// Canny edges only; outline drawings of photos
    Edge,
}

/// A packed 1-bit image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    /// Width in pixels
    pub width: usize,
    /// Height in rows
    pub height: usize,
    /// `ceil(width / 8) * height` bytes, MSB-first, 1 = black
    pub data: Vec<u8>,
}

impl Bitmap {
    pub fn width_bytes(&self) -> usize {
        self.width.div_ceil(8)
    }

    /// The bitstream payload for the print-data command.
    pub fn into_bitstream(self) -> Vec<u8> {
        self.data
    }
}

/// Open an image file in any format the `image` crate decodes.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<DynamicImage> {
    let path = path.as_ref();
    image::open(path)
        .map_err(|e| PaperangError::Image(format!("Failed to open {}: {}", path.display(), e)))
}

/// Scale `image` to `width` pixels (keeping its aspect ratio) and convert to
/// a 1-bit bitmap.
pub fn encode_image(image: &DynamicImage, width: u32, conversion: Conversion) -> Bitmap {
    let (src_w, src_h) = (image.width().max(1), image.height());
    let height = ((width as f64 / src_w as f64) * src_h as f64).round().max(1.0) as u32;

    let gray = image
        .resize_exact(width, height, FilterType::Lanczos3)
        .to_luma8();
    let (width, height) = (width as usize, height as usize);
    let pixels = gray.as_raw();

    let data = match conversion {
        Conversion::Threshold => {
            let threshold = dither::li_threshold(pixels);
            debug!("Li threshold {}", threshold);
            dither::threshold_rows(pixels, width, threshold)
        }
        Conversion::Dither => dither::atkinson(pixels, width, height),
        Conversion::Edge => edge::canny_edges(&gray),
    };

    Bitmap {
        width,
        height,
        data,
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage};

    #[test]
    fn test_resize_keeps_aspect_ratio() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(100, 50, Rgb([255, 255, 255])));
        let bitmap = encode_image(&img, 384, Conversion::Threshold);
        assert_eq!(bitmap.width, 384);
        assert_eq!(bitmap.height, 192);
        assert_eq!(bitmap.width_bytes(), 48);
        assert_eq!(bitmap.data.len(), 48 * 192);
    }

    #[test]
    fn test_white_image_prints_nothing() {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(40, 40, Luma([255])));
        for conversion in [Conversion::Threshold, Conversion::Dither, Conversion::Edge] {
            let bitmap = encode_image(&img, 64, conversion);
            assert!(bitmap.data.iter().all(|&b| b == 0), "{:?}", conversion);
        }
    }

    #[test]
    fn test_half_black_image_threshold() {
        // Left half black, right half white
        let img = GrayImage::from_fn(16, 4, |x, _| if x < 8 { Luma([0]) } else { Luma([255]) });
        let bitmap = encode_image(&DynamicImage::ImageLuma8(img), 16, Conversion::Threshold);
        assert_eq!(bitmap.height, 4);
        for row in bitmap.data.chunks(2) {
            assert_eq!(row, &[0xFF, 0x00]);
        }
    }

    #[test]
    fn test_tiny_image_gets_one_row() {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(1000, 1, Luma([0])));
        let bitmap = encode_image(&img, 8, Conversion::Dither);
        assert_eq!(bitmap.height, 1);
        assert_eq!(bitmap.into_bitstream(), vec![0xFF]);
    }

    #[test]
    fn test_edge_outlines_stripe() {
        // Vertical black stripe in the middle of a white image
        let img = GrayImage::from_fn(64, 32, |x, _| {
            if (24..40).contains(&x) { Luma([0]) } else { Luma([255]) }
        });
        let bitmap = encode_image(&DynamicImage::ImageLuma8(img), 64, Conversion::Edge);
        assert_eq!((bitmap.width, bitmap.height), (64, 32));

        let middle = &bitmap.data[16 * 8..17 * 8];
        // Dots near the stripe's sides, none at the far left and right
        assert!(middle.iter().any(|&b| b != 0));
        assert_eq!(middle[0], 0);
        assert_eq!(middle[7], 0);
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_image("/nonexistent/paperang.png");
        assert!(matches!(result, Err(PaperangError::Image(_))));
    }
}
