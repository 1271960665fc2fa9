//! # Printer Configuration
//!
//! This module defines hardware specifications for supported thermal printers.
//!
//! ## Supported Printers
//!
//! | Model | Width (dots) | Resolution | Padding feed |
//! |-------|--------------|------------|--------------|
//! | Paperang P1 | 384 | 203 DPI | 300 lines |
//!
//! ## Usage
//!
//! ```
//! use paperang::printer::PrinterConfig;
//!
//! let config = PrinterConfig::P1;
//! println!("Print width: {} dots ({} bytes)",
//!          config.width_dots,
//!          config.width_bytes);
//! ```

/// # Printer Configuration
///
/// Defines the hardware characteristics of a thermal printer.
///
/// ## Physical Properties
///
/// - **width_dots**: Printable width in dots; every bitstream row has this many pixels
/// - **width_bytes**: Width in bytes (width_dots / 8)
/// - **dpi**: Resolution in dots per inch
///
/// ## Job Tuning
///
/// - **padding_lines**: Dot lines fed after print data so the image clears the tear bar
///
/// ## Calculations
///
/// ```text
/// dots_per_mm = dpi / 25.4
/// width_mm = width_dots / dots_per_mm
///
/// For P1:
///   dots_per_mm = 203 / 25.4 ≈ 8
///   width_mm = 384 / 8 = 48mm
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrinterConfig {
    /// Printer model name
    pub name: &'static str,

    /// Print width in dots (pixels)
    pub width_dots: u16,

    /// Print width in bytes (width_dots / 8)
    pub width_bytes: u16,

    /// Resolution in dots per inch
    pub dpi: u16,

    /// Lines fed after each image
    pub padding_lines: u16,
}

impl PrinterConfig {
    /// # Paperang P1 Configuration
    ///
    /// 57mm paper width pocket thermal printer.
    ///
    /// | Property | Value |
    /// |----------|-------|
    /// | Paper width | 57mm |
    /// | Print width | 48mm (384 dots) |
    /// | Resolution | 203 DPI |
    /// | Interface | Bluetooth SPP |
    pub const P1: Self = Self {
        name: "Paperang P1",
        width_dots: 384,
        width_bytes: 48,
        dpi: 203,
        padding_lines: 300,
    };

    /// A copy of this configuration with a different print width.
    ///
    /// Widths are rounded up to whole bytes (at most 65528 dots).
    pub fn with_width(self, width_dots: u16) -> Self {
        let width_bytes = width_dots.div_ceil(8).min(u16::MAX / 8);
        Self {
            width_dots: width_bytes * 8,
            width_bytes,
            ..self
        }
    }

    /// Calculate dots per millimeter
    ///
    /// ## Example
    ///
    /// ```
    /// use paperang::printer::PrinterConfig;
    ///
    /// let config = PrinterConfig::P1;
    /// assert!((config.dots_per_mm() - 8.0).abs() < 0.1);
    /// ```
    #[inline]
    pub fn dots_per_mm(&self) -> f32 {
        self.dpi as f32 / 25.4
    }

    /// Calculate print width in millimeters
    #[inline]
    pub fn width_mm(&self) -> f32 {
        self.width_dots as f32 / self.dots_per_mm()
    }

    /// Convert millimeters to dots (saturating at `u16::MAX`)
    #[inline]
    pub fn mm_to_dots(&self, mm: f32) -> u16 {
        (mm * self.dots_per_mm()).round() as u16
    }
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self::P1
    }
}

// ============================================================================
// TESTS
// ============================================================================
