//! # Paperang - Pocket Thermal Printer Library
//!
//! Paperang is a Rust library for printing on Paperang pocket thermal
//! printers over Bluetooth. It provides:
//!
//! - **Protocol implementation**: packet framing, keyed CRC-32, chunking,
//!   command catalog
//! - **Session**: connection lifecycle and the checksum-key handshake
//! - **Raster encoding**: image to 1-bit bitstream (threshold or Atkinson)
//! - **Transport**: Bluetooth RFCOMM sockets
//!
//! ## Quick Start
//!
//! ```no_run
//! use paperang::{Printer, PrinterConfig, raster::Conversion};
//!
//! let mut printer = Printer::new(Some("00:15:83:12:34:56".to_string()), PrinterConfig::P1);
//! printer.connect()?;
//! printer.print_image("cat.png", Conversion::Dither)?;
//! printer.session_mut().feed_line(1)?;
//!
//! # Ok::<(), paperang::PaperangError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`protocol`] | Wire format and command catalog |
//! | [`printer`] | Session, device operations, print jobs |
//! | [`transport`] | Communication backends |
//! | [`raster`] | Image encoding |
//! | [`settings`] | JSON settings file |
//! | [`hooks`] | Post-print hooks |
//! | [`error`] | Error types |
//!
//! ## Supported Printers
//!
//! Currently tested with:
//! - Paperang P1 (57mm paper, 384 dots, Bluetooth)

pub mod error;
pub mod hooks;
pub mod printer;
pub mod protocol;
pub mod raster;
pub mod settings;
pub mod transport;

// Re-exports for convenience
pub use error::PaperangError;
pub use printer::{Printer, PrinterConfig, Session, State};
pub use settings::Settings;
pub use transport::BluetoothConnector;
