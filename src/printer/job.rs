//! # Print Jobs
//!
//! A [`Printer`] wraps a [`Session`] with the device geometry and runs whole
//! jobs:
//!
//! ```text
//! SET_PAPER_TYPE → PRINT_DATA (no reply) → FEED_LINE padding (reply)
//! ```
//!
//! Print data is never acknowledged, so the trailing feed line doubles as
//! the end-of-job fence: its reply arrives once the printer has consumed
//! the bitstream.

use std::path::Path;

use log::{info, warn};

use super::config::PrinterConfig;
use super::session::Session;
use crate::error::Result;
use crate::raster::{self, Bitmap, Conversion};
use crate::transport::{BluetoothConnector, Connector};

/// Session plus device geometry.
pub struct Printer<C: Connector = BluetoothConnector> {
    session: Session<C>,
    config: PrinterConfig,
    paper_type: u8,
}

impl Printer<BluetoothConnector> {
    pub fn new(address: Option<String>, config: PrinterConfig) -> Self {
        Self::with_session(Session::new(address), config)
    }
}

impl<C: Connector> Printer<C> {
    pub fn with_session(session: Session<C>, config: PrinterConfig) -> Self {
        Self {
            session,
            config,
            paper_type: 0,
        }
    }

    /// Paper type sent at the start of each job (default 0).
    pub fn with_paper_type(mut self, paper_type: u8) -> Self {
        self.paper_type = paper_type;
        self
    }

    pub fn config(&self) -> &PrinterConfig {
        &self.config
    }

    pub fn session(&self) -> &Session<C> {
        &self.session
    }

    /// Direct access for one-off commands (density, queries, ...).
    pub fn session_mut(&mut self) -> &mut Session<C> {
        &mut self.session
    }

    pub fn connect(&mut self) -> Result<()> {
        self.session.connect()
    }

    pub fn disconnect(&mut self) {
        self.session.disconnect();
    }

    /// Print a ready-made bitstream and feed the padding lines.
    ///
    /// Returns the reply to the padding feed.
    pub fn print_bitstream(&mut self, bitstream: Vec<u8>) -> Result<Vec<u8>> {
        self.session.set_paper_type(self.paper_type)?;
        self.session.print_data(bitstream)?;
        self.session.feed_line(self.config.padding_lines)
    }

    /// Print a packed bitmap.
    pub fn print_bitmap(&mut self, bitmap: Bitmap) -> Result<Vec<u8>> {
        if bitmap.width != self.config.width_dots as usize {
            warn!(
                "Bitmap is {} dots wide, {} prints {} dots per line",
                bitmap.width, self.config.name, self.config.width_dots
            );
        }
        info!("Printing {}x{} bitmap", bitmap.width, bitmap.height);
        self.print_bitstream(bitmap.into_bitstream())
    }

    /// Load, encode and print an image file at the configured width.
    pub fn print_image<P: AsRef<Path>>(&mut self, path: P, conversion: Conversion) -> Result<Vec<u8>> {
        let image = raster::load_image(path)?;
        let bitmap = raster::encode_image(&image, self.config.width_dots as u32, conversion);
        self.print_bitmap(bitmap)
    }

    /// Print the built-in self-test page.
    pub fn print_self_test(&mut self) -> Result<Vec<u8>> {
        info!("Attempting test print...");
        self.session.print_test_page()
    }
}
