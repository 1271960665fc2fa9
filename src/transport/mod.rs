//! # Printer Transport Layer
//!
//! This module provides the byte pipe a [`crate::printer::Session`] talks
//! through.
//!
//! ## Available Transports
//!
//! - [`bluetooth`]: Bluetooth RFCOMM socket (Linux)
//!
//! A session is generic over [`Connector`], so tests and alternative links
//! can stand in for the Bluetooth socket.

use std::io;
use std::time::Duration;

pub mod bluetooth;

pub use bluetooth::{BluetoothConnector, RfcommSocket};

/// An open, exclusively owned link to one printer.
pub trait Transport {
    /// Write all of `data`.
    fn send(&mut self, data: &[u8]) -> io::Result<()>;

    /// Block for one read of at most `max_len` bytes.
    ///
    /// A receive timeout surfaces as an error of kind
    /// [`io::ErrorKind::TimedOut`].
    fn recv(&mut self, max_len: usize) -> io::Result<Vec<u8>>;

    /// Shut the link down. Any blocked read is aborted.
    fn close(&mut self) -> io::Result<()>;
}

/// Opens [`Transport`] links to a remote address.
pub trait Connector {
    type Link: Transport;

    fn connect(&self, address: &str, channel: u8, recv_timeout: Duration) -> io::Result<Self::Link>;
}
