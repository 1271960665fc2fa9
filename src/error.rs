//! # Error Types
//!
//! This module defines error types used throughout the paperang library.
//!
//! No operation is retried internally. Write and read failures leave the
//! session in an indeterminate state; callers should disconnect and
//! reconnect before issuing further commands.

use std::io;

use thiserror::Error;

/// Main error type for paperang operations
#[derive(Debug, Error)]
pub enum PaperangError {
    /// `connect` was called on a session that has no remote address
    #[error("Bluetooth address is required to connect")]
    AddressMissing,

    /// Socket creation or connect failed
    #[error("Failed to connect: {0}")]
    ConnectFailed(String),

    /// A command was issued while the session had no open socket
    #[error("Not connected to any device")]
    NotConnected,

    /// Writing a packet to the socket failed
    #[error("Write failed: {0}")]
    Write(#[source] io::Error),

    /// Reading a reply failed (includes receive timeout)
    #[error("Read failed: {0}")]
    Read(#[source] io::Error),

    /// Payload needs more chunks than the 1-byte sequence field can number
    #[error("Payload needs {chunks} chunks, the sequence field allows at most 256")]
    SequenceOverflow { chunks: usize },

    /// A single packet payload does not fit the 16-bit length field
    #[error("Packet payload of {0} bytes exceeds the length field")]
    PayloadTooLarge(usize),

    /// Malformed Bluetooth address
    #[error("Invalid Bluetooth address: {0}")]
    InvalidAddress(String),

    /// Bytes that do not form a well-formed packet
    #[error("Invalid packet: {0}")]
    InvalidPacket(String),

    /// Image loading or conversion error
    #[error("Image error: {0}")]
    Image(String),

    /// Settings file could not be read or parsed
    #[error("Settings error: {0}")]
    Settings(String),

    /// Hook discovery or execution error
    #[error("Hook error: {0}")]
    Hook(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, PaperangError>;
