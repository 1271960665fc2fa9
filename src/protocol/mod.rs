//! # Paperang Wire Protocol
//!
//! This module provides the byte-level pieces of the Paperang Bluetooth
//! protocol. Nothing here touches a socket; [`crate::printer::Session`]
//! strings the pieces together.
//!
//! ## Module Structure
//!
//! - [`commands`]: Command codes, payload rules, request builders
//! - [`chunk`]: Splitting payloads into packet-sized chunks
//! - [`packet`]: Packet framing (`0x02 .. 0x03`)
//! - [`checksum`]: Keyed CRC-32 and the session key
//!
//! ## Usage Example
//!
//! ```
//! use paperang::protocol::{checksum::STANDARD_KEY, chunk, commands, packet};
//!
//! let request = commands::set_heat_density(5);
//! let mut wire = Vec::new();
//! for (seq, chunk) in chunk::split_for_transmission(&request.payload)?.into_iter().enumerate() {
//!     wire.extend(packet::frame(chunk, request.command.code(), seq as u8, STANDARD_KEY)?);
//! }
//! assert_eq!(wire.len(), 11);
//! # Ok::<(), paperang::PaperangError>(())
//! ```

pub mod checksum;
pub mod chunk;
pub mod commands;
pub mod packet;

pub use checksum::CrcKey;
pub use commands::{Command, PayloadRule, Request};
pub use packet::Packet;
