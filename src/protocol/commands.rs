//! # Paperang Command Catalog
//!
//! Every logical operation the driver issues maps to one command code and
//! one payload-encoding rule. The catalog is fixed data: [`Command`] names the
//! code, [`PayloadRule`] describes the payload shape, and the builder
//! functions below turn arguments into a ready-to-dispatch [`Request`].
//!
//! ## Catalog
//!
//! | Operation | Code | Payload | Reply |
//! |-----------|------|---------|-------|
//! | Set CRC key | `0x19` | u32, key XOR standard key | yes |
//! | Set paper type | `0x2D` | u8 (default 0) | yes |
//! | Set power-off time | `0x1F` | u16 (default 0) | yes |
//! | Print data | `0x00` | raw 1-bit bitstream | **no** |
//! | Print self-test page | `0x21` | u8, fixed 0 | yes |
//! | Set heat density | `0x1A` | u8 | yes |
//! | Feed line | `0x1B` | u16 line count | yes |
//! | Feed to head line | `0x22` | u16 | yes |
//! | Query battery | `0x11` | u8, fixed 1 | yes |
//! | Query heat density | `0x1D` | u8, fixed 1 | yes |
//! | Query power-off time | `0x20` | u8, fixed 1 | yes |
//! | Query serial number | `0x0B` | u8, fixed 1 | yes |
//! | Query hardware info | `0x26` | u8, fixed 1 | yes |
//!
//! ## Byte Order
//!
//! Multi-byte integers use **little-endian** encoding.
//!
//! ## Print Data and Replies
//!
//! The printer does not acknowledge individual print-data packets. Print
//! data is sent without waiting, and the caller follows it with a feed line,
//! whose reply marks the end of the job.
//!
//! ```
//! use paperang::protocol::commands::{self, Command};
//!
//! let request = commands::feed_line(300);
//! assert_eq!(request.command, Command::FeedLine);
//! assert_eq!(request.payload, vec![0x2C, 0x01]);
//! assert!(request.await_reply);
//!
//! assert!(!commands::print_data(vec![0xFF; 48]).await_reply);
//! ```

use super::checksum::key_announcement;

/// Command codes understood by the printer firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Command {
    PrintData = 0x00,
    GetSerialNumber = 0x0B,
    GetBatteryStatus = 0x11,
    SetCrcKey = 0x19,
    SetHeatDensity = 0x1A,
    FeedLine = 0x1B,
    GetHeatDensity = 0x1D,
    SetPowerOffTime = 0x1F,
    GetPowerOffTime = 0x20,
    PrintTestPage = 0x21,
    FeedToHeadLine = 0x22,
    GetHardwareInfo = 0x26,
    SetPaperType = 0x2D,
}

/// Shape of a command's payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadRule {
    /// One unsigned byte
    U8,
    /// Unsigned 16-bit little-endian integer
    U16,
    /// Unsigned 32-bit little-endian integer
    U32,
    /// Opaque bytes of any length
    Raw,
}

impl PayloadRule {
    /// Fixed payload length, or `None` for raw payloads.
    pub fn len(self) -> Option<usize> {
        match self {
            PayloadRule::U8 => Some(1),
            PayloadRule::U16 => Some(2),
            PayloadRule::U32 => Some(4),
            PayloadRule::Raw => None,
        }
    }

    /// Whether `payload` has the shape this rule describes.
    pub fn accepts(self, payload: &[u8]) -> bool {
        self.len().is_none_or(|len| payload.len() == len)
    }
}

impl Command {
    /// Every command in the catalog.
    pub const ALL: [Command; 13] = [
        Command::PrintData,
        Command::GetSerialNumber,
        Command::GetBatteryStatus,
        Command::SetCrcKey,
        Command::SetHeatDensity,
        Command::FeedLine,
        Command::GetHeatDensity,
        Command::SetPowerOffTime,
        Command::GetPowerOffTime,
        Command::PrintTestPage,
        Command::FeedToHeadLine,
        Command::GetHardwareInfo,
        Command::SetPaperType,
    ];

    /// The 8-bit code sent in the packet header.
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn payload_rule(self) -> PayloadRule {
        match self {
            Command::PrintData => PayloadRule::Raw,
            Command::SetCrcKey => PayloadRule::U32,
            Command::SetPowerOffTime | Command::FeedLine | Command::FeedToHeadLine => {
                PayloadRule::U16
            }
            Command::GetSerialNumber
            | Command::GetBatteryStatus
            | Command::SetHeatDensity
            | Command::GetHeatDensity
            | Command::GetPowerOffTime
            | Command::PrintTestPage
            | Command::GetHardwareInfo
            | Command::SetPaperType => PayloadRule::U8,
        }
    }

    /// Whether dispatching this command reads a reply by default.
    pub fn awaits_reply(self) -> bool {
        !matches!(self, Command::PrintData)
    }

    /// Look a command up by its wire code.
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }

    /// Short lowercase name for logs.
    pub fn name(self) -> &'static str {
        match self {
            Command::PrintData => "print_data",
            Command::GetSerialNumber => "get_serial_number",
            Command::GetBatteryStatus => "get_battery_status",
            Command::SetCrcKey => "set_crc_key",
            Command::SetHeatDensity => "set_heat_density",
            Command::FeedLine => "feed_line",
            Command::GetHeatDensity => "get_heat_density",
            Command::SetPowerOffTime => "set_power_off_time",
            Command::GetPowerOffTime => "get_power_off_time",
            Command::PrintTestPage => "print_test_page",
            Command::FeedToHeadLine => "feed_to_head_line",
            Command::GetHardwareInfo => "get_hardware_info",
            Command::SetPaperType => "set_paper_type",
        }
    }
}

impl From<Command> for u8 {
    fn from(command: Command) -> u8 {
        command.code()
    }
}

/// One logical command, ready to be chunked and framed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub command: Command,
    pub payload: Vec<u8>,
    /// Read one reply after the last chunk
    pub await_reply: bool,
}

impl Request {
    /// Build a request with the command's default reply behaviour.
    pub fn new(command: Command, payload: Vec<u8>) -> Self {
        debug_assert!(
            command.payload_rule().accepts(&payload),
            "{} payload of {} bytes",
            command.name(),
            payload.len()
        );
        Self {
            command,
            payload,
            await_reply: command.awaits_reply(),
        }
    }

    /// Override whether a reply is read after the last chunk.
    pub fn await_reply(mut self, await_reply: bool) -> Self {
        self.await_reply = await_reply;
        self
    }
}

/// Payload byte carried by every query command
const QUERY: u8 = 1;

// ============================================================================
// SETTINGS
// ============================================================================

/// Register `key` as the session's checksum key.
#[inline]
pub fn set_crc_key(key: u32) -> Request {
    Request::new(Command::SetCrcKey, key_announcement(key).to_vec())
}

/// Select the paper type (0 is continuous thermal roll).
#[inline]
pub fn set_paper_type(paper_type: u8) -> Request {
    Request::new(Command::SetPaperType, vec![paper_type])
}

/// Set the idle time before the printer powers itself off (0 disables).
#[inline]
pub fn set_power_off_time(time: u16) -> Request {
    Request::new(Command::SetPowerOffTime, time.to_le_bytes().to_vec())
}

/// Set the print head heat density.
#[inline]
pub fn set_heat_density(density: u8) -> Request {
    Request::new(Command::SetHeatDensity, vec![density])
}

// ============================================================================
// PRINTING AND PAPER
// ============================================================================

/// Print a 1-bit raster bitstream.
///
/// The bitstream is sent as-is; the printer does not reply to it.
#[inline]
pub fn print_data(bitstream: Vec<u8>) -> Request {
    Request::new(Command::PrintData, bitstream)
}

/// Print the built-in self-test page.
#[inline]
pub fn print_test_page() -> Request {
    Request::new(Command::PrintTestPage, vec![0])
}

/// Advance the paper by `lines` dot lines.
#[inline]
pub fn feed_line(lines: u16) -> Request {
    Request::new(Command::FeedLine, lines.to_le_bytes().to_vec())
}

/// Feed so that the last printed line clears the tear bar.
#[inline]
pub fn feed_to_head_line(lines: u16) -> Request {
    Request::new(Command::FeedToHeadLine, lines.to_le_bytes().to_vec())
}

// ============================================================================
// QUERIES
// ============================================================================

#[inline]
pub fn query_battery_status() -> Request {
    Request::new(Command::GetBatteryStatus, vec![QUERY])
}

#[inline]
pub fn query_heat_density() -> Request {
    Request::new(Command::GetHeatDensity, vec![QUERY])
}

#[inline]
pub fn query_power_off_time() -> Request {
    Request::new(Command::GetPowerOffTime, vec![QUERY])
}

#[inline]
pub fn query_serial_number() -> Request {
    Request::new(Command::GetSerialNumber, vec![QUERY])
}

#[inline]
pub fn query_hardware_info() -> Request {
    Request::new(Command::GetHardwareInfo, vec![QUERY])
}

// ============================================================================
// TESTS
// ============================================================================
