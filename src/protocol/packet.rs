//! # Packet Framing
//!
//! One packet carries one chunk of a command's payload.
//!
//! ## Wire Layout
//!
//! All integers are little-endian.
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0 | 1 | Start marker `0x02` |
//! | 1 | 1 | Command code |
//! | 2 | 1 | Sequence number (chunk index) |
//! | 3 | 2 | Payload length |
//! | 5 | n | Payload |
//! | 5+n | 4 | CRC-32 of the payload, seeded with the session key |
//! | 9+n | 1 | End marker `0x03` |
//!
//! The checksum covers the payload only, never the header or markers.
//!
//! ## Example
//!
//! ```
//! use paperang::protocol::checksum::{checksum, STANDARD_KEY};
//! use paperang::protocol::packet::frame;
//!
//! let packet = frame(&[0x01, 0x02, 0x03], 0x21, 0, STANDARD_KEY)?;
//! assert_eq!(&packet[..5], &[0x02, 0x21, 0x00, 0x03, 0x00]);
//! assert_eq!(&packet[5..8], &[0x01, 0x02, 0x03]);
//! assert_eq!(&packet[8..12], &checksum(&[0x01, 0x02, 0x03], STANDARD_KEY).to_le_bytes());
//! assert_eq!(packet[12], 0x03);
//! # Ok::<(), paperang::PaperangError>(())
//! ```

use super::checksum::checksum;
use crate::error::{PaperangError, Result};

/// Start-of-packet marker
pub const START: u8 = 0x02;

/// End-of-packet marker
pub const END: u8 = 0x03;

/// Bytes before the payload: marker, command, sequence, length
pub const HEADER_LEN: usize = 5;

/// Bytes after the payload: checksum, marker
pub const TRAILER_LEN: usize = 5;

/// Build the wire packet for one payload chunk.
///
/// Fails with [`PaperangError::PayloadTooLarge`] if the chunk does not fit
/// the 16-bit length field.
pub fn frame(payload: &[u8], command: u8, sequence: u8, key: u32) -> Result<Vec<u8>> {
    let len = u16::try_from(payload.len())
        .map_err(|_| PaperangError::PayloadTooLarge(payload.len()))?;

    let mut packet = Vec::with_capacity(HEADER_LEN + payload.len() + TRAILER_LEN);
    packet.push(START);
    packet.push(command);
    packet.push(sequence);
    packet.extend_from_slice(&len.to_le_bytes());
    packet.extend_from_slice(payload);
    packet.extend_from_slice(&checksum(payload, key).to_le_bytes());
    packet.push(END);
    Ok(packet)
}

/// A decoded packet.
///
/// Used to inspect captured traffic; the driver itself never parses replies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub command: u8,
    pub sequence: u8,
    pub payload: Vec<u8>,
    pub checksum: u32,
}

impl Packet {
    /// Decode exactly one packet from `bytes`, verifying markers, length and
    /// the checksum under `key`.
    pub fn decode(bytes: &[u8], key: u32) -> Result<Self> {
        if bytes.len() < HEADER_LEN + TRAILER_LEN {
            return Err(PaperangError::InvalidPacket(format!(
                "{} bytes is shorter than an empty packet",
                bytes.len()
            )));
        }
        if bytes[0] != START {
            return Err(PaperangError::InvalidPacket(format!(
                "bad start marker 0x{:02x}",
                bytes[0]
            )));
        }

        let len = u16::from_le_bytes([bytes[3], bytes[4]]) as usize;
        if bytes.len() != HEADER_LEN + len + TRAILER_LEN {
            return Err(PaperangError::InvalidPacket(format!(
                "length field says {} payload bytes, packet has {}",
                len,
                bytes.len().saturating_sub(HEADER_LEN + TRAILER_LEN)
            )));
        }

        let end = bytes[bytes.len() - 1];
        if end != END {
            return Err(PaperangError::InvalidPacket(format!(
                "bad end marker 0x{:02x}",
                end
            )));
        }

        let payload = bytes[HEADER_LEN..HEADER_LEN + len].to_vec();
        let crc_at = HEADER_LEN + len;
        let received = u32::from_le_bytes([
            bytes[crc_at],
            bytes[crc_at + 1],
            bytes[crc_at + 2],
            bytes[crc_at + 3],
        ]);
        let expected = checksum(&payload, key);
        if received != expected {
            return Err(PaperangError::InvalidPacket(format!(
                "checksum 0x{:08x} does not match 0x{:08x}",
                received, expected
            )));
        }

        Ok(Self {
            command: bytes[1],
            sequence: bytes[2],
            payload,
            checksum: received,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::checksum::{SESSION_KEY, STANDARD_KEY};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_print_test_frame_bytes() {
        let packet = frame(&[0x01, 0x02, 0x03], 0x21, 0, STANDARD_KEY).unwrap();
        // crc32(b"\x01\x02\x03", 0x35769521) == 0xd96306a9
        assert_eq!(
            packet,
            vec![
                0x02, 0x21, 0x00, 0x03, 0x00, // header
                0x01, 0x02, 0x03, // payload
                0xA9, 0x06, 0x63, 0xD9, // checksum
                0x03, // end
            ]
        );
    }

    #[test]
    fn test_checksum_excludes_header() {
        let a = frame(b"abc", 0x01, 0, STANDARD_KEY).unwrap();
        let b = frame(b"abc", 0x2D, 7, STANDARD_KEY).unwrap();
        assert_eq!(&a[8..12], &b[8..12]);
    }

    #[test]
    fn test_length_is_little_endian() {
        let payload = vec![0u8; 0x0600];
        let packet = frame(&payload, 0x00, 3, STANDARD_KEY).unwrap();
        assert_eq!(&packet[..5], &[0x02, 0x00, 0x03, 0x00, 0x06]);
        assert_eq!(packet.len(), HEADER_LEN + 0x0600 + TRAILER_LEN);
    }

    #[test]
    fn test_empty_payload() {
        let packet = frame(&[], 0x1B, 0, SESSION_KEY).unwrap();
        assert_eq!(packet.len(), 10);
        assert_eq!(&packet[5..9], &SESSION_KEY.to_le_bytes());
    }

    #[test]
    fn test_oversized_payload_rejected() {
        let payload = vec![0u8; u16::MAX as usize + 1];
        assert!(matches!(
            frame(&payload, 0x00, 0, STANDARD_KEY),
            Err(PaperangError::PayloadTooLarge(65536))
        ));
    }

    #[test]
    fn test_decode_accepts_framed_packet() {
        let packet = frame(&[9, 8, 7, 6], 0x1A, 42, SESSION_KEY).unwrap();
        let decoded = Packet::decode(&packet, SESSION_KEY).unwrap();
        assert_eq!(decoded.command, 0x1A);
        assert_eq!(decoded.sequence, 42);
        assert_eq!(decoded.payload, vec![9, 8, 7, 6]);
    }

    #[test]
    fn test_decode_rejects_wrong_key() {
        let packet = frame(&[1], 0x1A, 0, STANDARD_KEY).unwrap();
        assert!(matches!(
            Packet::decode(&packet, SESSION_KEY),
            Err(PaperangError::InvalidPacket(_))
        ));
    }

    #[test]
    fn test_decode_rejects_malformed() {
        let packet = frame(&[1, 2], 0x1A, 0, STANDARD_KEY).unwrap();

        assert!(Packet::decode(&packet[..4], STANDARD_KEY).is_err());
        assert!(Packet::decode(&packet[..packet.len() - 1], STANDARD_KEY).is_err());

        let mut bad_start = packet.clone();
        bad_start[0] = 0xFF;
        assert!(Packet::decode(&bad_start, STANDARD_KEY).is_err());

        let mut bad_end = packet.clone();
        *bad_end.last_mut().unwrap() = 0x00;
        assert!(Packet::decode(&bad_end, STANDARD_KEY).is_err());
    }
}
