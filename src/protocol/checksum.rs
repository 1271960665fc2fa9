//! # Keyed CRC-32
//!
//! Every packet carries a CRC-32 of its payload. Instead of the usual zero
//! seed, the CRC register starts from a 32-bit key. Before the handshake the
//! key is the well-known [`STANDARD_KEY`]; afterwards it is the negotiated
//! [`SESSION_KEY`]. The firmware rejects packets checksummed with the wrong
//! key, so the key doubles as a lightweight session marker.
//!
//! ## Seed Semantics
//!
//! The seed is fed in as a *running* CRC value, i.e. the result equals what
//! zlib's `crc32(key, payload)` returns. An empty payload therefore
//! checksums to the key itself.
//!
//! ```
//! use paperang::protocol::checksum::{checksum, STANDARD_KEY};
//!
//! assert_eq!(checksum(b"", STANDARD_KEY), STANDARD_KEY);
//! assert_eq!(checksum(b"123456789", 0), 0xCBF4_3926);
//! ```

use crc32fast::Hasher;

/// Checksum key used until the handshake completes
pub const STANDARD_KEY: u32 = 0x3576_9521;

/// Key registered with the printer during the handshake
pub const SESSION_KEY: u32 = 0x0696_8634 ^ 0x002e_696d;

/// Compute the CRC-32 of `payload` with the register seeded from `key`.
#[inline]
pub fn checksum(payload: &[u8], key: u32) -> u32 {
    let mut hasher = Hasher::new_with_initial(key);
    hasher.update(payload);
    hasher.finalize()
}

/// Payload of the `SET_CRC_KEY` command announcing `key`.
///
/// The key travels XORed with the standard key, little-endian.
#[inline]
pub fn key_announcement(key: u32) -> [u8; 4] {
    (key ^ STANDARD_KEY).to_le_bytes()
}

/// # Checksum Key
///
/// Two-state value: the standard key before negotiation, the negotiated key
/// after. A session never moves from `Negotiated` back to `Standard`; it
/// drops the whole value on disconnect instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CrcKey {
    #[default]
    Standard,
    Negotiated(u32),
}

impl CrcKey {
    /// The seed value to feed the CRC register.
    pub fn value(self) -> u32 {
        match self {
            CrcKey::Standard => STANDARD_KEY,
            CrcKey::Negotiated(key) => key,
        }
    }

    pub fn is_negotiated(self) -> bool {
        matches!(self, CrcKey::Negotiated(_))
    }

    /// Checksum `payload` under this key.
    #[inline]
    pub fn checksum(self, payload: &[u8]) -> u32 {
        checksum(payload, self.value())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_seed_matches_standard_crc32() {
        assert_eq!(checksum(b"123456789", 0), 0xCBF4_3926);
        assert_eq!(checksum(b"123456789", 0), crc32fast::hash(b"123456789"));
    }

    #[test]
    fn test_empty_payload_returns_seed() {
        assert_eq!(checksum(&[], STANDARD_KEY), STANDARD_KEY);
        assert_eq!(checksum(&[], SESSION_KEY), SESSION_KEY);
    }

    #[test]
    fn test_deterministic() {
        let payload = [0x01, 0x02, 0x03, 0xFF];
        assert_eq!(
            checksum(&payload, STANDARD_KEY),
            checksum(&payload, STANDARD_KEY)
        );
    }

    #[test]
    fn test_key_changes_checksum() {
        let payloads: [&[u8]; 4] = [b"\x00", b"\x01\x02\x03", b"paperang", &[0xAA; 1536]];
        for payload in payloads {
            assert_ne!(
                checksum(payload, STANDARD_KEY),
                checksum(payload, SESSION_KEY),
                "payload {:02x?}",
                &payload[..payload.len().min(8)]
            );
        }
    }

    #[test]
    fn test_seed_continues_running_crc() {
        // Seeding with the CRC of a prefix is the same as hashing prefix + suffix
        let prefix = checksum(b"hello ", 0);
        assert_eq!(checksum(b"world", prefix), checksum(b"hello world", 0));
    }

    #[test]
    fn test_session_key_value() {
        assert_eq!(SESSION_KEY, 0x6968634 ^ 0x2e696d);
        assert_eq!(SESSION_KEY, 0x06B8_EF59);
    }

    #[test]
    fn test_key_announcement() {
        let payload = key_announcement(SESSION_KEY);
        assert_eq!(u32::from_le_bytes(payload) ^ STANDARD_KEY, SESSION_KEY);
        assert_eq!(payload, (0x06B8_EF59u32 ^ 0x3576_9521).to_le_bytes());
    }

    #[test]
    fn test_crc_key_states() {
        assert_eq!(CrcKey::default(), CrcKey::Standard);
        assert_eq!(CrcKey::Standard.value(), STANDARD_KEY);
        assert!(!CrcKey::Standard.is_negotiated());

        let negotiated = CrcKey::Negotiated(SESSION_KEY);
        assert_eq!(negotiated.value(), SESSION_KEY);
        assert!(negotiated.is_negotiated());
        assert_eq!(negotiated.checksum(b"abc"), checksum(b"abc", SESSION_KEY));
    }
}
