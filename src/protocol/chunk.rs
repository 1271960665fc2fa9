//! # Payload Chunking
//!
//! Payloads larger than [`MAX_CHUNK_SIZE`] are sent as a run of packets, one
//! per chunk, numbered by a single-byte sequence field. That field caps a
//! logical command at [`MAX_CHUNKS`] packets (384 KiB of payload); anything
//! longer is refused up front instead of wrapping the counter.
//!
//! ```
//! use paperang::protocol::chunk::{split, MAX_CHUNK_SIZE};
//!
//! let payload = vec![0u8; MAX_CHUNK_SIZE + 1];
//! let chunks = split(&payload, MAX_CHUNK_SIZE);
//! assert_eq!(chunks.len(), 2);
//! assert_eq!(chunks[1].len(), 1);
//! ```

use crate::error::{PaperangError, Result};

/// Largest payload carried by a single packet (bytes)
pub const MAX_CHUNK_SIZE: usize = 1536;

/// Number of distinct values of the sequence field
pub const MAX_CHUNKS: usize = u8::MAX as usize + 1;

/// Split `payload` into ordered slices of at most `max_chunk_size` bytes.
///
/// The last slice may be shorter. An empty payload yields no slices, so a
/// command with an empty payload puts nothing on the wire. A bound of zero
/// is treated as one.
pub fn split(payload: &[u8], max_chunk_size: usize) -> Vec<&[u8]> {
    payload.chunks(max_chunk_size.max(1)).collect()
}

/// Number of chunks `split` produces for `len` bytes.
#[inline]
pub fn chunk_count(len: usize, max_chunk_size: usize) -> usize {
    len.div_ceil(max_chunk_size.max(1))
}

/// Split `payload` for transmission, refusing payloads the sequence field
/// cannot number.
pub fn split_for_transmission(payload: &[u8]) -> Result<Vec<&[u8]>> {
    let chunks = chunk_count(payload.len(), MAX_CHUNK_SIZE);
    if chunks > MAX_CHUNKS {
        return Err(PaperangError::SequenceOverflow { chunks });
    }
    Ok(split(payload, MAX_CHUNK_SIZE))
}

// ============================================================================
// TESTS
// ============================================================================
