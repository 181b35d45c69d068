//! Marker-byte padding to the AES block size.
//!
//! `pad` appends `0x80` and zero-fills to the next block boundary, so every
//! input grows by 1..=16 bytes and a block-aligned input gains a full block.

use super::BLOCK_SIZE;
use crate::error::CryptoError;

const MARKER: u8 = 0x80;

/// Pad data out to a whole number of blocks.
pub fn pad(data: &[u8]) -> Vec<u8> {
    let padding = BLOCK_SIZE - data.len() % BLOCK_SIZE;

    let mut out = Vec::with_capacity(data.len() + padding);
    out.extend_from_slice(data);
    out.push(MARKER);
    out.resize(data.len() + padding, 0);
    out
}

/// Strip padding added by [`pad`].
///
/// # Errors
///
/// Returns [`CryptoError::InvalidPadding`] if the input is not block aligned
/// or the last non-zero byte is not the `0x80` marker.
pub fn unpad(padded: &[u8]) -> Result<&[u8], CryptoError> {
    if padded.is_empty() || padded.len() % BLOCK_SIZE != 0 {
        return Err(CryptoError::InvalidPadding);
    }

    let end = padded
        .iter()
        .rposition(|&b| b != 0)
        .ok_or(CryptoError::InvalidPadding)?;

    // marker must sit in the final block
    if padded[end] != MARKER || padded.len() - end > BLOCK_SIZE {
        return Err(CryptoError::InvalidPadding);
    }

    Ok(&padded[..end])
}
