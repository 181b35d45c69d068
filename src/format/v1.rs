//! Passphrase container v1.
//!
//! ```text
//! MAGIC (4) | VERSION (1) | ITERATIONS (4, LE) | SALT_LEN (1) | SALT | ENVELOPE
//! ```

use super::{MAGIC, MAGIC_LEN, SealedFile, VER_LEN};
use crate::crypto::KdfParams;
use anyhow::{Context, Result, bail};

/// Container version 1.
pub const VERSION_V1: u8 = 1;

const ITER_LEN: usize = 4;
const SALT_LEN_LEN: usize = 1;

const FIXED_LEN: usize = MAGIC_LEN + VER_LEN + ITER_LEN + SALT_LEN_LEN;

/// Parses a v1 container.
///
/// # Errors
///
/// Returns an error if the input is truncated or carries invalid KDF
/// parameters.
pub fn parse(data: &[u8]) -> Result<SealedFile> {
    if data.len() < FIXED_LEN {
        bail!("file too short for v1");
    }

    let mut offset = MAGIC_LEN + VER_LEN;

    let iterations = u32::from_le_bytes(data[offset..offset + ITER_LEN].try_into()?);
    offset += ITER_LEN;

    let salt_len = data[offset] as usize;
    offset += SALT_LEN_LEN;

    if data.len() < offset + salt_len {
        bail!("file truncated inside salt");
    }
    let salt = data[offset..offset + salt_len].to_vec();
    offset += salt_len;

    let envelope = data[offset..].to_vec();
    if envelope.is_empty() {
        bail!("file has no ciphertext");
    }

    let kdf = KdfParams::new(iterations, salt_len).context("invalid key derivation parameters")?;

    Ok(SealedFile::new(kdf, salt, envelope))
}

/// Serializes a [`SealedFile`] to v1 bytes.
///
/// # Errors
///
/// Returns an error if the version is not v1 or the salt length does not
/// match the KDF parameters.
pub fn serialize(file: &SealedFile) -> Result<Vec<u8>> {
    if file.version() != VERSION_V1 {
        bail!("wrong version for v1 serializer");
    }

    if file.salt().len() != file.kdf().salt_len() {
        bail!("salt length does not match kdf parameters");
    }

    let salt_len = u8::try_from(file.salt().len()).context("salt too long for v1")?;

    let mut buf = Vec::with_capacity(FIXED_LEN + file.salt().len() + file.envelope().len());

    buf.extend_from_slice(MAGIC);
    buf.push(VERSION_V1);
    buf.extend_from_slice(&file.kdf().iterations().to_le_bytes());
    buf.push(salt_len);
    buf.extend_from_slice(file.salt());
    buf.extend_from_slice(file.envelope());

    Ok(buf)
}
