//! Wire formats.
//!
//! - [`frame`]: the symmetric envelope (`0x00` raw / `0x41` armoured)
//! - [`hybrid`]: the length-prefixed ECIES wrapper
//! - [`v1`]: the passphrase container that pairs a salt with an envelope

use anyhow::{Result, bail};

use crate::crypto::KdfParams;

pub mod frame;
pub mod hybrid;
pub mod v1;

pub use frame::{Encoding, Envelope};
pub use hybrid::HybridFrame;

/// Magic bytes identifying a sealkit passphrase container ("SKIT").
pub const MAGIC: &[u8; 4] = b"SKIT";
/// Length of magic bytes.
pub const MAGIC_LEN: usize = 4;
/// Length of version field.
pub const VER_LEN: usize = 1;
/// Latest container version
pub const CURRENT_VERSION: u8 = v1::VERSION_V1;

/// A parsed passphrase container.
///
/// Holds the KDF parameters and salt needed to re-derive the key, plus the
/// framed envelope exactly as produced by [`crate::crypto::encrypt`].
#[derive(Debug, Clone)]
pub struct SealedFile {
    version: u8,
    kdf: KdfParams,
    salt: Vec<u8>,
    envelope: Vec<u8>,
}

impl SealedFile {
    pub fn new(kdf: KdfParams, salt: Vec<u8>, envelope: Vec<u8>) -> Self {
        Self {
            version: CURRENT_VERSION,
            kdf,
            salt,
            envelope,
        }
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn kdf(&self) -> &KdfParams {
        &self.kdf
    }

    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    pub fn envelope(&self) -> &[u8] {
        &self.envelope
    }

    /// Encoding of the embedded envelope, if its tag is recognised.
    pub fn encoding(&self) -> Option<Encoding> {
        self.envelope
            .first()
            .and_then(|&tag| Encoding::from_tag(tag).ok())
    }
}

/// Parses a container and dispatches on its version.
///
/// # Errors
///
/// Returns an error if:
/// - The input is too short
/// - The magic bytes are invalid
/// - The version is unsupported
pub fn parse(data: &[u8]) -> Result<SealedFile> {
    if data.len() < MAGIC_LEN + VER_LEN {
        bail!("file too short");
    }

    if &data[..MAGIC_LEN] != MAGIC {
        bail!("not a sealkit file");
    }

    match data[MAGIC_LEN] {
        v1::VERSION_V1 => v1::parse(data),
        v => bail!("unsupported sealkit version: {v}"),
    }
}

/// Serializes a container.
///
/// # Errors
///
/// Returns an error if the version is unsupported.
pub fn serialize(file: &SealedFile) -> Result<Vec<u8>> {
    match file.version() {
        v1::VERSION_V1 => v1::serialize(file),
        v => bail!("unsupported sealkit version: {v}"),
    }
}
