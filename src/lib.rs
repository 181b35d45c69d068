//! Authenticated symmetric envelopes and ECIES over secp521r1.
//!
//! ```no_run
//! use sealkit::{Encoding, SymmetricKey, decrypt, encrypt};
//!
//! let key = SymmetricKey::generate()?;
//! let sealed = encrypt(b"Hello, world.", &key, Encoding::Armoured)?;
//! assert_eq!(decrypt(&sealed, &key)?.as_slice(), b"Hello, world.");
//! # Ok::<(), sealkit::CryptoError>(())
//! ```

pub mod crypto;
mod error;
pub mod format;
mod storage;

use std::fmt;

use anyhow::{Context, Result, bail};
use tracing::info;
use zeroize::Zeroizing;

pub use crate::crypto::{
    EcKeypair, KdfParams, SymmetricKey, decrypt, derive_from_passphrase, ecies, encrypt,
    sign::{sign, verify},
};
pub use crate::error::CryptoError;
pub use crate::format::Encoding;
pub use crate::storage::Storage;

use crate::format::SealedFile;

/// Encrypt `plaintext` under a passphrase-derived key.
///
/// The output is a v1 container carrying the KDF parameters and salt in front
/// of the envelope, so the same passphrase reproduces the key later.
pub fn seal_with_passphrase(
    passphrase: &[u8],
    plaintext: &[u8],
    kdf: KdfParams,
    encoding: Encoding,
) -> Result<Vec<u8>> {
    if passphrase.is_empty() {
        bail!("passphrase cannot be empty");
    }

    let (salt, key) =
        derive_from_passphrase(passphrase, None, kdf).context("failed to derive encryption key")?;
    let envelope = encrypt(plaintext, &key, encoding).context("encryption failed")?;

    let file = SealedFile::new(kdf, salt, envelope);
    let bytes = format::serialize(&file)?;

    info!(
        plaintext_len = plaintext.len(),
        sealed_len = bytes.len(),
        "sealed with passphrase"
    );
    Ok(bytes)
}

/// Decrypt a container produced by [`seal_with_passphrase`].
///
/// A wrong passphrase and a tampered file produce the same error.
pub fn open_with_passphrase(passphrase: &[u8], data: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    let file = format::parse(data)?;

    let (_, key) = derive_from_passphrase(passphrase, Some(file.salt()), *file.kdf())
        .context("unable to derive encryption key")?;

    match decrypt(file.envelope(), &key) {
        Ok(plaintext) => {
            info!(plaintext_len = plaintext.len(), "opened with passphrase");
            Ok(plaintext)
        }
        Err(CryptoError::MalformedInput(what)) => bail!("malformed ciphertext: {what}"),
        Err(_) => bail!("invalid passphrase or corrupted data"),
    }
}

/// Header summary of a passphrase container; needs no passphrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Info {
    pub version: u8,
    pub iterations: u32,
    pub salt_len: usize,
    pub encoding: Option<Encoding>,
    pub envelope_len: usize,
}

pub fn inspect(data: &[u8]) -> Result<Info> {
    let file = format::parse(data)?;
    Ok(Info {
        version: file.version(),
        iterations: file.kdf().iterations(),
        salt_len: file.salt().len(),
        encoding: file.encoding(),
        envelope_len: file.envelope().len(),
    })
}

impl fmt::Display for Info {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoding = match self.encoding {
            Some(Encoding::Raw) => "raw",
            Some(Encoding::Armoured) => "armoured (base64)",
            None => "unknown",
        };
        writeln!(f, "format version : {}", self.version)?;
        writeln!(f, "kdf            : PBKDF2-HMAC-SHA1")?;
        writeln!(f, "iterations     : {}", self.iterations)?;
        writeln!(f, "salt length    : {} bytes", self.salt_len)?;
        writeln!(f, "encoding       : {encoding}")?;
        write!(f, "envelope size  : {} bytes", self.envelope_len)
    }
}
