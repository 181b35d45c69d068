use pbkdf2::pbkdf2_hmac;
use sha1::Sha1;
use tracing::debug;
use zeroize::Zeroizing;

use super::{KEY_SIZE, PBKDF2_ITERATIONS, SALT_LEN, key::SymmetricKey, rng::generate_salt};
use crate::error::CryptoError;

const MIN_ITERATIONS: u32 = 1000;
const MAX_ITERATIONS: u32 = 1 << 24;
const MIN_SALT_LEN: usize = 8;
const MAX_SALT_LEN: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    iterations: u32,
    salt_len: usize,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            iterations: PBKDF2_ITERATIONS,
            salt_len: SALT_LEN,
        }
    }
}

impl KdfParams {
    pub fn new(iterations: u32, salt_len: usize) -> Result<Self, CryptoError> {
        let params = Self {
            iterations,
            salt_len,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn salt_len(&self) -> usize {
        self.salt_len
    }

    pub fn validate(&self) -> Result<(), CryptoError> {
        if self.iterations < MIN_ITERATIONS {
            return Err(CryptoError::InvalidParams("pbkdf2 iterations must be >= 1000"));
        }
        if self.iterations > MAX_ITERATIONS {
            return Err(CryptoError::InvalidParams(
                "pbkdf2 iterations must be <= 16777216",
            ));
        }
        if !(MIN_SALT_LEN..=MAX_SALT_LEN).contains(&self.salt_len) {
            return Err(CryptoError::InvalidParams(
                "salt length must be between 8 and 64 bytes",
            ));
        }
        Ok(())
    }
}

/// Stretch a passphrase into a [`SymmetricKey`] with PBKDF2-HMAC-SHA1.
///
/// A fresh salt of `kdf.salt_len()` bytes is generated when `salt` is `None`.
/// The salt actually used is returned so the caller can store it next to the
/// ciphertext.
pub fn derive_from_passphrase(
    passphrase: &[u8],
    salt: Option<&[u8]>,
    kdf: KdfParams,
) -> Result<(Vec<u8>, SymmetricKey), CryptoError> {
    kdf.validate()?;

    let salt = match salt {
        Some(s) if s.is_empty() => return Err(CryptoError::KeyDerivation),
        Some(s) => s.to_vec(),
        None => generate_salt(kdf.salt_len())?,
    };

    let mut out = Zeroizing::new([0u8; KEY_SIZE]);
    pbkdf2_hmac::<Sha1>(passphrase, &salt, kdf.iterations(), out.as_mut_slice());

    debug!(
        iterations = kdf.iterations(),
        salt_len = salt.len(),
        "derived key from passphrase"
    );
    Ok((salt, SymmetricKey::from_bytes(&out)))
}
