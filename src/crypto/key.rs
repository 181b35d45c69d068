use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use super::{AES_KEY_LEN, KEY_SIZE, TAG_KEY_LEN, ct::ct_eq, rng::secure_random};
use crate::error::CryptoError;

/// Combined AES-256 + HMAC-SHA384 key.
///
/// Serialized as [`AES_KEY_LEN`] cipher-key bytes followed by [`TAG_KEY_LEN`]
/// MAC-key bytes. Both halves are wiped on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SymmetricKey {
    cipher: [u8; AES_KEY_LEN],
    mac: [u8; TAG_KEY_LEN],
}

impl SymmetricKey {
    /// Read a fresh key from the OS random generator.
    pub fn generate() -> Result<Self, CryptoError> {
        let mut buf = Zeroizing::new([0u8; KEY_SIZE]);
        secure_random(buf.as_mut_slice())?;
        Ok(Self::from_bytes(&buf))
    }

    pub fn from_bytes(bytes: &[u8; KEY_SIZE]) -> Self {
        let (cipher, mac) = bytes.split_at(AES_KEY_LEN);
        let mut key = Self {
            cipher: [0u8; AES_KEY_LEN],
            mac: [0u8; TAG_KEY_LEN],
        };
        key.cipher.copy_from_slice(cipher);
        key.mac.copy_from_slice(mac);
        key
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let arr: &[u8; KEY_SIZE] = bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidKeyLength {
                expected: KEY_SIZE,
                got: bytes.len(),
            })?;
        Ok(Self::from_bytes(arr))
    }

    /// Build a key from separately derived cipher and MAC halves.
    pub(crate) fn from_parts(cipher: [u8; AES_KEY_LEN], mac: [u8; TAG_KEY_LEN]) -> Self {
        Self { cipher, mac }
    }

    pub fn cipher_key(&self) -> &[u8; AES_KEY_LEN] {
        &self.cipher
    }

    pub fn mac_key(&self) -> &[u8; TAG_KEY_LEN] {
        &self.mac
    }

    pub fn to_bytes(&self) -> Zeroizing<[u8; KEY_SIZE]> {
        let mut buf = Zeroizing::new([0u8; KEY_SIZE]);
        buf[..AES_KEY_LEN].copy_from_slice(&self.cipher);
        buf[AES_KEY_LEN..].copy_from_slice(&self.mac);
        buf
    }
}

impl PartialEq for SymmetricKey {
    fn eq(&self, other: &Self) -> bool {
        ct_eq(&self.cipher, &other.cipher) & ct_eq(&self.mac, &other.mac)
    }
}

impl Eq for SymmetricKey {}

impl fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SymmetricKey([REDACTED])")
    }
}
