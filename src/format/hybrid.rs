//! Hybrid (ECIES) framing.
//!
//! ```text
//! EPK_LEN (u16 BE) | EPHEMERAL PUBLIC KEY (EPK_LEN) | RAW ENVELOPE
//! ```

use crate::error::CryptoError;

const LEN_PREFIX: usize = 2;

/// Borrowed view of a hybrid ciphertext.
#[derive(Debug, Clone, Copy)]
pub struct HybridFrame<'a> {
    ephemeral_public: &'a [u8],
    envelope: &'a [u8],
}

impl<'a> HybridFrame<'a> {
    pub fn new(ephemeral_public: &'a [u8], envelope: &'a [u8]) -> Self {
        Self {
            ephemeral_public,
            envelope,
        }
    }

    pub fn ephemeral_public(&self) -> &'a [u8] {
        self.ephemeral_public
    }

    pub fn envelope(&self) -> &'a [u8] {
        self.envelope
    }

    /// Splits a hybrid ciphertext into key and envelope.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::MalformedInput`] if the length prefix is
    /// truncated, zero, or points past the end of the input.
    pub fn parse(data: &'a [u8]) -> Result<Self, CryptoError> {
        if data.len() < LEN_PREFIX {
            return Err(CryptoError::MalformedInput("truncated key length prefix"));
        }

        let key_len = u16::from_be_bytes([data[0], data[1]]) as usize;
        if key_len == 0 {
            return Err(CryptoError::MalformedInput("empty ephemeral public key"));
        }

        let rest = &data[LEN_PREFIX..];
        if rest.len() < key_len {
            return Err(CryptoError::MalformedInput("truncated ephemeral public key"));
        }

        let (ephemeral_public, envelope) = rest.split_at(key_len);
        Ok(Self::new(ephemeral_public, envelope))
    }

    /// Serializes the frame.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::MalformedInput`] if the public key does not fit
    /// the 16-bit length prefix.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CryptoError> {
        let key_len = u16::try_from(self.ephemeral_public.len())
            .map_err(|_| CryptoError::MalformedInput("ephemeral public key too long"))?;

        let mut out =
            Vec::with_capacity(LEN_PREFIX + self.ephemeral_public.len() + self.envelope.len());
        out.extend_from_slice(&key_len.to_be_bytes());
        out.extend_from_slice(self.ephemeral_public);
        out.extend_from_slice(self.envelope);
        Ok(out)
    }
}
