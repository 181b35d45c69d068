//! Symmetric envelope framing.
//!
//! ```text
//! TAG (1) | [base64 of] IV (16) | CIPHERTEXT (N, N % 16 == 0) | HMAC-SHA384 (48)
//! ```
//!
//! `TAG` is `0x00` for raw bytes and `0x41` (`'A'`) for a base64 payload.

use base64::{Engine, engine::general_purpose::STANDARD};

use crate::crypto::{BLOCK_SIZE, TAG_LEN};
use crate::error::CryptoError;

/// Smallest raw envelope: IV, one cipher block and the tag.
pub const MIN_RAW_LEN: usize = BLOCK_SIZE + BLOCK_SIZE + TAG_LEN;

/// Transport encoding of an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    #[default]
    Raw,
    Armoured,
}

impl Encoding {
    pub const RAW_TAG: u8 = 0x00;
    pub const ARMOURED_TAG: u8 = 0x41;

    pub const fn tag(self) -> u8 {
        match self {
            Encoding::Raw => Self::RAW_TAG,
            Encoding::Armoured => Self::ARMOURED_TAG,
        }
    }

    pub fn from_tag(tag: u8) -> Result<Self, CryptoError> {
        match tag {
            Self::RAW_TAG => Ok(Encoding::Raw),
            Self::ARMOURED_TAG => Ok(Encoding::Armoured),
            _ => Err(CryptoError::MalformedInput("unknown envelope format tag")),
        }
    }
}

/// A parsed envelope with its three fields split out.
#[derive(Debug, Clone)]
pub struct Envelope {
    encoding: Encoding,
    iv: [u8; BLOCK_SIZE],
    body: Vec<u8>,
    tag: [u8; TAG_LEN],
}

impl Envelope {
    pub fn new(
        encoding: Encoding,
        iv: [u8; BLOCK_SIZE],
        body: Vec<u8>,
        tag: [u8; TAG_LEN],
    ) -> Self {
        Self {
            encoding,
            iv,
            body,
            tag,
        }
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn iv(&self) -> &[u8; BLOCK_SIZE] {
        &self.iv
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn tag(&self) -> &[u8; TAG_LEN] {
        &self.tag
    }

    /// Length of `iv || body || tag` before any armouring.
    pub fn raw_len(&self) -> usize {
        BLOCK_SIZE + self.body.len() + TAG_LEN
    }

    /// Parses a framed envelope.
    ///
    /// # Errors
    ///
    /// - [`CryptoError::MalformedInput`] for an empty input, an unknown tag,
    ///   invalid base64 or a body that is not block aligned
    /// - [`CryptoError::AuthenticationFailure`] if the payload is too short to
    ///   hold an IV, one block and a tag
    pub fn parse(data: &[u8]) -> Result<Self, CryptoError> {
        let (&tag, payload) = data
            .split_first()
            .ok_or(CryptoError::MalformedInput("empty envelope"))?;
        let encoding = Encoding::from_tag(tag)?;

        let decoded;
        let raw = match encoding {
            Encoding::Raw => payload,
            Encoding::Armoured => {
                decoded = decode_armour(payload)?;
                decoded.as_slice()
            }
        };

        if raw.len() < MIN_RAW_LEN {
            return Err(CryptoError::AuthenticationFailure);
        }

        let tag_start = raw.len() - TAG_LEN;
        let body = &raw[BLOCK_SIZE..tag_start];
        if body.len() % BLOCK_SIZE != 0 {
            return Err(CryptoError::MalformedInput("ciphertext not block aligned"));
        }

        let mut iv = [0u8; BLOCK_SIZE];
        iv.copy_from_slice(&raw[..BLOCK_SIZE]);
        let mut mac = [0u8; TAG_LEN];
        mac.copy_from_slice(&raw[tag_start..]);

        Ok(Self::new(encoding, iv, body.to_vec(), mac))
    }

    /// Serializes the envelope with its format tag.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut raw = Vec::with_capacity(self.raw_len());
        raw.extend_from_slice(&self.iv);
        raw.extend_from_slice(&self.body);
        raw.extend_from_slice(&self.tag);

        match self.encoding {
            Encoding::Raw => {
                let mut out = Vec::with_capacity(1 + raw.len());
                out.push(Encoding::RAW_TAG);
                out.extend_from_slice(&raw);
                out
            }
            Encoding::Armoured => {
                let armoured = STANDARD.encode(&raw);
                let mut out = Vec::with_capacity(1 + armoured.len());
                out.push(Encoding::ARMOURED_TAG);
                out.extend_from_slice(armoured.as_bytes());
                out
            }
        }
    }
}

/// Armoured payloads may have been line-wrapped in transit.
fn decode_armour(payload: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let compact: Vec<u8> = payload
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    STANDARD
        .decode(compact)
        .map_err(|_| CryptoError::MalformedInput("invalid base64 armour"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(encoding: Encoding) -> Envelope {
        Envelope::new(encoding, [1u8; BLOCK_SIZE], vec![2u8; 32], [3u8; TAG_LEN])
    }

    #[test]
    fn raw_layout_is_tag_iv_body_mac() {
        let bytes = sample(Encoding::Raw).to_bytes();
        assert_eq!(bytes.len(), 1 + 16 + 32 + 48);
        assert_eq!(bytes[0], 0x00);
        assert_eq!(&bytes[1..17], &[1u8; 16]);
        assert_eq!(&bytes[17..49], &[2u8; 32]);
        assert_eq!(&bytes[49..], &[3u8; 48]);
    }

    #[test]
    fn armoured_payload_is_base64() {
        let bytes = sample(Encoding::Armoured).to_bytes();
        assert_eq!(bytes[0], b'A');
        assert!(bytes[1..].iter().all(|b| b.is_ascii_graphic()));

        let parsed = Envelope::parse(&bytes).unwrap();
        assert_eq!(parsed.encoding(), Encoding::Armoured);
        assert_eq!(parsed.body(), &[2u8; 32]);
    }

    #[test]
    fn armour_tolerates_line_breaks() {
        let bytes = sample(Encoding::Armoured).to_bytes();
        let mut wrapped = vec![bytes[0]];
        for chunk in bytes[1..].chunks(20) {
            wrapped.extend_from_slice(chunk);
            wrapped.push(b'\n');
        }
        let parsed = Envelope::parse(&wrapped).unwrap();
        assert_eq!(parsed.tag(), &[3u8; TAG_LEN]);
    }

    #[test]
    fn unknown_tag_is_malformed() {
        let mut bytes = sample(Encoding::Raw).to_bytes();
        bytes[0] = 0x42;
        assert!(matches!(
            Envelope::parse(&bytes),
            Err(CryptoError::MalformedInput(_))
        ));
    }

    #[test]
    fn empty_input_is_malformed() {
        assert!(matches!(
            Envelope::parse(b""),
            Err(CryptoError::MalformedInput(_))
        ));
    }

    #[test]
    fn short_payload_fails_authentication() {
        let mut bytes = vec![Encoding::RAW_TAG];
        bytes.extend_from_slice(&[0u8; MIN_RAW_LEN - 1]);
        assert_eq!(
            Envelope::parse(&bytes).unwrap_err(),
            CryptoError::AuthenticationFailure
        );
        assert_eq!(
            Envelope::parse(&[0x00; 10]).unwrap_err(),
            CryptoError::AuthenticationFailure
        );
    }

    #[test]
    fn unaligned_body_is_malformed() {
        let mut bytes = vec![Encoding::RAW_TAG];
        bytes.extend_from_slice(&[0u8; MIN_RAW_LEN + 5]);
        assert!(matches!(
            Envelope::parse(&bytes),
            Err(CryptoError::MalformedInput(_))
        ));
    }

    #[test]
    fn bad_base64_is_malformed() {
        let bytes = b"A!!!not-base64!!!";
        assert!(matches!(
            Envelope::parse(bytes),
            Err(CryptoError::MalformedInput(_))
        ));
    }
}
