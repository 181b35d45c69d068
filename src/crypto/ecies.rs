//! ECIES over secp521r1.
//!
//! Each message gets a fresh ephemeral keypair. The ECDH shared secret is
//! split into an AES key (first 32 bytes, used as-is) and an HMAC key
//! (SHA-384 of the remaining bytes). The payload is a raw symmetric envelope.
//!
//! ```text
//! EPK_LEN (u16 BE) | EPK (SEC1 uncompressed) | ENVELOPE
//! ```

use std::fmt;

use p521::elliptic_curve::ecdh::{EphemeralSecret, SharedSecret, diffie_hellman};
use p521::elliptic_curve::rand_core::OsRng;
use p521::elliptic_curve::sec1::ToEncodedPoint;
use p521::{NistP521, PublicKey, SecretKey};
use sha2::{Digest, Sha384};
use tracing::debug;
use zeroize::Zeroizing;

use super::{AES_KEY_LEN, TAG_KEY_LEN, envelope, key::SymmetricKey};
use crate::error::CryptoError;
use crate::format::{Encoding, Envelope, HybridFrame};

/// Length of a SEC1 uncompressed secp521r1 point.
pub const PUBLIC_KEY_LEN: usize = 133;

/// A long-term secp521r1 keypair.
#[derive(Clone)]
pub struct EcKeypair {
    secret: SecretKey,
    public: PublicKey,
}

impl EcKeypair {
    pub fn generate() -> Self {
        let secret = SecretKey::random(&mut OsRng);
        let public = secret.public_key();
        Self { secret, public }
    }

    pub fn from_secret(secret: SecretKey) -> Self {
        let public = secret.public_key();
        Self { secret, public }
    }

    pub fn secret(&self) -> &SecretKey {
        &self.secret
    }

    pub fn public(&self) -> &PublicKey {
        &self.public
    }

    /// SEC1 uncompressed encoding of the public key.
    pub fn public_bytes(&self) -> Vec<u8> {
        encode_public(&self.public)
    }
}

impl fmt::Debug for EcKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EcKeypair")
            .field("public", &self.public)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

pub fn encode_public(public: &PublicKey) -> Vec<u8> {
    public.to_encoded_point(false).as_bytes().to_vec()
}

pub fn decode_public(bytes: &[u8]) -> Result<PublicKey, CryptoError> {
    PublicKey::from_sec1_bytes(bytes).map_err(|_| CryptoError::MalformedInput("invalid public key"))
}

/// Encrypt `plaintext` to the holder of `recipient`'s private key.
pub fn encrypt(recipient: &PublicKey, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let ephemeral = EphemeralSecret::<NistP521>::random(&mut OsRng);
    let ephemeral_public = encode_public(&ephemeral.public_key());

    let shared = ephemeral.diffie_hellman(recipient);
    drop(ephemeral);
    let key = shared_key(&shared);

    let sealed = envelope::encrypt(plaintext, &key, Encoding::Raw)?;
    let out = HybridFrame::new(&ephemeral_public, &sealed).to_bytes()?;

    debug!(
        epk_len = ephemeral_public.len(),
        total_len = out.len(),
        "sealed hybrid message"
    );
    Ok(out)
}

/// Decrypt a hybrid ciphertext with the recipient's private key.
///
/// # Errors
///
/// A truncated prefix, an invalid ephemeral point or an armoured inner
/// envelope is [`CryptoError::MalformedInput`]. Envelope failures propagate
/// unchanged.
pub fn decrypt(
    recipient: &SecretKey,
    ciphertext: &[u8],
) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    let frame = HybridFrame::parse(ciphertext)?;
    let ephemeral_public = decode_public(frame.ephemeral_public())?;

    let sealed = Envelope::parse(frame.envelope())?;
    if sealed.encoding() != Encoding::Raw {
        return Err(CryptoError::MalformedInput("hybrid envelope must be raw"));
    }

    let shared = diffie_hellman(recipient.to_nonzero_scalar(), ephemeral_public.as_affine());
    let key = shared_key(&shared);

    envelope::open(&sealed, &key)
}

/// Split the ECDH secret into cipher and MAC keys.
fn shared_key(shared: &SharedSecret<NistP521>) -> SymmetricKey {
    let raw = shared.raw_secret_bytes();

    let mut cipher = Zeroizing::new([0u8; AES_KEY_LEN]);
    cipher.copy_from_slice(&raw[..AES_KEY_LEN]);

    let mut mac = Zeroizing::new([0u8; TAG_KEY_LEN]);
    mac.copy_from_slice(&Sha384::digest(&raw[AES_KEY_LEN..]));

    SymmetricKey::from_parts(*cipher, *mac)
}
