//! AES-256-CBC + HMAC-SHA384 encrypt-then-MAC.
//!
//! The tag covers `iv || ciphertext` and is checked before any block is
//! decrypted.

use aes::Aes256;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit, block_padding::NoPadding};
use hmac::{Hmac, Mac};
use sha2::Sha384;
use tracing::{debug, trace};
use zeroize::Zeroizing;

use super::{
    AES_KEY_LEN, BLOCK_SIZE, TAG_KEY_LEN, TAG_LEN, ct::ct_eq, key::SymmetricKey, padding,
    rng::generate_iv,
};
use crate::error::CryptoError;
use crate::format::{Encoding, Envelope};

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;
type HmacSha384 = Hmac<Sha384>;

/// Encrypt plaintext under `key` and frame it with the requested encoding.
pub fn encrypt(
    plaintext: &[u8],
    key: &SymmetricKey,
    encoding: Encoding,
) -> Result<Vec<u8>, CryptoError> {
    let padded = Zeroizing::new(padding::pad(plaintext));
    let iv = generate_iv()?;

    let body = Aes256CbcEnc::new_from_slices(key.cipher_key(), &iv)
        .map_err(|_| CryptoError::InvalidKeyLength {
            expected: AES_KEY_LEN,
            got: key.cipher_key().len(),
        })?
        .encrypt_padded_vec_mut::<NoPadding>(&padded);

    let tag = compute_tag(key, &iv, &body)?;
    let envelope = Envelope::new(encoding, iv, body, tag);

    debug!(
        plaintext_len = plaintext.len(),
        envelope_len = envelope.raw_len(),
        ?encoding,
        "sealed envelope"
    );
    Ok(envelope.to_bytes())
}

/// Authenticate and decrypt a framed envelope.
///
/// # Errors
///
/// Structural problems with the frame surface as
/// [`CryptoError::MalformedInput`]. Everything else (short payload, tag
/// mismatch, bad padding) is [`CryptoError::AuthenticationFailure`].
pub fn decrypt(ciphertext: &[u8], key: &SymmetricKey) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    let envelope = Envelope::parse(ciphertext)?;
    open(&envelope, key)
}

/// Authenticate and decrypt an already parsed envelope.
pub fn open(envelope: &Envelope, key: &SymmetricKey) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    let expected = compute_tag(key, envelope.iv(), envelope.body())?;
    if !ct_eq(&expected, envelope.tag()) {
        trace!("envelope rejected");
        return Err(CryptoError::AuthenticationFailure);
    }

    let padded = Zeroizing::new(
        Aes256CbcDec::new_from_slices(key.cipher_key(), envelope.iv())
            .map_err(|_| CryptoError::InvalidKeyLength {
                expected: AES_KEY_LEN,
                got: key.cipher_key().len(),
            })?
            .decrypt_padded_vec_mut::<NoPadding>(envelope.body())
            .map_err(|_| CryptoError::AuthenticationFailure)?,
    );

    let plaintext = padding::unpad(&padded).map_err(|_| CryptoError::AuthenticationFailure)?;

    debug!(plaintext_len = plaintext.len(), "opened envelope");
    Ok(Zeroizing::new(plaintext.to_vec()))
}

fn compute_tag(
    key: &SymmetricKey,
    iv: &[u8; BLOCK_SIZE],
    body: &[u8],
) -> Result<[u8; TAG_LEN], CryptoError> {
    let mut mac =
        HmacSha384::new_from_slice(key.mac_key()).map_err(|_| CryptoError::InvalidKeyLength {
            expected: TAG_KEY_LEN,
            got: key.mac_key().len(),
        })?;
    mac.update(iv);
    mac.update(body);

    let mut tag = [0u8; TAG_LEN];
    tag.copy_from_slice(&mac.finalize().into_bytes());
    Ok(tag)
}
