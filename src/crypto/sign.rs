//! ECDSA over secp521r1. Independent of encryption.

use p521::ecdsa::signature::{Signer, Verifier};
use p521::ecdsa::{Signature, SigningKey, VerifyingKey};
use p521::{PublicKey, SecretKey};

use crate::error::CryptoError;

/// Fixed-size `r || s` signature length.
pub const SIGNATURE_LEN: usize = 132;

/// Sign `message` with a private key.
pub fn sign(secret: &SecretKey, message: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let signing_key = signing_key(secret)?;
    let signature: Signature = signing_key.sign(message);
    Ok(signature.to_bytes().to_vec())
}

/// Returns `true` only if `signature` is a valid signature over `message`.
pub fn verify(public: &PublicKey, message: &[u8], signature: &[u8]) -> bool {
    let Ok(signature) = Signature::from_slice(signature) else {
        return false;
    };
    let Ok(verifying_key) = VerifyingKey::from_affine(*public.as_affine()) else {
        return false;
    };
    verifying_key.verify(message, &signature).is_ok()
}

fn signing_key(secret: &SecretKey) -> Result<SigningKey, CryptoError> {
    SigningKey::from_bytes(&secret.to_bytes())
        .map_err(|_| CryptoError::MalformedInput("invalid signing key"))
}
