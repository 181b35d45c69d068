use getrandom::fill;

use super::BLOCK_SIZE;
use crate::error::CryptoError;

/// Fill buffer with cryptographically secure random bytes
pub fn secure_random(buf: &mut [u8]) -> Result<(), CryptoError> {
    fill(buf).map_err(|_| CryptoError::Random)
}

/// Generate a fresh CBC initialisation vector
pub fn generate_iv() -> Result<[u8; BLOCK_SIZE], CryptoError> {
    let mut iv = [0u8; BLOCK_SIZE];
    secure_random(&mut iv)?;
    Ok(iv)
}

/// Generate salt of the given length
pub fn generate_salt(len: usize) -> Result<Vec<u8>, CryptoError> {
    let mut salt = vec![0u8; len];
    secure_random(&mut salt)?;
    Ok(salt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ivs_are_not_repeated() {
        let a = generate_iv().unwrap();
        let b = generate_iv().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn salt_has_requested_length() {
        assert_eq!(generate_salt(24).unwrap().len(), 24);
        assert_ne!(generate_salt(16).unwrap(), generate_salt(16).unwrap());
    }
}
