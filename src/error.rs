use thiserror::Error;

/// Errors produced by the cryptographic core.
///
/// Every failure that happens after a ciphertext has been parsed (tag
/// mismatch, short body, bad padding under a valid tag) is reported as
/// [`CryptoError::AuthenticationFailure`] so callers cannot tell them apart.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    #[error("invalid padding")]
    InvalidPadding,

    #[error("authentication failed")]
    AuthenticationFailure,

    #[error("malformed input: {0}")]
    MalformedInput(&'static str),

    #[error("invalid key length: expected {expected} bytes, got {got}")]
    InvalidKeyLength { expected: usize, got: usize },

    #[error("invalid parameters: {0}")]
    InvalidParams(&'static str),

    #[error("key derivation failed")]
    KeyDerivation,

    #[error("OS random generator unavailable")]
    Random,
}
