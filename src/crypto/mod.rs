//! Cryptographic core.
//!
//! Padding, the encrypt-then-MAC envelope, key derivation and the ECIES
//! layer built on top of it.

pub mod ct;
pub mod ecies;
pub mod envelope;
pub mod kdf;
pub mod key;
pub mod padding;
pub mod rng;
pub mod sign;

pub use ecies::EcKeypair;
pub use envelope::{decrypt, encrypt};
pub use kdf::{KdfParams, derive_from_passphrase};
pub use key::SymmetricKey;

/// AES block size and IV length (16 bytes).
pub const BLOCK_SIZE: usize = 16;
/// AES-256 key length (32 bytes).
pub const AES_KEY_LEN: usize = 32;
/// HMAC-SHA384 key length (48 bytes).
pub const TAG_KEY_LEN: usize = 48;
/// HMAC-SHA384 tag length (48 bytes).
pub const TAG_LEN: usize = 48;
/// Combined cipher + MAC key length (80 bytes).
pub const KEY_SIZE: usize = AES_KEY_LEN + TAG_KEY_LEN;
/// Default PBKDF2 salt length (16 bytes).
pub const SALT_LEN: usize = 16;
/// Default PBKDF2 iteration count.
pub const PBKDF2_ITERATIONS: u32 = 16384;
