//! Cryptographic operations
//!
//! Seed phrase encryption, access password sealing, and key derivation.

pub mod encryption;
pub mod keys;
pub mod password;

pub use encryption::{decrypt_seed_phrase, encrypt_seed_phrase};
pub use keys::{keypair_from_phrase, validate_seed_phrase, SecureSeedPhrase};
pub use password::{decrypt_access_password, encrypt_access_password};
