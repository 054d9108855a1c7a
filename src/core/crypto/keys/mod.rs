//! Key management
//!
//! Mnemonic generation/validation and hardened keypair derivation.

pub mod key_derivation;
pub mod secure_seed_phrase;

pub use key_derivation::{derive_key_at_path, keypair_from_phrase, parse_derivation_path};
pub use secure_seed_phrase::{validate_seed_phrase, SecureSeedPhrase};
