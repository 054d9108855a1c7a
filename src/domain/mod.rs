//! Domain layer

pub mod entities;

pub use entities::{WalletAccount, KNOWN_TOKENS};
