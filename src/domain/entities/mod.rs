//! Domain entities

pub mod token;
pub mod wallet;

pub use token::{find_by_mint, find_by_symbol, RegisteredToken, KNOWN_TOKENS};
pub use wallet::WalletAccount;
