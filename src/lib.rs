//! PocketWallet Core
//!
//! Key custody and transaction signing for an embeddable Solana wallet
//! widget. Handles mnemonic generation and import, password-based seed
//! encryption at rest, hardened keypair derivation, and the assembly,
//! signing, and submission of concentrated-liquidity swap transactions.
//!
//! ## Architecture
//!
//! - **Core**: wallet session, credential vault, crypto, swaps, transactions
//! - **Domain**: entities (wallet account, token registry)
//! - **Infrastructure**: platform storage and the ledger RPC client
//! - **Shared**: common types, constants, errors, and utilities
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pocketwallet_core::{SessionConfig, WalletSession};
//!
//! # async fn run() -> Result<(), pocketwallet_core::WalletError> {
//! let mut session = WalletSession::open(SessionConfig::from_env())?;
//! let (public_key, phrase) = session.generate_wallet("a strong password")?;
//! println!("new wallet {public_key}, back up: {}", phrase.phrase());
//! # Ok(())
//! # }
//! ```

use dotenv::dotenv;

pub mod core;
pub mod domain;
pub mod infrastructure;
pub mod shared;

// Re-export the main entry points
pub use crate::core::crypto::keys::SecureSeedPhrase;
pub use crate::core::swap::{PoolState, QuoteEngine, SwapInstructionBuilder, WhirlpoolQuoteClient};
pub use crate::core::transactions::TransactionSubmitter;
pub use crate::core::vault::CredentialVault;
pub use crate::core::wallet::{SessionConfig, WalletSession};
pub use crate::domain::entities::WalletAccount;
pub use crate::infrastructure::platform::{FileStorage, MemoryStorage, PlatformStorage};
pub use crate::infrastructure::rpc::{JsonRpcLedger, LedgerRpc};
pub use crate::shared::error::WalletError;
pub use crate::shared::types::{Network, SwapRequest, TokenBalance, TokenInfo, WalletEvent};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Initialize logging and load configuration from .env when present.
/// Call once at startup; embedders with their own logger can skip this.
pub fn init() {
    dotenv().ok();
    let _ = env_logger::try_init();
    log::info!("{} {} initialized", NAME, VERSION);
}
