use serde::{Deserialize, Serialize};

// Basic types for wallet operations
pub type Address = String;
pub type PublicKeyString = String;
pub type SignatureString = String;
pub type Amount = String;

// Network types - the clusters the embedding widget can point at
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Network {
    Devnet,
    Testnet,
    MainnetBeta,
}

impl Default for Network {
    fn default() -> Self {
        Network::Devnet
    }
}

impl Network {
    pub fn name(&self) -> &'static str {
        match self {
            Network::Devnet => "devnet",
            Network::Testnet => "testnet",
            Network::MainnetBeta => "mainnet-beta",
        }
    }

    pub fn rpc_url(&self) -> &'static str {
        match self {
            Network::Devnet => "https://api.devnet.solana.com",
            Network::Testnet => "https://api.testnet.solana.com",
            Network::MainnetBeta => "https://api.mainnet-beta.solana.com",
        }
    }

    /// Env var that overrides the default RPC endpoint for this network
    pub fn rpc_env_var(&self) -> &'static str {
        match self {
            Network::Devnet => crate::shared::constants::ENV_RPC_DEVNET,
            Network::Testnet => crate::shared::constants::ENV_RPC_TESTNET,
            Network::MainnetBeta => crate::shared::constants::ENV_RPC_MAINNET,
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name {
            "mainnet-beta" => Network::MainnetBeta,
            "testnet" => Network::Testnet,
            _ => Network::Devnet,
        }
    }
}

// Token types - aligned with the widget's token registry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenInfo {
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
    pub mint: Address,
}

/// One entry from a parsed token-accounts query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenBalance {
    pub mint: Address,
    pub amount: Amount,
    pub ui_amount: f64,
    pub decimals: u8,
}

/// Events emitted by a wallet session when its observable state changes.
/// Replaces the source widget's window-event reactivity with an explicit
/// notification interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletEvent {
    Connected(PublicKeyString),
    Disconnected,
    NetworkChanged(Network),
}

/// A swap the caller wants executed. `min_amount_out` is required: the
/// source hardcoded a zero minimum-output threshold, which left swaps
/// with no slippage protection at all.
#[derive(Debug, Clone)]
pub struct SwapRequest {
    /// Whirlpools config account the pool was initialized under
    pub pool_config: PublicKeyString,
    pub from_mint: PublicKeyString,
    pub to_mint: PublicKeyString,
    /// Decimal amount of the input token, e.g. "1.5"
    pub amount: Amount,
    /// Minimum output in the destination token's base units
    pub min_amount_out: u64,
}

// Result types for better error handling
pub type WalletResult<T> = Result<T, crate::shared::error::WalletError>;
