//! Known token registry
//!
//! Static table of the tokens the widget offers for swapping. Decimals
//! here are display hints for balance rendering; swap amount scaling always
//! uses the live on-chain mint decimals.

use crate::shared::types::TokenInfo;

pub struct RegisteredToken {
    pub symbol: &'static str,
    pub name: &'static str,
    pub decimals: u8,
    pub mint: &'static str,
}

pub const KNOWN_TOKENS: &[RegisteredToken] = &[
    RegisteredToken {
        symbol: "SOL",
        name: "Solana",
        decimals: 9,
        mint: "So11111111111111111111111111111111111111112",
    },
    RegisteredToken {
        symbol: "USDC",
        name: "USD Coin",
        decimals: 6,
        mint: "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v",
    },
    RegisteredToken {
        symbol: "PYTH",
        name: "Pyth Network",
        decimals: 6,
        mint: "HZ1JovNiVvGrGNiiYvEozEVgZ58xaU3RKwX8eACQBCt3",
    },
    RegisteredToken {
        symbol: "JUP",
        name: "Jupiter",
        decimals: 5,
        mint: "JUPyiwrYJFskUPiHa7hkeR8VUtAeFoSYbKedZNsDvCN",
    },
    RegisteredToken {
        symbol: "BONK",
        name: "Bonk",
        decimals: 5,
        mint: "DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263",
    },
];

/// Look up a registered token by its symbol, case-insensitive
pub fn find_by_symbol(symbol: &str) -> Option<TokenInfo> {
    KNOWN_TOKENS
        .iter()
        .find(|t| t.symbol.eq_ignore_ascii_case(symbol))
        .map(RegisteredToken::to_info)
}

/// Look up a registered token by its mint address
pub fn find_by_mint(mint: &str) -> Option<TokenInfo> {
    KNOWN_TOKENS
        .iter()
        .find(|t| t.mint == mint)
        .map(RegisteredToken::to_info)
}

impl RegisteredToken {
    fn to_info(&self) -> TokenInfo {
        TokenInfo {
            symbol: self.symbol.to_string(),
            name: self.name.to_string(),
            decimals: self.decimals,
            mint: self.mint.to_string(),
        }
    }
}
