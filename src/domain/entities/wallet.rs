//! Wallet entity

use crate::shared::types::{Network, PublicKeyString};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A connected wallet as the session sees it. Holds no key material, only
/// the public identity and where it is pointed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletAccount {
    pub public_key: PublicKeyString,
    pub network: Network,
    pub connected_at: DateTime<Utc>,
}

impl WalletAccount {
    pub fn new(public_key: PublicKeyString, network: Network) -> Self {
        Self {
            public_key,
            network,
            connected_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_carries_identity_only() {
        let account = WalletAccount::new("abc".to_string(), Network::Devnet);
        assert_eq!(account.public_key, "abc");
        assert_eq!(account.network, Network::Devnet);
        assert!(account.connected_at <= Utc::now());
    }
}
