//! Quote engine client
//!
//! Derives concentrated-liquidity pool addresses and decodes live pool
//! state from on-chain account data. The `QuoteEngine` trait is the seam
//! the swap builder depends on so tests can feed it canned pool state.

use crate::infrastructure::rpc::LedgerRpc;
use crate::shared::constants::{TICK_ARRAYS_PER_SWAP, TICK_ARRAY_SIZE};
use crate::shared::error::WalletError;
use async_trait::async_trait;
use solana_sdk::pubkey::Pubkey;
use std::sync::Arc;

// Byte offsets into the pool account data. The layout starts with an
// 8-byte discriminator followed by the config key, bump, and tick spacing.
const TICK_SPACING_OFFSET: usize = 41;
const TICK_CURRENT_INDEX_OFFSET: usize = 81;
const TOKEN_MINT_A_OFFSET: usize = 101;
const TOKEN_VAULT_A_OFFSET: usize = 133;
const TOKEN_MINT_B_OFFSET: usize = 181;
const TOKEN_VAULT_B_OFFSET: usize = 213;
const POOL_DATA_MIN_LEN: usize = TOKEN_VAULT_B_OFFSET + 32;

/// Live pool state, fetched fresh for every swap
#[derive(Debug, Clone)]
pub struct PoolState {
    pub address: Pubkey,
    pub tick_spacing: u16,
    pub tick_current_index: i32,
    pub token_mint_a: Pubkey,
    pub token_vault_a: Pubkey,
    pub token_mint_b: Pubkey,
    pub token_vault_b: Pubkey,
}

/// Pool discovery and state resolution for the swap builder
#[async_trait]
pub trait QuoteEngine: Send + Sync {
    /// Deterministic pool address for a (config, mint pair, tick spacing)
    fn pool_address(
        &self,
        config: &Pubkey,
        mint_a: &Pubkey,
        mint_b: &Pubkey,
        tick_spacing: u16,
    ) -> Result<Pubkey, WalletError>;

    /// Fetch current pool state. Never cached: tick state moves block to
    /// block and a stale index builds an invalid swap.
    async fn fetch_pool(&self, address: &Pubkey) -> Result<PoolState, WalletError>;

    /// The tick-array accounts covering the current price range in the
    /// given direction
    fn tick_array_addresses(
        &self,
        pool: &Pubkey,
        tick_current_index: i32,
        tick_spacing: u16,
        a_to_b: bool,
    ) -> Result<Vec<Pubkey>, WalletError>;

    /// The pool's oracle account
    fn oracle_address(&self, pool: &Pubkey) -> Result<Pubkey, WalletError>;
}

/// On-chain implementation over the ledger RPC client
pub struct WhirlpoolQuoteClient {
    rpc: Arc<dyn LedgerRpc>,
    program_id: Pubkey,
}

impl WhirlpoolQuoteClient {
    pub fn new(rpc: Arc<dyn LedgerRpc>, program_id: Pubkey) -> Self {
        Self { rpc, program_id }
    }

    fn read_pubkey(data: &[u8], offset: usize) -> Result<Pubkey, WalletError> {
        let bytes: [u8; 32] = data
            .get(offset..offset + 32)
            .and_then(|s| s.try_into().ok())
            .ok_or_else(|| WalletError::network("Pool account data truncated"))?;
        Ok(Pubkey::new_from_array(bytes))
    }

    fn decode_pool(address: &Pubkey, data: &[u8]) -> Result<PoolState, WalletError> {
        if data.len() < POOL_DATA_MIN_LEN {
            return Err(WalletError::network(format!(
                "Pool account {} is too short ({} bytes)",
                address,
                data.len()
            )));
        }

        let tick_spacing = u16::from_le_bytes(
            data[TICK_SPACING_OFFSET..TICK_SPACING_OFFSET + 2]
                .try_into()
                .map_err(|_| WalletError::network("Pool account data truncated"))?,
        );
        let tick_current_index = i32::from_le_bytes(
            data[TICK_CURRENT_INDEX_OFFSET..TICK_CURRENT_INDEX_OFFSET + 4]
                .try_into()
                .map_err(|_| WalletError::network("Pool account data truncated"))?,
        );

        Ok(PoolState {
            address: *address,
            tick_spacing,
            tick_current_index,
            token_mint_a: Self::read_pubkey(data, TOKEN_MINT_A_OFFSET)?,
            token_vault_a: Self::read_pubkey(data, TOKEN_VAULT_A_OFFSET)?,
            token_mint_b: Self::read_pubkey(data, TOKEN_MINT_B_OFFSET)?,
            token_vault_b: Self::read_pubkey(data, TOKEN_VAULT_B_OFFSET)?,
        })
    }
}

/// First tick index covered by the tick array containing `tick_index`.
/// Floors toward negative infinity so negative ticks land in the right
/// array.
pub fn tick_array_start_index(tick_index: i32, tick_spacing: u16) -> i32 {
    let ticks_per_array = TICK_ARRAY_SIZE * tick_spacing as i32;
    tick_index.div_euclid(ticks_per_array) * ticks_per_array
}

#[async_trait]
impl QuoteEngine for WhirlpoolQuoteClient {
    fn pool_address(
        &self,
        config: &Pubkey,
        mint_a: &Pubkey,
        mint_b: &Pubkey,
        tick_spacing: u16,
    ) -> Result<Pubkey, WalletError> {
        let (address, _bump) = Pubkey::find_program_address(
            &[
                b"whirlpool",
                config.as_ref(),
                mint_a.as_ref(),
                mint_b.as_ref(),
                &tick_spacing.to_le_bytes(),
            ],
            &self.program_id,
        );
        Ok(address)
    }

    async fn fetch_pool(&self, address: &Pubkey) -> Result<PoolState, WalletError> {
        let data = self.rpc.get_account_data(&address.to_string()).await?;
        Self::decode_pool(address, &data)
    }

    fn tick_array_addresses(
        &self,
        pool: &Pubkey,
        tick_current_index: i32,
        tick_spacing: u16,
        a_to_b: bool,
    ) -> Result<Vec<Pubkey>, WalletError> {
        let ticks_per_array = TICK_ARRAY_SIZE * tick_spacing as i32;
        let start = tick_array_start_index(tick_current_index, tick_spacing);

        let mut addresses = Vec::with_capacity(TICK_ARRAYS_PER_SWAP);
        for i in 0..TICK_ARRAYS_PER_SWAP as i32 {
            // Prices move toward lower ticks when swapping A to B
            let offset = if a_to_b {
                start - i * ticks_per_array
            } else {
                start + i * ticks_per_array
            };

            let (address, _bump) = Pubkey::find_program_address(
                &[b"tick_array", pool.as_ref(), offset.to_string().as_bytes()],
                &self.program_id,
            );
            addresses.push(address);
        }

        Ok(addresses)
    }

    fn oracle_address(&self, pool: &Pubkey) -> Result<Pubkey, WalletError> {
        let (address, _bump) =
            Pubkey::find_program_address(&[b"oracle", pool.as_ref()], &self.program_id);
        Ok(address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::constants::WHIRLPOOL_PROGRAM_ID;
    use crate::shared::types::TokenBalance;
    use solana_sdk::hash::Hash;
    use solana_sdk::transaction::Transaction;
    use std::str::FromStr;

    struct FixedAccountRpc {
        data: Vec<u8>,
    }

    #[async_trait]
    impl LedgerRpc for FixedAccountRpc {
        async fn get_latest_blockhash(&self) -> Result<Hash, WalletError> {
            Ok(Hash::default())
        }
        async fn send_transaction(&self, _tx: &Transaction) -> Result<String, WalletError> {
            Err(WalletError::network("not supported"))
        }
        async fn confirm_signature(&self, _sig: &str) -> Result<(), WalletError> {
            Ok(())
        }
        async fn get_balance(&self, _pubkey: &str) -> Result<u64, WalletError> {
            Ok(0)
        }
        async fn get_token_accounts(&self, _o: &str) -> Result<Vec<TokenBalance>, WalletError> {
            Ok(vec![])
        }
        async fn get_account_data(&self, _pubkey: &str) -> Result<Vec<u8>, WalletError> {
            Ok(self.data.clone())
        }
        async fn get_mint_decimals(&self, _mint: &str) -> Result<u8, WalletError> {
            Ok(6)
        }
    }

    fn program_id() -> Pubkey {
        Pubkey::from_str(WHIRLPOOL_PROGRAM_ID).unwrap()
    }

    fn pool_data(
        tick_spacing: u16,
        tick_index: i32,
        mint_a: &Pubkey,
        vault_a: &Pubkey,
        mint_b: &Pubkey,
        vault_b: &Pubkey,
    ) -> Vec<u8> {
        let mut data = vec![0u8; POOL_DATA_MIN_LEN];
        data[TICK_SPACING_OFFSET..TICK_SPACING_OFFSET + 2]
            .copy_from_slice(&tick_spacing.to_le_bytes());
        data[TICK_CURRENT_INDEX_OFFSET..TICK_CURRENT_INDEX_OFFSET + 4]
            .copy_from_slice(&tick_index.to_le_bytes());
        data[TOKEN_MINT_A_OFFSET..TOKEN_MINT_A_OFFSET + 32].copy_from_slice(mint_a.as_ref());
        data[TOKEN_VAULT_A_OFFSET..TOKEN_VAULT_A_OFFSET + 32].copy_from_slice(vault_a.as_ref());
        data[TOKEN_MINT_B_OFFSET..TOKEN_MINT_B_OFFSET + 32].copy_from_slice(mint_b.as_ref());
        data[TOKEN_VAULT_B_OFFSET..TOKEN_VAULT_B_OFFSET + 32].copy_from_slice(vault_b.as_ref());
        data
    }

    #[test]
    fn test_tick_array_start_floors_negative_ticks() {
        // 64 spacing * 88 ticks = 5632 ticks per array
        assert_eq!(tick_array_start_index(0, 64), 0);
        assert_eq!(tick_array_start_index(5631, 64), 0);
        assert_eq!(tick_array_start_index(5632, 64), 5632);
        assert_eq!(tick_array_start_index(-1, 64), -5632);
        assert_eq!(tick_array_start_index(-5632, 64), -5632);
        assert_eq!(tick_array_start_index(-5633, 64), -11264);
    }

    #[test]
    fn test_pool_address_is_deterministic() {
        let rpc = Arc::new(FixedAccountRpc { data: vec![] });
        let client = WhirlpoolQuoteClient::new(rpc, program_id());

        let config = Pubkey::new_unique();
        let mint_a = Pubkey::new_unique();
        let mint_b = Pubkey::new_unique();

        let a = client.pool_address(&config, &mint_a, &mint_b, 64).unwrap();
        let b = client.pool_address(&config, &mint_a, &mint_b, 64).unwrap();
        assert_eq!(a, b);

        // Different tick spacing is a different pool
        let c = client.pool_address(&config, &mint_a, &mint_b, 128).unwrap();
        assert_ne!(a, c);
    }

    #[tokio::test]
    async fn test_fetch_pool_decodes_fields() {
        let mint_a = Pubkey::new_unique();
        let vault_a = Pubkey::new_unique();
        let mint_b = Pubkey::new_unique();
        let vault_b = Pubkey::new_unique();
        let rpc = Arc::new(FixedAccountRpc {
            data: pool_data(64, -443, &mint_a, &vault_a, &mint_b, &vault_b),
        });
        let client = WhirlpoolQuoteClient::new(rpc, program_id());

        let pool = client.fetch_pool(&Pubkey::new_unique()).await.unwrap();
        assert_eq!(pool.tick_spacing, 64);
        assert_eq!(pool.tick_current_index, -443);
        assert_eq!(pool.token_mint_a, mint_a);
        assert_eq!(pool.token_vault_a, vault_a);
        assert_eq!(pool.token_mint_b, mint_b);
        assert_eq!(pool.token_vault_b, vault_b);
    }

    #[tokio::test]
    async fn test_fetch_pool_rejects_truncated_data() {
        let rpc = Arc::new(FixedAccountRpc { data: vec![0u8; 100] });
        let client = WhirlpoolQuoteClient::new(rpc, program_id());
        assert!(client.fetch_pool(&Pubkey::new_unique()).await.is_err());
    }

    #[test]
    fn test_tick_arrays_walk_in_direction() {
        let rpc = Arc::new(FixedAccountRpc { data: vec![] });
        let client = WhirlpoolQuoteClient::new(rpc, program_id());
        let pool = Pubkey::new_unique();

        let down = client.tick_array_addresses(&pool, 100, 64, true).unwrap();
        let up = client.tick_array_addresses(&pool, 100, 64, false).unwrap();

        assert_eq!(down.len(), TICK_ARRAYS_PER_SWAP);
        assert_eq!(up.len(), TICK_ARRAYS_PER_SWAP);
        // Same starting array, diverging afterwards
        assert_eq!(down[0], up[0]);
        assert_ne!(down[1], up[1]);
    }

    #[test]
    fn test_oracle_address_differs_per_pool() {
        let rpc = Arc::new(FixedAccountRpc { data: vec![] });
        let client = WhirlpoolQuoteClient::new(rpc, program_id());

        let a = client.oracle_address(&Pubkey::new_unique()).unwrap();
        let b = client.oracle_address(&Pubkey::new_unique()).unwrap();
        assert_ne!(a, b);
    }
}
