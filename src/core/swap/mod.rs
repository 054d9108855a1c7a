//! Swap transaction construction
//!
//! Builds a single concentrated-liquidity swap instruction against live
//! pool state and wraps it in an unsigned transaction with the wallet as
//! fee payer. Signing happens at submission time so the transaction can
//! carry a blockhash fetched immediately before broadcast.
//!
//! Every failure in here, whether a network fetch, an account derivation,
//! or amount parsing, surfaces as one uniform swap-build error so callers
//! see a single shape regardless of which collaborator failed.

pub mod quote;

pub use quote::{PoolState, QuoteEngine, WhirlpoolQuoteClient};

use crate::infrastructure::rpc::LedgerRpc;
use crate::shared::constants::{
    ASSOCIATED_TOKEN_PROGRAM_ID, DEFAULT_TICK_SPACING, TOKEN_PROGRAM_ID,
};
use crate::shared::error::WalletError;
use crate::shared::types::SwapRequest;
use crate::shared::utils::scale_to_base_units;
use log::debug;
use sha2::{Digest, Sha256};
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::transaction::Transaction;
use std::str::FromStr;

/// Arguments serialized into the swap instruction data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapArgs {
    pub amount: u64,
    pub other_amount_threshold: u64,
    pub sqrt_price_limit: u128,
    pub amount_specified_is_input: bool,
    pub a_to_b: bool,
}

/// 8-byte instruction discriminator for the program's global `swap` method
fn swap_discriminator() -> [u8; 8] {
    let digest = Sha256::digest(b"global:swap");
    let mut discriminator = [0u8; 8];
    discriminator.copy_from_slice(&digest[..8]);
    discriminator
}

/// Serialize swap arguments after the discriminator, little-endian
pub fn encode_swap_data(args: &SwapArgs) -> Vec<u8> {
    let mut data = Vec::with_capacity(8 + 8 + 8 + 16 + 1 + 1);
    data.extend_from_slice(&swap_discriminator());
    data.extend_from_slice(&args.amount.to_le_bytes());
    data.extend_from_slice(&args.other_amount_threshold.to_le_bytes());
    data.extend_from_slice(&args.sqrt_price_limit.to_le_bytes());
    data.push(args.amount_specified_is_input as u8);
    data.push(args.a_to_b as u8);
    data
}

/// The wallet's associated token account for a mint
fn associated_token_address(owner: &Pubkey, mint: &Pubkey) -> Result<Pubkey, WalletError> {
    let token_program = Pubkey::from_str(TOKEN_PROGRAM_ID)
        .map_err(|_| WalletError::internal("Invalid token program id"))?;
    let ata_program = Pubkey::from_str(ASSOCIATED_TOKEN_PROGRAM_ID)
        .map_err(|_| WalletError::internal("Invalid associated token program id"))?;

    let (address, _bump) = Pubkey::find_program_address(
        &[owner.as_ref(), token_program.as_ref(), mint.as_ref()],
        &ata_program,
    );
    Ok(address)
}

fn parse_pubkey(value: &str, what: &str) -> Result<Pubkey, WalletError> {
    Pubkey::from_str(value).map_err(|_| WalletError::validation(format!("Invalid {}: {}", what, value)))
}

pub struct SwapInstructionBuilder {
    quote: std::sync::Arc<dyn QuoteEngine>,
    rpc: std::sync::Arc<dyn LedgerRpc>,
}

impl SwapInstructionBuilder {
    pub fn new(
        quote: std::sync::Arc<dyn QuoteEngine>,
        rpc: std::sync::Arc<dyn LedgerRpc>,
    ) -> Self {
        Self { quote, rpc }
    }

    async fn build_inner(
        &self,
        signer: &Pubkey,
        request: &SwapRequest,
    ) -> Result<Transaction, WalletError> {
        let config = parse_pubkey(&request.pool_config, "pool config")?;
        let from_mint = parse_pubkey(&request.from_mint, "source mint")?;
        let to_mint = parse_pubkey(&request.to_mint, "destination mint")?;

        // Scale by the source mint's actual decimals rather than assuming
        // a fixed precision
        let decimals = self.rpc.get_mint_decimals(&request.from_mint).await?;
        let amount = scale_to_base_units(&request.amount, decimals)?;
        if amount == 0 {
            return Err(WalletError::validation("Swap amount must be greater than zero"));
        }

        let pool_address =
            self.quote
                .pool_address(&config, &from_mint, &to_mint, DEFAULT_TICK_SPACING)?;

        // Fresh state every time; tick indices go stale within a block
        let pool = self.quote.fetch_pool(&pool_address).await?;

        let a_to_b = from_mint == pool.token_mint_a;
        if !a_to_b && from_mint != pool.token_mint_b {
            return Err(WalletError::validation(
                "Source mint does not belong to the resolved pool",
            ));
        }

        let tick_arrays = self.quote.tick_array_addresses(
            &pool.address,
            pool.tick_current_index,
            pool.tick_spacing,
            a_to_b,
        )?;
        let oracle = self.quote.oracle_address(&pool.address)?;

        let owner_account_a = associated_token_address(signer, &pool.token_mint_a)?;
        let owner_account_b = associated_token_address(signer, &pool.token_mint_b)?;

        let args = SwapArgs {
            amount,
            other_amount_threshold: request.min_amount_out,
            sqrt_price_limit: 0,
            amount_specified_is_input: true,
            a_to_b,
        };

        debug!(
            "Built swap args for pool {}: amount={} a_to_b={}",
            pool.address, args.amount, args.a_to_b
        );

        let token_program = parse_pubkey(TOKEN_PROGRAM_ID, "token program")?;
        let whirlpool_program = parse_pubkey(
            crate::shared::constants::WHIRLPOOL_PROGRAM_ID,
            "pool program",
        )?;

        let accounts = vec![
            AccountMeta::new_readonly(token_program, false),
            AccountMeta::new_readonly(*signer, true),
            AccountMeta::new(pool.address, false),
            AccountMeta::new(owner_account_a, false),
            AccountMeta::new(pool.token_vault_a, false),
            AccountMeta::new(owner_account_b, false),
            AccountMeta::new(pool.token_vault_b, false),
            AccountMeta::new(tick_arrays[0], false),
            AccountMeta::new(tick_arrays[1], false),
            AccountMeta::new(tick_arrays[2], false),
            AccountMeta::new_readonly(oracle, false),
        ];

        let instruction = Instruction {
            program_id: whirlpool_program,
            accounts,
            data: encode_swap_data(&args),
        };

        Ok(Transaction::new_with_payer(&[instruction], Some(signer)))
    }

    /// Build the unsigned swap transaction. All underlying failures are
    /// wrapped into one swap-build error shape.
    pub async fn build(
        &self,
        signer: &Pubkey,
        request: &SwapRequest,
    ) -> Result<Transaction, WalletError> {
        self.build_inner(signer, request)
            .await
            .map_err(|e| WalletError::swap_build(format!("Failed to build swap: {}", e)))
    }
}
