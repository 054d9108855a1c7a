//! JSON-RPC ledger client
//!
//! Thin client over the cluster's HTTP JSON-RPC interface. The `LedgerRpc`
//! trait is the seam the transaction and swap modules depend on; tests swap
//! in a recording fake instead of hitting a cluster.

use crate::shared::constants::{
    CONFIRMATION_POLL_INTERVAL_MS, CONFIRMATION_TIMEOUT_MS, MINT_DECIMALS_OFFSET,
};
use crate::shared::error::WalletError;
use crate::shared::types::TokenBalance;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use log::{debug, warn};
use serde_json::{json, Value};
use solana_sdk::hash::Hash;
use solana_sdk::transaction::Transaction;
use std::str::FromStr;
use std::time::Duration;

/// Cluster operations the wallet core needs
#[async_trait]
pub trait LedgerRpc: Send + Sync {
    /// Fetch a recent blockhash for signing
    async fn get_latest_blockhash(&self) -> Result<Hash, WalletError>;

    /// Broadcast a signed transaction, returning its signature
    async fn send_transaction(&self, transaction: &Transaction) -> Result<String, WalletError>;

    /// Poll until the signature reaches confirmed commitment or times out
    async fn confirm_signature(&self, signature: &str) -> Result<(), WalletError>;

    /// Lamport balance of an account
    async fn get_balance(&self, pubkey: &str) -> Result<u64, WalletError>;

    /// Parsed SPL token balances owned by an account
    async fn get_token_accounts(&self, owner: &str) -> Result<Vec<TokenBalance>, WalletError>;

    /// Raw account data bytes
    async fn get_account_data(&self, pubkey: &str) -> Result<Vec<u8>, WalletError>;

    /// Decimals field of an SPL mint account
    async fn get_mint_decimals(&self, mint: &str) -> Result<u8, WalletError>;
}

/// HTTP JSON-RPC implementation of `LedgerRpc`
pub struct JsonRpcLedger {
    client: reqwest::Client,
    endpoint: String,
}

impl JsonRpcLedger {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    async fn call(&self, method: &str, params: Value) -> Result<Value, WalletError> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        debug!("RPC {} -> {}", method, self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| WalletError::network(format!("RPC {} failed: {}", method, e)))?;

        let payload: Value = response.json().await?;

        if let Some(error) = payload.get("error") {
            return Err(WalletError::network(format!(
                "RPC {} returned error: {}",
                method, error
            )));
        }

        payload
            .get("result")
            .cloned()
            .ok_or_else(|| WalletError::network(format!("RPC {} returned no result", method)))
    }
}

#[async_trait]
impl LedgerRpc for JsonRpcLedger {
    async fn get_latest_blockhash(&self) -> Result<Hash, WalletError> {
        let result = self
            .call(
                "getLatestBlockhash",
                json!([{ "commitment": "confirmed" }]),
            )
            .await?;

        let blockhash = result
            .pointer("/value/blockhash")
            .and_then(Value::as_str)
            .ok_or_else(|| WalletError::network("Malformed getLatestBlockhash response"))?;

        Hash::from_str(blockhash)
            .map_err(|_| WalletError::network("Cluster returned an unparseable blockhash"))
    }

    async fn send_transaction(&self, transaction: &Transaction) -> Result<String, WalletError> {
        let wire = bincode::serialize(transaction)
            .map_err(|e| WalletError::submission(format!("Failed to serialize transaction: {}", e)))?;
        let encoded = BASE64.encode(wire);

        let result = self
            .call(
                "sendTransaction",
                json!([encoded, { "encoding": "base64" }]),
            )
            .await?;

        result
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| WalletError::network("Malformed sendTransaction response"))
    }

    async fn confirm_signature(&self, signature: &str) -> Result<(), WalletError> {
        let deadline = tokio::time::Instant::now() + Duration::from_millis(CONFIRMATION_TIMEOUT_MS);

        loop {
            let result = self
                .call(
                    "getSignatureStatuses",
                    json!([[signature], { "searchTransactionHistory": false }]),
                )
                .await?;

            if let Some(status) = result.pointer("/value/0").filter(|v| !v.is_null()) {
                if let Some(err) = status.get("err").filter(|v| !v.is_null()) {
                    return Err(WalletError::submission(format!(
                        "Transaction {} failed on-chain: {}",
                        signature, err
                    )));
                }

                let commitment = status
                    .get("confirmationStatus")
                    .and_then(Value::as_str)
                    .unwrap_or("");
                if commitment == "confirmed" || commitment == "finalized" {
                    debug!("Signature {} reached {}", signature, commitment);
                    return Ok(());
                }
            }

            if tokio::time::Instant::now() >= deadline {
                warn!("Confirmation timed out for {}", signature);
                return Err(WalletError::submission(format!(
                    "Transaction {} was not confirmed within {}ms",
                    signature, CONFIRMATION_TIMEOUT_MS
                )));
            }

            tokio::time::sleep(Duration::from_millis(CONFIRMATION_POLL_INTERVAL_MS)).await;
        }
    }

    async fn get_balance(&self, pubkey: &str) -> Result<u64, WalletError> {
        let result = self
            .call("getBalance", json!([pubkey, { "commitment": "confirmed" }]))
            .await?;

        result
            .pointer("/value")
            .and_then(Value::as_u64)
            .ok_or_else(|| WalletError::network("Malformed getBalance response"))
    }

    async fn get_token_accounts(&self, owner: &str) -> Result<Vec<TokenBalance>, WalletError> {
        let result = self
            .call(
                "getTokenAccountsByOwner",
                json!([
                    owner,
                    { "programId": crate::shared::constants::TOKEN_PROGRAM_ID },
                    { "encoding": "jsonParsed" }
                ]),
            )
            .await?;

        let accounts = result
            .pointer("/value")
            .and_then(Value::as_array)
            .ok_or_else(|| WalletError::network("Malformed getTokenAccountsByOwner response"))?;

        let mut balances = Vec::with_capacity(accounts.len());
        for account in accounts {
            let info = account
                .pointer("/account/data/parsed/info")
                .ok_or_else(|| WalletError::network("Malformed token account in response"))?;

            let mint = info
                .get("mint")
                .and_then(Value::as_str)
                .ok_or_else(|| WalletError::network("Token account missing mint"))?;
            let token_amount = info
                .get("tokenAmount")
                .ok_or_else(|| WalletError::network("Token account missing amount"))?;

            balances.push(TokenBalance {
                mint: mint.to_string(),
                amount: token_amount
                    .get("amount")
                    .and_then(Value::as_str)
                    .unwrap_or("0")
                    .to_string(),
                ui_amount: token_amount
                    .get("uiAmount")
                    .and_then(Value::as_f64)
                    .unwrap_or(0.0),
                decimals: token_amount
                    .get("decimals")
                    .and_then(Value::as_u64)
                    .unwrap_or(0) as u8,
            });
        }

        Ok(balances)
    }

    async fn get_account_data(&self, pubkey: &str) -> Result<Vec<u8>, WalletError> {
        let result = self
            .call(
                "getAccountInfo",
                json!([pubkey, { "encoding": "base64", "commitment": "confirmed" }]),
            )
            .await?;

        let encoded = result
            .pointer("/value/data/0")
            .and_then(Value::as_str)
            .ok_or_else(|| WalletError::network(format!("Account {} not found", pubkey)))?;

        BASE64
            .decode(encoded)
            .map_err(|_| WalletError::network("Account data is not valid base64"))
    }

    async fn get_mint_decimals(&self, mint: &str) -> Result<u8, WalletError> {
        let data = self.get_account_data(mint).await?;
        data.get(MINT_DECIMALS_OFFSET).copied().ok_or_else(|| {
            WalletError::network(format!("Account {} is too short to be an SPL mint", mint))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mint_decimals_offset_within_mint_layout() {
        // SPL mint accounts are 82 bytes; the decimals byte must sit inside
        assert!(MINT_DECIMALS_OFFSET < 82);
    }

    #[test]
    fn test_ledger_construction() {
        let ledger = JsonRpcLedger::new("https://api.devnet.solana.com");
        assert_eq!(ledger.endpoint, "https://api.devnet.solana.com");
    }
}
