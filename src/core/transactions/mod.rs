//! Transaction submission
//!
//! Signs a built transaction with a fresh blockhash and broadcasts it,
//! waiting for confirmed commitment. Blockhashes expire quickly, so the
//! fetch happens here, immediately before signing, rather than at build
//! time. This layer never retries; callers decide whether a failed
//! submission is worth repeating.

use crate::infrastructure::rpc::LedgerRpc;
use crate::shared::error::WalletError;
use log::info;
use solana_sdk::signer::keypair::Keypair;
use solana_sdk::transaction::Transaction;
use std::sync::Arc;

pub struct TransactionSubmitter {
    rpc: Arc<dyn LedgerRpc>,
}

impl TransactionSubmitter {
    pub fn new(rpc: Arc<dyn LedgerRpc>) -> Self {
        Self { rpc }
    }

    /// Sign and broadcast, returning the confirmed signature
    pub async fn submit(
        &self,
        mut transaction: Transaction,
        signer: &Keypair,
    ) -> Result<String, WalletError> {
        let blockhash = self.rpc.get_latest_blockhash().await?;

        transaction
            .try_sign(&[signer], blockhash)
            .map_err(|e| WalletError::submission(format!("Failed to sign transaction: {}", e)))?;

        let signature = self.rpc.send_transaction(&transaction).await?;
        info!("Broadcast transaction {}", signature);

        self.rpc.confirm_signature(&signature).await?;
        Ok(signature)
    }
}
