//! Credential vault
//!
//! Orchestrates the two cipher layers and platform storage to hold the
//! (public key, encrypted seed phrase, encrypted access password) triple.
//! A stored credential is all-or-nothing: if any of the three keys is
//! missing the vault reports no stored wallet at all.
//!
//! Unlock attempts are rate limited: five failures within fifteen minutes
//! lock the vault until the window expires. The attempt state lives behind
//! an async mutex so concurrent unlock calls cannot race past the limit.

use crate::core::crypto::encryption::{decrypt_seed_phrase, encrypt_seed_phrase};
use crate::core::crypto::keys::{keypair_from_phrase, SecureSeedPhrase};
use crate::core::crypto::password::{decrypt_access_password, encrypt_access_password};
use crate::infrastructure::platform::PlatformStorage;
use crate::shared::constants::{
    LOCKOUT_DURATION_SECS, MAX_UNLOCK_ATTEMPTS, STORAGE_KEY_ENCRYPTED_PASSWORD,
    STORAGE_KEY_ENCRYPTED_SEED, STORAGE_KEY_PUBLIC_KEY,
};
use crate::shared::error::WalletError;
use log::{info, warn};
use solana_sdk::signer::keypair::Keypair;
use solana_sdk::signer::Signer;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

#[derive(Default)]
struct AttemptState {
    count: u32,
    last_failure: Option<Instant>,
}

impl AttemptState {
    fn locked_remaining(&self) -> Option<Duration> {
        if self.count < MAX_UNLOCK_ATTEMPTS {
            return None;
        }
        let last = self.last_failure?;
        let lockout = Duration::from_secs(LOCKOUT_DURATION_SECS);
        let elapsed = last.elapsed();
        if elapsed < lockout {
            Some(lockout - elapsed)
        } else {
            None
        }
    }
}

/// The stored credential triple, read back as strings
struct StoredCredentials {
    public_key: String,
    encrypted_seed: String,
    encrypted_password: String,
}

pub struct CredentialVault {
    storage: Arc<dyn PlatformStorage>,
    attempts: Mutex<AttemptState>,
}

impl CredentialVault {
    pub fn new(storage: Arc<dyn PlatformStorage>) -> Self {
        Self {
            storage,
            attempts: Mutex::new(AttemptState::default()),
        }
    }

    /// Persist a wallet: the public key in plaintext and the seed phrase
    /// encrypted under the wallet password. Encryption failures propagate
    /// before anything is written; a failed second write rolls back the
    /// first so no partial triple survives.
    pub fn store(
        &self,
        keypair: &Keypair,
        phrase: &SecureSeedPhrase,
        password: &str,
    ) -> Result<(), WalletError> {
        let encrypted_seed = encrypt_seed_phrase(phrase, password)?;
        let public_key = keypair.pubkey().to_string();

        self.storage
            .store(STORAGE_KEY_PUBLIC_KEY, public_key.as_bytes())?;
        if let Err(e) = self
            .storage
            .store(STORAGE_KEY_ENCRYPTED_SEED, encrypted_seed.as_bytes())
        {
            let _ = self.storage.delete(STORAGE_KEY_PUBLIC_KEY);
            return Err(e);
        }

        info!("Stored wallet credentials for {}", public_key);
        Ok(())
    }

    /// Seal the wallet password under the project key so later sessions can
    /// unlock without prompting
    pub fn store_access_password(
        &self,
        project_key: &str,
        password: &str,
    ) -> Result<(), WalletError> {
        let blob = encrypt_access_password(project_key, password)?;
        self.storage
            .store(STORAGE_KEY_ENCRYPTED_PASSWORD, blob.as_bytes())
    }

    /// Public key of the stored wallet, if one is present
    pub fn stored_public_key(&self) -> Result<Option<String>, WalletError> {
        if !self.storage.exists(STORAGE_KEY_PUBLIC_KEY)? {
            return Ok(None);
        }
        let bytes = self.storage.retrieve(STORAGE_KEY_PUBLIC_KEY)?;
        let key = String::from_utf8(bytes)
            .map_err(|_| WalletError::storage("Stored public key is not valid UTF-8"))?;
        Ok(Some(key))
    }

    /// True only when the full credential triple is present
    pub fn has_stored_wallet(&self) -> Result<bool, WalletError> {
        Ok(self.storage.exists(STORAGE_KEY_PUBLIC_KEY)?
            && self.storage.exists(STORAGE_KEY_ENCRYPTED_SEED)?
            && self.storage.exists(STORAGE_KEY_ENCRYPTED_PASSWORD)?)
    }

    /// Remove every stored credential key
    pub fn clear(&self) -> Result<(), WalletError> {
        self.storage.delete(STORAGE_KEY_PUBLIC_KEY)?;
        self.storage.delete(STORAGE_KEY_ENCRYPTED_SEED)?;
        self.storage.delete(STORAGE_KEY_ENCRYPTED_PASSWORD)?;
        Ok(())
    }

    fn load_stored(&self) -> Result<Option<StoredCredentials>, WalletError> {
        if !self.has_stored_wallet()? {
            return Ok(None);
        }

        let read = |key: &str| -> Result<String, WalletError> {
            let bytes = self.storage.retrieve(key)?;
            String::from_utf8(bytes)
                .map_err(|_| WalletError::storage(format!("Stored value {} is not UTF-8", key)))
        };

        Ok(Some(StoredCredentials {
            public_key: read(STORAGE_KEY_PUBLIC_KEY)?,
            encrypted_seed: read(STORAGE_KEY_ENCRYPTED_SEED)?,
            encrypted_password: read(STORAGE_KEY_ENCRYPTED_PASSWORD)?,
        }))
    }

    async fn record_failure(&self) -> WalletError {
        let mut attempts = self.attempts.lock().await;
        attempts.count += 1;
        attempts.last_failure = Some(Instant::now());

        if attempts.count >= MAX_UNLOCK_ATTEMPTS {
            warn!("Unlock attempt limit reached; vault locked");
            WalletError::unlock(format!(
                "Maximum attempts reached. Please try again in {} minutes.",
                LOCKOUT_DURATION_SECS / 60
            ))
        } else {
            WalletError::unlock(format!(
                "Incorrect password. {} attempts remaining.",
                MAX_UNLOCK_ATTEMPTS - attempts.count
            ))
        }
    }

    /// Unlock the vault with the user's wallet password, returning the
    /// derived signing keypair
    pub async fn unlock(&self, password: &str, project_key: &str) -> Result<Keypair, WalletError> {
        {
            let attempts = self.attempts.lock().await;
            if let Some(remaining) = attempts.locked_remaining() {
                let minutes = remaining.as_secs().div_ceil(60);
                return Err(WalletError::unlock(format!(
                    "Too many failed attempts. Please try again in {} minutes.",
                    minutes
                )));
            }
        }

        let stored = self.load_stored()?.ok_or_else(|| {
            WalletError::unlock(
                "No stored key found. Please create a new wallet or import an existing one.",
            )
        })?;

        // Cheap rejection before the deliberately slow mnemonic decryption
        let access_password = decrypt_access_password(project_key, &stored.encrypted_password)?;
        if access_password != password {
            return Err(self.record_failure().await);
        }

        let phrase = match decrypt_seed_phrase(&stored.encrypted_seed, password).await {
            Ok(phrase) => phrase,
            Err(_) => return Err(self.record_failure().await),
        };

        let keypair = match keypair_from_phrase(phrase.phrase()) {
            Ok(keypair) => keypair,
            Err(_) => return Err(self.record_failure().await),
        };

        if keypair.pubkey().to_string() != stored.public_key {
            let _ = self.record_failure().await;
            return Err(WalletError::unlock(
                "Public key mismatch between stored wallet and derived keypair",
            ));
        }

        let mut attempts = self.attempts.lock().await;
        attempts.count = 0;
        attempts.last_failure = None;
        info!("Vault unlocked for {}", stored.public_key);
        Ok(keypair)
    }

    /// Unlock using the cached access password instead of a prompt. Used by
    /// the swap path once the embedder's project key is known.
    pub async fn recover_keypair(&self, project_key: &str) -> Result<Keypair, WalletError> {
        let stored = self.load_stored()?.ok_or_else(|| {
            WalletError::unlock(
                "No stored key found. Please create a new wallet or import an existing one.",
            )
        })?;

        let access_password = decrypt_access_password(project_key, &stored.encrypted_password)?;
        self.unlock(&access_password, project_key).await
    }
}
