//! Secure seed phrase handling
//!
//! Wraps a mnemonic phrase so the plaintext is wiped from memory when the
//! wrapper drops and never leaks through Debug formatting.

use crate::shared::constants::{MNEMONIC_ENTROPY_BYTES, MNEMONIC_WORD_COUNT};
use crate::shared::error::WalletError;
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A validated mnemonic phrase, zeroized on drop
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SecureSeedPhrase {
    phrase: String,
}

impl SecureSeedPhrase {
    /// Generate a fresh 12-word mnemonic from OS randomness
    pub fn generate() -> Result<Self, WalletError> {
        let mut entropy = [0u8; MNEMONIC_ENTROPY_BYTES];
        rand::thread_rng().fill_bytes(&mut entropy);

        let mnemonic = bip39::Mnemonic::from_entropy(&entropy)
            .map_err(|e| WalletError::crypto(format!("Failed to generate mnemonic: {}", e)))?;
        entropy.zeroize();

        Ok(Self {
            phrase: mnemonic.to_string(),
        })
    }

    /// Wrap an externally supplied phrase after validating it
    pub fn from_phrase(phrase: &str) -> Result<Self, WalletError> {
        let normalized = phrase.trim().to_lowercase();
        validate_seed_phrase(&normalized)?;
        Ok(Self { phrase: normalized })
    }

    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    pub fn word_count(&self) -> usize {
        self.phrase.split_whitespace().count()
    }
}

impl std::fmt::Debug for SecureSeedPhrase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecureSeedPhrase")
            .field("phrase", &"[REDACTED]")
            .finish()
    }
}

/// Check word count and the BIP-39 checksum
pub fn validate_seed_phrase(phrase: &str) -> Result<(), WalletError> {
    let word_count = phrase.split_whitespace().count();
    if word_count != MNEMONIC_WORD_COUNT {
        return Err(WalletError::validation(format!(
            "Seed phrase must contain {} words, got {}",
            MNEMONIC_WORD_COUNT, word_count
        )));
    }

    bip39::Mnemonic::parse_normalized(phrase)
        .map_err(|_| WalletError::validation("Seed phrase failed checksum validation"))?;

    Ok(())
}
