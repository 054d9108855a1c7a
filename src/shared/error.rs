//! Error handling for the wallet core
//!
//! This module defines the error types used throughout the wallet core.

use thiserror::Error;

/// Wallet error type
#[derive(Error, Debug, Clone)]
pub enum WalletError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Cryptographic error: {0}")]
    Crypto(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Derivation error: {0}")]
    Derivation(String),

    #[error("Decryption error: {0}")]
    Decryption(String),

    #[error("Unlock error: {0}")]
    Unlock(String),

    #[error("Swap build error: {0}")]
    SwapBuild(String),

    #[error("Submission error: {0}")]
    Submission(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl WalletError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a cryptographic error
    pub fn crypto(message: impl Into<String>) -> Self {
        Self::Crypto(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Create a key-derivation error
    pub fn derivation(message: impl Into<String>) -> Self {
        Self::Derivation(message.into())
    }

    /// Create a decryption error.
    ///
    /// Wrong password and corrupted ciphertext are reported with the same
    /// variant and the same wording so the error cannot be used as an oracle.
    pub fn decryption(message: impl Into<String>) -> Self {
        Self::Decryption(message.into())
    }

    /// Create an unlock error
    pub fn unlock(message: impl Into<String>) -> Self {
        Self::Unlock(message.into())
    }

    /// Create a swap-build error
    pub fn swap_build(message: impl Into<String>) -> Self {
        Self::SwapBuild(message.into())
    }

    /// Create a submission error
    pub fn submission(message: impl Into<String>) -> Self {
        Self::Submission(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

// Standard library error conversions
impl From<std::io::Error> for WalletError {
    fn from(err: std::io::Error) -> Self {
        Self::storage(format!("IO error: {}", err))
    }
}

impl From<hex::FromHexError> for WalletError {
    fn from(err: hex::FromHexError) -> Self {
        Self::validation(format!("Hex decoding error: {}", err))
    }
}

impl From<serde_json::Error> for WalletError {
    fn from(err: serde_json::Error) -> Self {
        Self::storage(format!("JSON error: {}", err))
    }
}

impl From<reqwest::Error> for WalletError {
    fn from(err: reqwest::Error) -> Self {
        Self::network(format!("HTTP error: {}", err))
    }
}

impl From<tokio::task::JoinError> for WalletError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::internal(format!("Task join error: {}", err))
    }
}

// Encryption error conversions. AES-GCM failures carry no detail by design;
// the message stays generic.
impl From<aes_gcm::Error> for WalletError {
    fn from(_err: aes_gcm::Error) -> Self {
        Self::decryption("cipher operation failed".to_string())
    }
}
