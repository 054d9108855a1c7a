//! Platform storage implementations
//!
//! The credential vault persists string key-value pairs through the
//! `PlatformStorage` trait. In the embedding widget this backs onto the
//! host page's local storage; in native hosts it backs onto a file in the
//! OS application-data directory. Values are opaque bytes here - the vault
//! stores only already-encrypted blobs and the plaintext public key.

use crate::shared::error::WalletError;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

/// Platform-specific storage backend
pub trait PlatformStorage: Send + Sync {
    /// Store data under a key
    fn store(&self, key: &str, data: &[u8]) -> Result<(), WalletError>;

    /// Retrieve data for a key
    fn retrieve(&self, key: &str) -> Result<Vec<u8>, WalletError>;

    /// Delete a key
    fn delete(&self, key: &str) -> Result<(), WalletError>;

    /// Check if a key exists
    fn exists(&self, key: &str) -> Result<bool, WalletError>;

    /// List all stored keys
    fn list_keys(&self) -> Result<Vec<String>, WalletError>;
}

/// File-backed storage under the OS application-data directory
pub struct FileStorage {
    base_dir: PathBuf,
}

impl FileStorage {
    pub fn new() -> Result<Self, WalletError> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pocketwallet");
        Self::with_base_dir(base_dir)
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self, WalletError> {
        fs::create_dir_all(&base_dir)
            .map_err(|e| WalletError::storage(format!("Failed to create storage dir: {}", e)))?;
        Ok(Self { base_dir })
    }

    fn file_path(&self, key: &str) -> Result<PathBuf, WalletError> {
        // Storage keys are fixed identifiers; reject anything path-like
        if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(WalletError::storage(format!("Invalid storage key: {}", key)));
        }
        Ok(self.base_dir.join(format!("{}.dat", key)))
    }
}

impl PlatformStorage for FileStorage {
    fn store(&self, key: &str, data: &[u8]) -> Result<(), WalletError> {
        let path = self.file_path(key)?;
        fs::write(&path, data)
            .map_err(|e| WalletError::storage(format!("Failed to write {}: {}", key, e)))
    }

    fn retrieve(&self, key: &str) -> Result<Vec<u8>, WalletError> {
        let path = self.file_path(key)?;
        fs::read(&path).map_err(|e| WalletError::storage(format!("Failed to read {}: {}", key, e)))
    }

    fn delete(&self, key: &str) -> Result<(), WalletError> {
        let path = self.file_path(key)?;
        if path.exists() {
            fs::remove_file(&path)
                .map_err(|e| WalletError::storage(format!("Failed to delete {}: {}", key, e)))?;
        }
        Ok(())
    }

    fn exists(&self, key: &str) -> Result<bool, WalletError> {
        Ok(self.file_path(key)?.exists())
    }

    fn list_keys(&self) -> Result<Vec<String>, WalletError> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.base_dir)
            .map_err(|e| WalletError::storage(format!("Failed to list storage dir: {}", e)))?
        {
            let entry = entry
                .map_err(|e| WalletError::storage(format!("Failed to list storage dir: {}", e)))?;
            if let Some(name) = entry.file_name().to_str() {
                if let Some(stem) = name.strip_suffix(".dat") {
                    keys.push(stem.to_string());
                }
            }
        }
        Ok(keys)
    }
}

/// In-memory storage, used by tests and short-lived embedders
pub struct MemoryStorage {
    data: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            data: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformStorage for MemoryStorage {
    fn store(&self, key: &str, data: &[u8]) -> Result<(), WalletError> {
        let mut storage = self
            .data
            .lock()
            .map_err(|_| WalletError::storage("Storage lock poisoned".to_string()))?;
        storage.insert(key.to_string(), data.to_vec());
        Ok(())
    }

    fn retrieve(&self, key: &str) -> Result<Vec<u8>, WalletError> {
        let storage = self
            .data
            .lock()
            .map_err(|_| WalletError::storage("Storage lock poisoned".to_string()))?;
        storage
            .get(key)
            .cloned()
            .ok_or_else(|| WalletError::storage(format!("Key not found: {}", key)))
    }

    fn delete(&self, key: &str) -> Result<(), WalletError> {
        let mut storage = self
            .data
            .lock()
            .map_err(|_| WalletError::storage("Storage lock poisoned".to_string()))?;
        storage.remove(key);
        Ok(())
    }

    fn exists(&self, key: &str) -> Result<bool, WalletError> {
        let storage = self
            .data
            .lock()
            .map_err(|_| WalletError::storage("Storage lock poisoned".to_string()))?;
        Ok(storage.contains_key(key))
    }

    fn list_keys(&self) -> Result<Vec<String>, WalletError> {
        let storage = self
            .data
            .lock()
            .map_err(|_| WalletError::storage("Storage lock poisoned".to_string()))?;
        Ok(storage.keys().cloned().collect())
    }
}
