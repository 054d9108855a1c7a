//! Access password encryption
//!
//! Seals the wallet password under the embedding project's key so the
//! widget can unlock the vault in later sessions without re-prompting.
//! The project key is a hex-encoded 256-bit secret issued to the embedder;
//! it is configuration, never persisted alongside the blob it protects.
//!
//! Blob layout: `hex(nonce) ":" hex(ciphertext || tag)`.

use crate::shared::constants::{KEY_SIZE, NONCE_SIZE};
use crate::shared::error::WalletError;
use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use rand::RngCore;
use zeroize::Zeroize;

fn cipher_from_project_key(project_key: &str) -> Result<Aes256Gcm, WalletError> {
    let mut key = hex::decode(project_key.trim())
        .map_err(|_| WalletError::validation("Project key must be hex encoded"))?;

    if key.len() != KEY_SIZE {
        key.zeroize();
        return Err(WalletError::validation(format!(
            "Project key must be {} bytes, got {}",
            KEY_SIZE,
            key.len()
        )));
    }

    let cipher = Aes256Gcm::new_from_slice(&key)
        .map_err(|_| WalletError::crypto("Invalid project key length"));
    key.zeroize();
    cipher
}

/// Encrypt the wallet password under the project key
pub fn encrypt_access_password(project_key: &str, password: &str) -> Result<String, WalletError> {
    let cipher = cipher_from_project_key(project_key)?;

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    rand::thread_rng().fill_bytes(&mut nonce_bytes);

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce_bytes), password.as_bytes())
        .map_err(|_| WalletError::crypto("Access password encryption failed"))?;

    Ok(format!(
        "{}:{}",
        hex::encode(nonce_bytes),
        hex::encode(ciphertext)
    ))
}

/// Decrypt a stored access password blob with the project key
pub fn decrypt_access_password(project_key: &str, blob: &str) -> Result<String, WalletError> {
    let cipher = cipher_from_project_key(project_key)?;

    let (nonce_hex, ciphertext_hex) = blob
        .split_once(':')
        .ok_or_else(|| WalletError::decryption("Malformed access password blob"))?;

    let nonce_bytes = hex::decode(nonce_hex)
        .map_err(|_| WalletError::decryption("Malformed access password blob"))?;
    if nonce_bytes.len() != NONCE_SIZE {
        return Err(WalletError::decryption("Malformed access password blob"));
    }

    let ciphertext = hex::decode(ciphertext_hex)
        .map_err(|_| WalletError::decryption("Malformed access password blob"))?;

    let plaintext = cipher
        .decrypt(Nonce::from_slice(&nonce_bytes), ciphertext.as_slice())
        .map_err(|_| WalletError::decryption("Access password decryption failed"))?;

    String::from_utf8(plaintext)
        .map_err(|_| WalletError::decryption("Access password decryption failed"))
}
