//! Seed phrase encryption
//!
//! Password-based encryption of the mnemonic at rest. The password is
//! stretched with PBKDF2-HMAC-SHA256 over a random per-wallet salt, and the
//! phrase is sealed with AES-256-GCM so a wrong password or a tampered blob
//! fails authentication instead of yielding garbage plaintext.
//!
//! Blob layout: `hex(salt) || base64(nonce || ciphertext || tag)`. The salt
//! travels in front as hex so the decryptor can re-derive the key without a
//! separate field.
//!
//! Every decryption, successful or not, takes a fixed delay so response
//! timing does not reveal whether a guessed password was close.

use crate::core::crypto::keys::SecureSeedPhrase;
use crate::shared::constants::{
    DECRYPT_DELAY_MS, KEY_SIZE, NONCE_SIZE, PBKDF2_ITERATIONS, SALT_SIZE,
};
use crate::shared::error::WalletError;
use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;
use std::time::Duration;
use zeroize::Zeroize;

fn derive_encryption_key(password: &str, salt: &[u8]) -> [u8; KEY_SIZE] {
    let mut key = [0u8; KEY_SIZE];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, PBKDF2_ITERATIONS, &mut key);
    key
}

/// Encrypt a seed phrase under a wallet password
pub fn encrypt_seed_phrase(phrase: &SecureSeedPhrase, password: &str) -> Result<String, WalletError> {
    if password.is_empty() {
        return Err(WalletError::validation("Password cannot be empty"));
    }

    let mut salt = [0u8; SALT_SIZE];
    let mut nonce_bytes = [0u8; NONCE_SIZE];
    rand::thread_rng().fill_bytes(&mut salt);
    rand::thread_rng().fill_bytes(&mut nonce_bytes);

    let mut key = derive_encryption_key(password, &salt);
    let cipher = Aes256Gcm::new_from_slice(&key)
        .map_err(|_| WalletError::crypto("Invalid encryption key length"))?;
    key.zeroize();

    let nonce = Nonce::from_slice(&nonce_bytes);
    let ciphertext = cipher
        .encrypt(nonce, phrase.phrase().as_bytes())
        .map_err(|_| WalletError::crypto("Seed phrase encryption failed"))?;

    let mut sealed = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    sealed.extend_from_slice(&nonce_bytes);
    sealed.extend_from_slice(&ciphertext);

    use base64::Engine;
    Ok(format!(
        "{}{}",
        hex::encode(salt),
        base64::engine::general_purpose::STANDARD.encode(sealed)
    ))
}

fn decrypt_blob(blob: &str, password: &str) -> Result<SecureSeedPhrase, WalletError> {
    let salt_hex_len = SALT_SIZE * 2;
    if blob.len() <= salt_hex_len || !blob.is_char_boundary(salt_hex_len) {
        return Err(WalletError::decryption("Invalid decryption result"));
    }

    let (salt_hex, sealed_b64) = blob.split_at(salt_hex_len);
    let salt =
        hex::decode(salt_hex).map_err(|_| WalletError::decryption("Invalid decryption result"))?;

    use base64::Engine;
    let sealed = base64::engine::general_purpose::STANDARD
        .decode(sealed_b64)
        .map_err(|_| WalletError::decryption("Invalid decryption result"))?;

    if sealed.len() <= NONCE_SIZE {
        return Err(WalletError::decryption("Invalid decryption result"));
    }
    let (nonce_bytes, ciphertext) = sealed.split_at(NONCE_SIZE);

    let mut key = derive_encryption_key(password, &salt);
    let cipher = Aes256Gcm::new_from_slice(&key)
        .map_err(|_| WalletError::crypto("Invalid encryption key length"))?;
    key.zeroize();

    let mut plaintext = cipher
        .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
        .map_err(|_| WalletError::decryption("Invalid decryption result"))?;

    let phrase = String::from_utf8(plaintext.clone())
        .map_err(|_| WalletError::decryption("Invalid decryption result"))?;
    plaintext.zeroize();

    // The plaintext must still check out as a mnemonic; anything else means
    // the blob did not hold a seed phrase
    SecureSeedPhrase::from_phrase(&phrase)
        .map_err(|_| WalletError::decryption("Invalid decryption result"))
}

/// Decrypt an encrypted seed phrase blob. Applies the uniform decryption
/// delay whether the password is right or wrong.
pub async fn decrypt_seed_phrase(
    blob: &str,
    password: &str,
) -> Result<SecureSeedPhrase, WalletError> {
    tokio::time::sleep(Duration::from_millis(DECRYPT_DELAY_MS)).await;
    decrypt_blob(blob, password)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    const PHRASE: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    fn phrase() -> SecureSeedPhrase {
        SecureSeedPhrase::from_phrase(PHRASE).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_encrypt_decrypt_roundtrip() {
        let blob = encrypt_seed_phrase(&phrase(), "hunter2").unwrap();
        let recovered = decrypt_seed_phrase(&blob, "hunter2").await.unwrap();
        assert_eq!(recovered.phrase(), PHRASE);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wrong_password_yields_uniform_error() {
        let blob = encrypt_seed_phrase(&phrase(), "hunter2").unwrap();
        let err = decrypt_seed_phrase(&blob, "wrong").await.unwrap_err();
        assert!(err.to_string().contains("Invalid decryption result"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_tampered_blob_fails_authentication() {
        let blob = encrypt_seed_phrase(&phrase(), "hunter2").unwrap();
        let mut tampered = blob.into_bytes();
        let last = tampered.len() - 5;
        tampered[last] = if tampered[last] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(tampered).unwrap();

        let err = decrypt_seed_phrase(&tampered, "hunter2").await.unwrap_err();
        assert!(err.to_string().contains("Invalid decryption result"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_garbage_blob_rejected() {
        assert!(decrypt_seed_phrase("", "pw").await.is_err());
        assert!(decrypt_seed_phrase("deadbeef", "pw").await.is_err());
        assert!(decrypt_seed_phrase("zz".repeat(40).as_str(), "pw").await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_blob_starts_with_hex_salt() {
        let blob = encrypt_seed_phrase(&phrase(), "hunter2").unwrap();
        assert!(blob.len() > SALT_SIZE * 2);
        assert!(hex::decode(&blob[..SALT_SIZE * 2]).is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_salt_makes_blobs_unique() {
        let a = encrypt_seed_phrase(&phrase(), "hunter2").unwrap();
        let b = encrypt_seed_phrase(&phrase(), "hunter2").unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test(start_paused = true)]
    async fn test_decrypt_applies_fixed_delay() {
        let blob = encrypt_seed_phrase(&phrase(), "hunter2").unwrap();

        let start = Instant::now();
        decrypt_seed_phrase(&blob, "hunter2").await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(DECRYPT_DELAY_MS));

        let start = Instant::now();
        let _ = decrypt_seed_phrase(&blob, "wrong").await;
        assert!(start.elapsed() >= Duration::from_millis(DECRYPT_DELAY_MS));
    }
}
