//! Hardened ed25519 hierarchical key derivation
//!
//! Derives a signing keypair from a mnemonic seed along the hardened path
//! `m/44'/501'/0'/0'`. Every account the wallet manages uses this same
//! path-based derivation; there is no direct-seed shortcut for the first
//! account.

use crate::shared::constants::DERIVATION_PATH;
use crate::shared::error::WalletError;
use hmac::{Hmac, Mac};
use sha2::Sha512;
use solana_sdk::signer::keypair::{keypair_from_seed, Keypair};
use zeroize::Zeroize;

type HmacSha512 = Hmac<Sha512>;

const CURVE_SEED_KEY: &[u8] = b"ed25519 seed";
const HARDENED_OFFSET: u32 = 0x8000_0000;

/// Parse a derivation path like `m/44'/501'/0'/0'` into hardened indices.
/// Ed25519 derivation only defines hardened children, so every component
/// must carry the `'` marker.
pub fn parse_derivation_path(path: &str) -> Result<Vec<u32>, WalletError> {
    let mut components = path.split('/');

    if components.next() != Some("m") {
        return Err(WalletError::derivation(format!(
            "Derivation path must start with 'm': {}",
            path
        )));
    }

    let mut indices = Vec::new();
    for component in components {
        let raw = component.strip_suffix('\'').ok_or_else(|| {
            WalletError::derivation(format!(
                "Derivation path component must be hardened: {}",
                component
            ))
        })?;

        let index: u32 = raw.parse().map_err(|_| {
            WalletError::derivation(format!("Invalid derivation path component: {}", component))
        })?;

        if index >= HARDENED_OFFSET {
            return Err(WalletError::derivation(format!(
                "Derivation index out of range: {}",
                component
            )));
        }

        indices.push(index | HARDENED_OFFSET);
    }

    if indices.is_empty() {
        return Err(WalletError::derivation(format!(
            "Derivation path has no components: {}",
            path
        )));
    }

    Ok(indices)
}

fn hmac_sha512(key: &[u8], data: &[u8]) -> Result<[u8; 64], WalletError> {
    let mut mac = HmacSha512::new_from_slice(key)
        .map_err(|_| WalletError::derivation("Invalid HMAC key length"))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().into())
}

/// Derive the 32-byte ed25519 signing seed at `path` from a 64-byte
/// mnemonic seed.
pub fn derive_key_at_path(seed: &[u8], path: &str) -> Result<[u8; 32], WalletError> {
    let indices = parse_derivation_path(path)?;

    let mut node = hmac_sha512(CURVE_SEED_KEY, seed)?;

    for index in indices {
        let mut data = Vec::with_capacity(37);
        data.push(0x00);
        data.extend_from_slice(&node[..32]);
        data.extend_from_slice(&index.to_be_bytes());

        let child = hmac_sha512(&node[32..], &data)?;
        node.zeroize();
        data.zeroize();
        node = child;
    }

    let mut key = [0u8; 32];
    key.copy_from_slice(&node[..32]);
    node.zeroize();
    Ok(key)
}

/// Derive the wallet keypair from a validated mnemonic phrase
pub fn keypair_from_phrase(phrase: &str) -> Result<Keypair, WalletError> {
    let mnemonic = bip39::Mnemonic::parse_normalized(phrase)
        .map_err(|_| WalletError::derivation("Seed phrase is not a valid mnemonic"))?;

    let mut seed = mnemonic.to_seed("");
    let mut derived = derive_key_at_path(&seed, DERIVATION_PATH)?;
    seed.zeroize();

    let keypair = keypair_from_seed(&derived)
        .map_err(|e| WalletError::derivation(format!("Failed to build keypair: {}", e)));
    derived.zeroize();
    keypair
}
