//! Constants for the wallet core
//!
//! This module contains all constants used throughout the wallet core.

// Persisted storage keys, written only by the credential vault.
// The names match what the embedding widget reads back out.
pub const STORAGE_KEY_PUBLIC_KEY: &str = "walletPublicKey";
pub const STORAGE_KEY_ENCRYPTED_SEED: &str = "encryptedSeedPhrase";
pub const STORAGE_KEY_ENCRYPTED_PASSWORD: &str = "encryptedPassword";

// Key derivation
pub const DERIVATION_PATH: &str = "m/44'/501'/0'/0'";
pub const MNEMONIC_WORD_COUNT: usize = 12;
pub const MNEMONIC_ENTROPY_BYTES: usize = 16;

// Seed encryption (PBKDF2 + AES-256-GCM)
pub const PBKDF2_ITERATIONS: u32 = 10_000;
pub const SALT_SIZE: usize = 16;
pub const NONCE_SIZE: usize = 12;
pub const KEY_SIZE: usize = 32;

// Uniform delay applied to every seed decryption, success or failure,
// to blunt response-time side channels during password guessing.
pub const DECRYPT_DELAY_MS: u64 = 1_000;

// Unlock lockout policy
pub const MAX_UNLOCK_ATTEMPTS: u32 = 5;
pub const LOCKOUT_DURATION_SECS: u64 = 15 * 60;

// Solana program addresses
pub const TOKEN_PROGRAM_ID: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";
pub const ASSOCIATED_TOKEN_PROGRAM_ID: &str = "ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL";
pub const WHIRLPOOL_PROGRAM_ID: &str = "whirLbMiicVdio4qvUfM5KAg6Ct8VwpYzGff3uctyCc";

// Whirlpool swap geometry
pub const TICK_ARRAY_SIZE: i32 = 88;
pub const TICK_ARRAYS_PER_SWAP: usize = 3;
pub const DEFAULT_TICK_SPACING: u16 = 64;

// SPL mint account layout: decimals is a single byte at this offset
pub const MINT_DECIMALS_OFFSET: usize = 44;

// Transaction confirmation
pub const CONFIRMATION_TIMEOUT_MS: u64 = 30_000;
pub const CONFIRMATION_POLL_INTERVAL_MS: u64 = 500;

// Environment variable names (dotenv honored)
pub const ENV_PROJECT_KEY: &str = "POCKETWALLET_PROJECT_KEY";
pub const ENV_DEFAULT_NETWORK: &str = "POCKETWALLET_DEFAULT_NETWORK";
pub const ENV_RPC_DEVNET: &str = "POCKETWALLET_RPC_DEVNET";
pub const ENV_RPC_TESTNET: &str = "POCKETWALLET_RPC_TESTNET";
pub const ENV_RPC_MAINNET: &str = "POCKETWALLET_RPC_MAINNET";

// Build information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
