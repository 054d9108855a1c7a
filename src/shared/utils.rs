//! Utility functions for the wallet core
//!
//! This module contains common utility functions used throughout the wallet core.

use crate::shared::error::WalletError;
use crate::shared::types::WalletResult;

/// Validate a base58 Solana address
pub fn validate_address(address: &str) -> WalletResult<()> {
    let bytes = bs58::decode(address)
        .into_vec()
        .map_err(|_| WalletError::validation("Address is not valid base58"))?;

    if bytes.len() != 32 {
        return Err(WalletError::validation("Address must decode to 32 bytes"));
    }

    Ok(())
}

/// Scale a decimal amount string to integer base units for a mint with the
/// given number of decimals. The fractional part is truncated past the
/// mint's precision; there is no rounding.
pub fn scale_to_base_units(amount: &str, decimals: u8) -> WalletResult<u64> {
    let amount = amount.trim();
    if amount.is_empty() {
        return Err(WalletError::validation("Amount cannot be empty"));
    }

    let (whole, frac) = match amount.split_once('.') {
        Some((w, f)) => (w, f),
        None => (amount, ""),
    };

    if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
        return Err(WalletError::validation("Amount must be a decimal number"));
    }
    if whole.is_empty() && frac.is_empty() {
        return Err(WalletError::validation("Amount must be a decimal number"));
    }

    let decimals = decimals as usize;
    let mut frac_digits = frac.to_string();
    frac_digits.truncate(decimals);
    while frac_digits.len() < decimals {
        frac_digits.push('0');
    }

    let combined = format!("{}{}", whole, frac_digits);
    let combined = combined.trim_start_matches('0');
    if combined.is_empty() {
        return Ok(0);
    }

    combined
        .parse::<u64>()
        .map_err(|_| WalletError::validation("Amount exceeds the representable range"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_whole_amount() {
        assert_eq!(scale_to_base_units("10", 6).unwrap(), 10_000_000);
        assert_eq!(scale_to_base_units("0", 6).unwrap(), 0);
    }

    #[test]
    fn test_scale_fractional_amount() {
        assert_eq!(scale_to_base_units("1.5", 6).unwrap(), 1_500_000);
        assert_eq!(scale_to_base_units("0.000001", 6).unwrap(), 1);
        assert_eq!(scale_to_base_units(".5", 6).unwrap(), 500_000);
    }

    #[test]
    fn test_scale_truncates_excess_precision() {
        assert_eq!(scale_to_base_units("1.2345678", 6).unwrap(), 1_234_567);
    }

    #[test]
    fn test_scale_respects_mint_decimals() {
        // 9-decimal mints (e.g. wrapped SOL) must not use the 6-decimal scale
        assert_eq!(scale_to_base_units("1.5", 9).unwrap(), 1_500_000_000);
        assert_eq!(scale_to_base_units("2", 0).unwrap(), 2);
    }

    #[test]
    fn test_scale_rejects_garbage() {
        assert!(scale_to_base_units("", 6).is_err());
        assert!(scale_to_base_units("abc", 6).is_err());
        assert!(scale_to_base_units("1.2.3", 6).is_err());
        assert!(scale_to_base_units("-1", 6).is_err());
        assert!(scale_to_base_units(".", 6).is_err());
    }

    #[test]
    fn test_validate_address() {
        assert!(validate_address("TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA").is_ok());
        assert!(validate_address("not-base58!").is_err());
        assert!(validate_address("abc").is_err());
    }
}
