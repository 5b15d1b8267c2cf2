//! Amount codec — raw on-chain units ⇄ human-scale decimals.
//!
//! Watched balances and swap amounts are 18-decimal fixed-point integers
//! on chain. Sizing arithmetic and notification text work in human-scale
//! `Decimal` values, so this module is the only place where the scale
//! conversion happens. `encode` rounds to 6 fractional digits before
//! re-scaling, matching the precision the proportional sizing math
//! produces, so `encode(decode(r))` is a documented lossy round-trip.

use alloy::primitives::U256;
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Fractional digits of the raw on-chain representation.
pub const DECIMALS: u32 = 18;

/// Fractional digits kept when encoding a human-scale amount.
pub const ENCODE_ROUND_DP: u32 = 6;

/// Errors from amount conversion.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmountError {
    /// The input is negative or outside the representable range.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
}

/// Convert a raw integer balance into its human-scale decimal form.
///
/// Used for display, notification text, and proportion arithmetic only;
/// execution amounts stay in raw units.
///
/// # Errors
/// Returns [`AmountError::InvalidAmount`] if `raw` exceeds the 96-bit
/// mantissa `Decimal` can carry (≳7.9e10 whole tokens at 18 decimals).
pub fn decode(raw: U256) -> Result<Decimal, AmountError> {
    let units = i128::try_from(raw).map_err(|_| {
        AmountError::InvalidAmount(format!("raw balance {raw} exceeds representable range"))
    })?;

    Decimal::try_from_i128_with_scale(units, DECIMALS).map_err(|e| {
        AmountError::InvalidAmount(format!("raw balance {raw} not representable: {e}"))
    })
}

/// Convert a human-scale decimal amount into raw integer units.
///
/// The amount is rounded to [`ENCODE_ROUND_DP`] fractional digits
/// (midpoint away from zero) before scaling, so the inverse of
/// [`decode`] holds up to that rounding.
///
/// # Errors
/// Returns [`AmountError::InvalidAmount`] if `amount` is negative.
pub fn encode(amount: Decimal) -> Result<U256, AmountError> {
    if amount.is_sign_negative() {
        return Err(AmountError::InvalidAmount(format!(
            "negative amount {amount}"
        )));
    }

    let rounded =
        amount.round_dp_with_strategy(ENCODE_ROUND_DP, RoundingStrategy::MidpointAwayFromZero);

    // Shift the mantissa into raw units directly; going through Decimal
    // multiplication would overflow its 96-bit mantissa long before U256 does.
    // Unreachable while the negativity guard above holds; the message
    // still names the actual failure, not the guard's.
    let mantissa = u128::try_from(rounded.mantissa()).map_err(|_| {
        AmountError::InvalidAmount(format!("amount {amount} has a negative mantissa"))
    })?;
    let exp = DECIMALS.checked_sub(rounded.scale()).ok_or_else(|| {
        AmountError::InvalidAmount(format!("amount {amount} has more than {DECIMALS} digits"))
    })?;

    U256::from(mantissa)
        .checked_mul(U256::from(10u64).pow(U256::from(exp)))
        .ok_or_else(|| AmountError::InvalidAmount(format!("amount {amount} overflows raw units")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn raw(units: u128) -> U256 {
        U256::from(units)
    }

    #[test]
    fn test_decode_one_whole_unit() {
        let d = decode(raw(1_000_000_000_000_000_000)).unwrap();
        assert_eq!(d, dec!(1));
    }

    #[test]
    fn test_decode_fractional() {
        let d = decode(raw(250_000_000_000_000_000)).unwrap();
        assert_eq!(d, dec!(0.25));
    }

    #[test]
    fn test_encode_quarter_unit() {
        let r = encode(dec!(0.25)).unwrap();
        assert_eq!(r, raw(250_000_000_000_000_000));
    }

    #[test]
    fn test_encode_rounds_to_six_digits() {
        // 0.1234567 rounds to 0.123457 before scaling
        let r = encode(dec!(0.1234567)).unwrap();
        assert_eq!(r, raw(123_457_000_000_000_000));
    }

    #[test]
    fn test_round_trip_exact_at_six_digits() {
        let original = raw(5_123_456_000_000_000_000);
        let r = encode(decode(original).unwrap()).unwrap();
        assert_eq!(r, original);
    }

    #[test]
    fn test_round_trip_lossy_below_six_digits() {
        // Digits beyond the sixth fractional place are rounded away.
        let original = raw(1_000_000_400_000_000_001);
        let r = encode(decode(original).unwrap()).unwrap();
        assert_eq!(r, raw(1_000_000_000_000_000_000));
    }

    #[test]
    fn test_encode_rejects_negative() {
        let err = encode(dec!(-0.5)).unwrap_err();
        assert!(matches!(err, AmountError::InvalidAmount(_)));
    }

    #[test]
    fn test_decode_rejects_out_of_range() {
        let err = decode(U256::MAX).unwrap_err();
        assert!(matches!(err, AmountError::InvalidAmount(_)));
    }

    #[test]
    fn test_encode_zero() {
        assert_eq!(encode(Decimal::ZERO).unwrap(), U256::ZERO);
    }
}
