//! Proportional trade sizing.
//!
//! Scales each mirrored trade linearly to the fraction of the configured
//! "typical" observed-balance change: a delta equal to `max_observed`
//! produces a trade of exactly `max_base`, half the delta half the trade,
//! and so on. No clamping is applied — a delta larger than `max_observed`
//! yields a proportion above one and an oversized trade. Callers surface
//! that through [`SizedTrade::proportion`].

use alloy::primitives::U256;
use rust_decimal::Decimal;
use thiserror::Error;

use super::amount::{self, AmountError};

/// Sizing caps for one trade direction.
///
/// `max_observed` is in the unit of the watched balance, `max_base` in
/// the unit of the mirrored trade's cost or proceeds. Both are validated
/// to be strictly positive at configuration load, so the division below
/// never sees a zero denominator in steady state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectionCaps {
  /// Reference observed-balance change the proportion is measured against.
  pub max_observed: Decimal,
  /// Trade amount corresponding to a full `max_observed` change.
  pub max_base: Decimal,
}

/// A computed trade size, carrying both representations of the amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizedTrade {
  /// Execution amount in raw units, ready for the swap call.
  pub amount: U256,
  /// The same amount in human-scale units, for logs and notifications.
  pub amount_decimal: Decimal,
  /// Fraction of the cap the observed change represents. Values above
  /// one mean the mirrored trade exceeds the per-trade cap.
  pub proportion: Decimal,
}

/// Errors from trade sizing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SizerError {
  /// The observed-unit cap is zero. Configuration validation rejects
  /// this eagerly, so hitting it at runtime is a bug.
  #[error("max_observed cap is zero")]
  DivisionByZero,
  /// The proportion arithmetic exceeded the decimal range, e.g. a huge
  /// delta against a microscopic cap. The cycle reports this like any
  /// other sizing failure instead of dying.
  #[error("sized amount for observed change {observed} exceeds decimal range")]
  Overflow {
    /// The observed delta that could not be sized, in raw units.
    observed: U256,
  },
  /// Amount conversion failed.
  #[error(transparent)]
  Amount(#[from] AmountError),
}

/// Pure proportional sizer for both trade directions.
#[derive(Debug, Clone, Copy)]
pub struct TradeSizer {
  buy: DirectionCaps,
  sell: DirectionCaps,
}

impl TradeSizer {
  /// Create a sizer with independent caps per direction.
  pub fn new(buy: DirectionCaps, sell: DirectionCaps) -> Self {
    Self { buy, sell }
  }

  /// Size the buy mirroring an observed balance inflow.
  ///
  /// # Errors
  /// [`SizerError::DivisionByZero`] on a zero cap, or a conversion error
  /// for out-of-range amounts.
  pub fn size_buy(&self, inflow: U256) -> Result<SizedTrade, SizerError> {
    Self::scale(inflow, &self.buy)
  }

  /// Size the sell mirroring an observed balance outflow.
  ///
  /// Takes the outflow magnitude, i.e. the absolute value of the
  /// negative delta.
  pub fn size_sell(&self, outflow: U256) -> Result<SizedTrade, SizerError> {
    Self::scale(outflow, &self.sell)
  }

  fn scale(observed: U256, caps: &DirectionCaps) -> Result<SizedTrade, SizerError> {
    if caps.max_observed.is_zero() {
      return Err(SizerError::DivisionByZero);
    }

    // Checked arithmetic: Decimal's operators panic on overflow, and a
    // panic inside the poll cycle would kill the engine task.
    let proportion = amount::decode(observed)?
      .checked_div(caps.max_observed)
      .ok_or(SizerError::Overflow { observed })?;
    let amount_decimal = proportion
      .checked_mul(caps.max_base)
      .ok_or(SizerError::Overflow { observed })?;
    let amount = amount::encode(amount_decimal)?;

    Ok(SizedTrade {
      amount,
      amount_decimal,
      proportion,
    })
  }
}
