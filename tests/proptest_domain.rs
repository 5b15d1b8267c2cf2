//! Property-Based Tests — Domain Layer Invariants
//!
//! Uses `proptest` to verify that the amount codec and the proportional
//! sizer maintain their invariants across random inputs.

use alloy::primitives::U256;
use proptest::prelude::*;
use rust_decimal::Decimal;

use balance_mirror_bot::domain::amount::{decode, encode};
use balance_mirror_bot::domain::sizer::{DirectionCaps, TradeSizer};

/// One unit in the sixth fractional digit of the decimal form:
/// 10^(18-6) raw units, the quantum `encode` rounds to.
const QUANTUM: u128 = 1_000_000_000_000;

fn sizer(max_observed: u32, max_base_cents: i64) -> TradeSizer {
    let caps = DirectionCaps {
        max_observed: Decimal::from(max_observed),
        // Base cap expressed in hundredths, e.g. 5 → 0.05
        max_base: Decimal::new(max_base_cents, 2),
    };
    TradeSizer::new(caps, caps)
}

// ── Amount Codec Properties ─────────────────────────────────

proptest! {
    /// encode(decode(r)) reproduces r up to rounding the decimal form
    /// to 6 fractional digits: the result is a multiple of the quantum
    /// and within half a quantum of the input.
    #[test]
    fn codec_round_trip_within_rounding(
        raw in 0u128..1_000_000_000_000_000_000_000_000u128,
    ) {
        let decoded = decode(U256::from(raw)).unwrap();
        let encoded = encode(decoded).unwrap();
        let encoded = u128::try_from(encoded).unwrap();

        prop_assert_eq!(encoded % QUANTUM, 0, "not quantized: {}", encoded);
        prop_assert!(
            encoded.abs_diff(raw) <= QUANTUM / 2,
            "round-trip drifted: {raw} -> {encoded}"
        );
    }

    /// Raw values already quantized at 6 fractional digits round-trip
    /// exactly.
    #[test]
    fn codec_round_trip_exact_on_quantized_values(
        units in 0u128..1_000_000_000_000u128,
    ) {
        let raw = units * QUANTUM;
        let encoded = encode(decode(U256::from(raw)).unwrap()).unwrap();
        prop_assert_eq!(encoded, U256::from(raw));
    }

    /// Decoding never produces a negative decimal.
    #[test]
    fn decode_is_non_negative(raw in 0u128..u64::MAX as u128) {
        let decoded = decode(U256::from(raw)).unwrap();
        prop_assert!(decoded >= Decimal::ZERO);
    }
}

// ── Trade Sizer Properties ──────────────────────────────────

proptest! {
    /// Sizing is monotonically non-decreasing in the observed delta.
    #[test]
    fn size_buy_monotone_in_delta(
        max_observed in 1u32..=1000,
        max_base_cents in 1i64..=500,
        d1 in 0u128..1_000_000_000_000_000_000_000u128,
        extra in 0u128..1_000_000_000_000_000_000_000u128,
    ) {
        let sizer = sizer(max_observed, max_base_cents);
        let s1 = sizer.size_buy(U256::from(d1)).unwrap();
        let s2 = sizer.size_buy(U256::from(d1 + extra)).unwrap();
        prop_assert!(
            s2.amount >= s1.amount,
            "not monotone: size({}) = {} > size({}) = {}",
            d1, s1.amount, d1 + extra, s2.amount
        );
    }

    /// Sizing scales linearly: doubling the delta doubles the trade, up
    /// to the 6-digit encode rounding on each side.
    #[test]
    fn size_buy_linear_in_delta(
        max_observed in 1u32..=1000,
        max_base_cents in 1i64..=500,
        d in 1u128..500_000_000_000_000_000_000u128,
    ) {
        let sizer = sizer(max_observed, max_base_cents);
        let single = u128::try_from(sizer.size_buy(U256::from(d)).unwrap().amount).unwrap();
        let double = u128::try_from(sizer.size_buy(U256::from(2 * d)).unwrap().amount).unwrap();
        prop_assert!(
            double.abs_diff(2 * single) <= 2 * QUANTUM,
            "not linear: size(d) = {single}, size(2d) = {double}"
        );
    }

    /// With identical caps, a sell mirrors a buy of the same observed
    /// magnitude exactly.
    #[test]
    fn size_sell_mirrors_size_buy(
        max_observed in 1u32..=1000,
        max_base_cents in 1i64..=500,
        d in 0u128..1_000_000_000_000_000_000_000u128,
    ) {
        let sizer = sizer(max_observed, max_base_cents);
        let buy = sizer.size_buy(U256::from(d)).unwrap();
        let sell = sizer.size_sell(U256::from(d)).unwrap();
        prop_assert_eq!(buy.amount, sell.amount);
        prop_assert_eq!(buy.proportion, sell.proportion);
    }

    /// The proportion exceeds one exactly when the observed delta
    /// exceeds the cap (no clamping).
    #[test]
    fn proportion_tracks_cap_crossing(
        max_observed in 1u32..=1000,
        multiplier in 2u32..=10,
    ) {
        let sizer = sizer(max_observed, 5);
        let cap_raw = u128::from(max_observed) * 1_000_000_000_000_000_000;
        let oversized = sizer
            .size_buy(U256::from(cap_raw * u128::from(multiplier)))
            .unwrap();
        prop_assert!(oversized.proportion > Decimal::ONE);

        let at_cap = sizer.size_buy(U256::from(cap_raw)).unwrap();
        prop_assert_eq!(at_cap.proportion, Decimal::ONE);
    }
}
