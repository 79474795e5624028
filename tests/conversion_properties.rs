//! Property tests for total derivation, reconciliation and display conversion.

use proptest::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use tradedesk::core::conversion::{ConversionError, convert, derive_total, validate_total};
use tradedesk::core::{ConversionConfig, DisplayCurrency};

// =============================================================================
// Generators
// =============================================================================

/// Positive amounts with up to 4 decimal places.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000, 0u32..=4).prop_map(|(mantissa, scale)| Decimal::new(mantissa, scale))
}

/// Positive exchange rates with up to 4 decimal places.
fn arb_rate() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000, 0u32..=4).prop_map(|(mantissa, scale)| Decimal::new(mantissa, scale))
}

/// Offsets in ten-thousandths, inside the 0.01 tolerance.
fn arb_small_offset() -> impl Strategy<Value = Decimal> {
    (-100i64..=100).prop_map(|units| Decimal::new(units, 4))
}

/// Offsets in ten-thousandths, strictly outside the tolerance.
fn arb_large_offset() -> impl Strategy<Value = Decimal> {
    prop_oneof![101i64..1_000_000, -1_000_000i64..-100].prop_map(|units| Decimal::new(units, 4))
}

fn arb_currency() -> impl Strategy<Value = DisplayCurrency> {
    prop_oneof![Just(DisplayCurrency::ngn()), Just(DisplayCurrency::ghc())]
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The derived total is the product rounded to cents.
    #[test]
    fn prop_derive_total_rounds_product(amount in arb_amount(), rate in arb_rate()) {
        let expected =
            (amount * rate).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        prop_assert_eq!(derive_total(amount, rate), Some(expected));
        prop_assert_eq!(derive_total(amount, rate), derive_total(amount, rate));
    }

    /// A derived total always reconciles with its own inputs.
    #[test]
    fn prop_derived_total_validates(amount in arb_amount(), rate in arb_rate()) {
        let total = derive_total(amount, rate).unwrap();
        prop_assert!(validate_total(amount, rate, total).is_ok());
    }

    /// Totals within the tolerance of the unrounded product are accepted.
    #[test]
    fn prop_total_within_tolerance_is_accepted(
        amount in arb_amount(),
        rate in arb_rate(),
        offset in arb_small_offset(),
    ) {
        prop_assert!(validate_total(amount, rate, amount * rate + offset).is_ok());
    }

    /// Totals outside the tolerance fail and report the unrounded product.
    #[test]
    fn prop_total_outside_tolerance_reports_expected(
        amount in arb_amount(),
        rate in arb_rate(),
        offset in arb_large_offset(),
    ) {
        let submitted = amount * rate + offset;
        prop_assert_eq!(
            validate_total(amount, rate, submitted),
            Err(ConversionError::Mismatch { expected: amount * rate, submitted })
        );
    }

    /// Conversion floors the scaled total and the absent config equals the defaults.
    #[test]
    fn prop_convert_floors_and_defaults(
        total in arb_amount(),
        currency in arb_currency(),
    ) {
        let explicit = ConversionConfig::from_rates(Some(dec!(200)), Some(dec!(1.0)));
        let converted = convert(total, &currency, None);
        let scaled = total * explicit.effective_rate(&currency);

        prop_assert_eq!(converted, convert(total, &currency, Some(&explicit)));
        prop_assert!(converted <= scaled);
        prop_assert!(scaled - converted < Decimal::ONE);
        prop_assert_eq!(converted.fract(), Decimal::ZERO);
    }
}
