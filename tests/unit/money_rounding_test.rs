// Rounding policy tests: fee components round half-up to 2 decimal places,
// never banker's rounding, and amount/rate validation guards caller input.

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use valecashback::core::money;

#[test]
fn half_up_at_the_midpoint() {
    // Banker's rounding would give 0.12 for both of the first two
    assert_eq!(money::round_money(dec!(0.125)), dec!(0.13));
    assert_eq!(money::round_money(dec!(0.135)), dec!(0.14));
    assert_eq!(money::round_money(dec!(2.675)), dec!(2.68));
    assert_eq!(money::round_money(dec!(2.674)), dec!(2.67));
}

#[test]
fn apply_rate_known_values() {
    assert_eq!(money::apply_rate(dec!(100.00), dec!(0.05)), dec!(5.00));
    assert_eq!(money::apply_rate(dec!(33.33), dec!(0.05)), dec!(1.67));
    assert_eq!(money::apply_rate(dec!(19.99), dec!(0.025)), dec!(0.50));
    assert_eq!(money::apply_rate(dec!(0.01), dec!(0.05)), dec!(0.00));
}

#[test]
fn amount_validation() {
    assert!(money::validate_amount(dec!(0.01)).is_ok());
    assert!(money::validate_amount(dec!(1000000.00)).is_ok());
    assert!(money::validate_amount(Decimal::ZERO).is_err());
    assert!(money::validate_amount(dec!(-0.01)).is_err());
    assert!(money::validate_amount(dec!(0.001)).is_err());
}

proptest! {
    #[test]
    fn rounded_value_is_cent_scaled(cents in 0i64..1_000_000_000i64, extra in 0u32..=9999u32) {
        // Compose an amount with up to 6 decimal places
        let amount = Decimal::new(cents, 2) + Decimal::new(extra as i64, 6);
        let rounded = money::round_money(amount);

        prop_assert!(rounded.normalize().scale() <= 2);
        // Never moves more than half a cent
        prop_assert!((rounded - amount).abs() <= dec!(0.005));
    }

    #[test]
    fn apply_rate_is_monotonic_in_gross(
        smaller in 1u64..500_000u64,
        delta in 1u64..500_000u64,
        rate_bps in 0u32..=10000u32,
    ) {
        let rate = Decimal::new(rate_bps as i64, 4);
        let a = Decimal::new(smaller as i64, 2);
        let b = Decimal::new((smaller + delta) as i64, 2);

        prop_assert!(money::apply_rate(a, rate) <= money::apply_rate(b, rate));
    }
}
