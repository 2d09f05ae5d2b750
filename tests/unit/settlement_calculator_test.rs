// Property-based tests for the settlement calculator.
//
// The load-bearing property is conservation: for every valid gross amount
// and rate set, the fee components plus the net amount reassemble the gross
// amount exactly, with no rounding leakage in either direction.

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use valecashback::modules::rates::RateSet;
use valecashback::modules::settlement::SettlementCalculator;

fn rates_from_basis_points(platform: u32, commission: u32, cashback: u32, referral: u32) -> RateSet {
    RateSet {
        platform_fee: Decimal::new(platform as i64, 4),
        merchant_commission: Decimal::new(commission as i64, 4),
        client_cashback: Decimal::new(cashback as i64, 4),
        referral_bonus: Decimal::new(referral as i64, 4),
        withdrawal_fee: Decimal::ZERO,
    }
}

proptest! {
    #[test]
    fn conservation_holds_exactly(
        cents in 1u64..1_000_000_000u64,
        platform_bps in 0u32..=1000u32,
        commission_bps in 0u32..=1000u32,
        cashback_bps in 0u32..=1000u32,
        referral_bps in 0u32..=1000u32,
    ) {
        let gross = Decimal::new(cents as i64, 2);
        let rates = rates_from_basis_points(platform_bps, commission_bps, cashback_bps, referral_bps);

        let settlement = SettlementCalculator::new()
            .compute_settlement(gross, &rates)
            .unwrap();

        prop_assert_eq!(
            settlement.component_sum(),
            gross,
            "components must sum exactly to gross"
        );
    }

    #[test]
    fn settlement_is_deterministic(
        cents in 1u64..1_000_000_000u64,
        platform_bps in 0u32..=1000u32,
    ) {
        let gross = Decimal::new(cents as i64, 2);
        let rates = rates_from_basis_points(platform_bps, 200, 200, 100);

        let calc = SettlementCalculator::new();
        let first = calc.compute_settlement(gross, &rates).unwrap();
        let second = calc.compute_settlement(gross, &rates).unwrap();

        prop_assert_eq!(first, second);
    }

    #[test]
    fn components_are_non_negative_and_cent_scaled(
        cents in 1u64..1_000_000_000u64,
        platform_bps in 0u32..=1000u32,
        commission_bps in 0u32..=1000u32,
        cashback_bps in 0u32..=1000u32,
        referral_bps in 0u32..=1000u32,
    ) {
        let gross = Decimal::new(cents as i64, 2);
        let rates = rates_from_basis_points(platform_bps, commission_bps, cashback_bps, referral_bps);

        let settlement = SettlementCalculator::new()
            .compute_settlement(gross, &rates)
            .unwrap();

        for (name, component) in [
            ("platform_fee", settlement.platform_fee),
            ("merchant_commission", settlement.merchant_commission),
            ("client_cashback", settlement.client_cashback),
            ("referral_bonus", settlement.referral_bonus),
            ("net_amount", settlement.net_amount),
        ] {
            prop_assert!(component >= Decimal::ZERO, "{} went negative: {}", name, component);
            prop_assert!(
                component.normalize().scale() <= 2,
                "{} finer than cents: {}",
                name,
                component
            );
        }
    }

    #[test]
    fn net_never_exceeds_gross(
        cents in 1u64..1_000_000_000u64,
        platform_bps in 1u32..=1000u32,
    ) {
        let gross = Decimal::new(cents as i64, 2);
        let rates = rates_from_basis_points(platform_bps, 0, 0, 0);

        let settlement = SettlementCalculator::new()
            .compute_settlement(gross, &rates)
            .unwrap();

        prop_assert!(settlement.net_amount <= gross);
    }
}

#[test]
fn reference_scenario_100_dollars() {
    // $100.00 at {platform 5%, commission 2%, cashback 2%, referral 1%}
    let rates = RateSet {
        platform_fee: dec!(0.05),
        merchant_commission: dec!(0.02),
        client_cashback: dec!(0.02),
        referral_bonus: dec!(0.01),
        withdrawal_fee: dec!(0.01),
    };

    let settlement = SettlementCalculator::new()
        .compute_settlement(dec!(100.00), &rates)
        .unwrap();

    assert_eq!(settlement.platform_fee, dec!(5.00));
    assert_eq!(settlement.merchant_commission, dec!(2.00));
    assert_eq!(settlement.client_cashback, dec!(2.00));
    assert_eq!(settlement.referral_bonus, dec!(1.00));
    assert_eq!(settlement.net_amount, dec!(90.00));
    assert_eq!(settlement.component_sum(), dec!(100.00));
}

#[test]
fn recomputing_with_later_rates_does_not_match_stored_breakdown() {
    // A stored transaction keeps the breakdown from its posting-time rates;
    // a later rate version produces a different breakdown for the same gross.
    let original = RateSet {
        platform_fee: dec!(0.05),
        merchant_commission: dec!(0.02),
        client_cashback: dec!(0.02),
        referral_bonus: dec!(0.01),
        withdrawal_fee: dec!(0.01),
    };
    let revised = RateSet {
        platform_fee: dec!(0.08),
        ..original
    };

    let calc = SettlementCalculator::new();
    let stored = calc.compute_settlement(dec!(100.00), &original).unwrap();
    let recomputed = calc.compute_settlement(dec!(100.00), &revised).unwrap();

    assert_ne!(stored, recomputed);
    // Both still conserve independently
    assert_eq!(stored.component_sum(), dec!(100.00));
    assert_eq!(recomputed.component_sum(), dec!(100.00));
}

#[test]
fn rejects_zero_and_negative_gross() {
    let rates = RateSet {
        platform_fee: dec!(0.05),
        merchant_commission: dec!(0.02),
        client_cashback: dec!(0.02),
        referral_bonus: dec!(0.01),
        withdrawal_fee: dec!(0.01),
    };
    let calc = SettlementCalculator::new();

    assert!(calc.compute_settlement(Decimal::ZERO, &rates).is_err());
    assert!(calc.compute_settlement(dec!(-1.00), &rates).is_err());
}
