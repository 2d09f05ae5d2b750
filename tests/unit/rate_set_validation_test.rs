// Validation rules for commission rate sets and settings versions.

use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use valecashback::modules::rates::{CommissionSettings, RateSet};

fn rates(platform: Decimal, commission: Decimal, cashback: Decimal, referral: Decimal) -> RateSet {
    RateSet {
        platform_fee: platform,
        merchant_commission: commission,
        client_cashback: cashback,
        referral_bonus: referral,
        withdrawal_fee: dec!(0.01),
    }
}

#[test]
fn default_production_rates_are_valid() {
    assert!(rates(dec!(0.05), dec!(0.02), dec!(0.02), dec!(0.01))
        .validate()
        .is_ok());
}

#[test]
fn negative_and_over_one_rates_are_rejected() {
    assert!(rates(dec!(-0.01), dec!(0.02), dec!(0.02), dec!(0.01))
        .validate()
        .is_err());
    assert!(rates(dec!(1.01), Decimal::ZERO, Decimal::ZERO, Decimal::ZERO)
        .validate()
        .is_err());
}

#[test]
fn sale_side_rates_may_not_sum_above_one() {
    // Individually valid, collectively they would make net go negative
    assert!(rates(dec!(0.40), dec!(0.30), dec!(0.20), dec!(0.15))
        .validate()
        .is_err());
    // Exactly 1.0 is the boundary and is allowed
    assert!(rates(dec!(0.40), dec!(0.30), dec!(0.20), dec!(0.10))
        .validate()
        .is_ok());
}

#[test]
fn rates_finer_than_basis_points_are_rejected() {
    assert!(rates(dec!(0.00005), Decimal::ZERO, Decimal::ZERO, Decimal::ZERO)
        .validate()
        .is_err());
}

#[test]
fn settings_version_preserves_rates() {
    let rate_set = rates(dec!(0.05), dec!(0.02), dec!(0.02), dec!(0.01));
    let settings =
        CommissionSettings::new(rate_set, Utc::now(), "admin-1".to_string()).unwrap();
    assert_eq!(settings.rates(), rate_set);
}

proptest! {
    #[test]
    fn any_basis_point_rates_summing_at_most_one_validate(
        platform_bps in 0u32..=2500u32,
        commission_bps in 0u32..=2500u32,
        cashback_bps in 0u32..=2500u32,
        referral_bps in 0u32..=2500u32,
    ) {
        let rate_set = rates(
            Decimal::new(platform_bps as i64, 4),
            Decimal::new(commission_bps as i64, 4),
            Decimal::new(cashback_bps as i64, 4),
            Decimal::new(referral_bps as i64, 4),
        );
        // 4 x 25% = 100% max, always within bounds
        prop_assert!(rate_set.validate().is_ok());
    }

    #[test]
    fn without_referral_always_validates_when_original_does(
        platform_bps in 0u32..=2500u32,
        referral_bps in 0u32..=2500u32,
    ) {
        let rate_set = rates(
            Decimal::new(platform_bps as i64, 4),
            dec!(0.02),
            dec!(0.02),
            Decimal::new(referral_bps as i64, 4),
        );
        prop_assume!(rate_set.validate().is_ok());

        let stripped = rate_set.without_referral();
        prop_assert!(stripped.validate().is_ok());
        prop_assert_eq!(stripped.referral_bonus, Decimal::ZERO);
    }
}
