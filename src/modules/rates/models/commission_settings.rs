use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::money;
use crate::core::Result;

/// Fractional commission rates in force at a point in time.
///
/// All rates are fractions (0.05 = 5%), never percentages. A RateSet is what
/// the settlement calculator consumes; it carries no persistence identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateSet {
    pub platform_fee: Decimal,
    pub merchant_commission: Decimal,
    pub client_cashback: Decimal,
    pub referral_bonus: Decimal,
    pub withdrawal_fee: Decimal,
}

impl RateSet {
    /// Validates each rate individually and the settlement rates as a whole.
    /// The four sale-side rates must not sum above 1.0, otherwise the net
    /// amount would go negative and break the conservation invariant.
    pub fn validate(&self) -> Result<()> {
        money::validate_rate("platform fee", self.platform_fee)?;
        money::validate_rate("merchant commission", self.merchant_commission)?;
        money::validate_rate("client cashback", self.client_cashback)?;
        money::validate_rate("referral bonus", self.referral_bonus)?;
        money::validate_rate("withdrawal fee", self.withdrawal_fee)?;

        let sale_side = self.platform_fee
            + self.merchant_commission
            + self.client_cashback
            + self.referral_bonus;
        if sale_side > Decimal::ONE {
            return Err(crate::core::AppError::validation(format!(
                "Sale-side rates sum to {}, which exceeds 1.0",
                sale_side
            )));
        }

        Ok(())
    }

    /// Same rates with the referral bonus zeroed. Used when the purchasing
    /// client has no referrer on record: the referral share stays in the
    /// net amount instead of being credited to nobody.
    pub fn without_referral(&self) -> RateSet {
        RateSet {
            referral_bonus: Decimal::ZERO,
            ..*self
        }
    }
}

/// One version of the commission configuration.
///
/// Rows are append-only: changing rates inserts a new row with a later
/// `effective_from`, never updates an existing one. The row in force at
/// instant T is the one with the greatest `effective_from` <= T.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CommissionSettings {
    pub id: String,
    pub platform_fee: Decimal,
    pub merchant_commission: Decimal,
    pub client_cashback: Decimal,
    pub referral_bonus: Decimal,
    pub withdrawal_fee: Decimal,
    pub effective_from: DateTime<Utc>,
    pub updated_by: String,
    pub created_at: DateTime<Utc>,
}

impl CommissionSettings {
    /// Create a new settings version effective from the given instant.
    pub fn new(rates: RateSet, effective_from: DateTime<Utc>, updated_by: String) -> Result<Self> {
        rates.validate()?;

        if updated_by.trim().is_empty() {
            return Err(crate::core::AppError::validation(
                "updated_by cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            platform_fee: rates.platform_fee,
            merchant_commission: rates.merchant_commission,
            client_cashback: rates.client_cashback,
            referral_bonus: rates.referral_bonus,
            withdrawal_fee: rates.withdrawal_fee,
            effective_from,
            updated_by,
            created_at: Utc::now(),
        })
    }

    pub fn rates(&self) -> RateSet {
        RateSet {
            platform_fee: self.platform_fee,
            merchant_commission: self.merchant_commission,
            client_cashback: self.client_cashback,
            referral_bonus: self.referral_bonus,
            withdrawal_fee: self.withdrawal_fee,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_rates() -> RateSet {
        RateSet {
            platform_fee: dec!(0.05),
            merchant_commission: dec!(0.02),
            client_cashback: dec!(0.02),
            referral_bonus: dec!(0.01),
            withdrawal_fee: dec!(0.01),
        }
    }

    #[test]
    fn test_valid_rate_set() {
        assert!(sample_rates().validate().is_ok());
    }

    #[test]
    fn test_sale_side_sum_over_one_rejected() {
        let rates = RateSet {
            platform_fee: dec!(0.50),
            merchant_commission: dec!(0.30),
            client_cashback: dec!(0.20),
            referral_bonus: dec!(0.10),
            withdrawal_fee: Decimal::ZERO,
        };
        assert!(rates.validate().is_err());
    }

    #[test]
    fn test_withdrawal_fee_not_counted_in_sale_side_sum() {
        let rates = RateSet {
            platform_fee: dec!(0.50),
            merchant_commission: dec!(0.25),
            client_cashback: dec!(0.15),
            referral_bonus: dec!(0.10),
            withdrawal_fee: dec!(0.90),
        };
        assert!(rates.validate().is_ok());
    }

    #[test]
    fn test_without_referral_zeroes_only_referral() {
        let rates = sample_rates().without_referral();
        assert_eq!(rates.referral_bonus, Decimal::ZERO);
        assert_eq!(rates.platform_fee, dec!(0.05));
        assert_eq!(rates.client_cashback, dec!(0.02));
    }

    #[test]
    fn test_settings_rejects_empty_updated_by() {
        let result = CommissionSettings::new(sample_rates(), Utc::now(), "  ".to_string());
        assert!(result.is_err());
    }

    #[test]
    fn test_settings_round_trips_rates() {
        let settings =
            CommissionSettings::new(sample_rates(), Utc::now(), "admin-1".to_string()).unwrap();
        assert_eq!(settings.rates(), sample_rates());
    }
}
