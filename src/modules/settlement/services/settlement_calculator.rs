use rust_decimal::Decimal;

use super::super::models::Settlement;
use crate::core::money;
use crate::core::{AppError, Result};
use crate::modules::rates::RateSet;

/// Pure settlement arithmetic. No storage, no clock: rates are passed in by
/// the caller, which is what makes the ledger writer testable and historical
/// settlements reproducible.
pub struct SettlementCalculator;

impl SettlementCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Break a gross sale amount into fee components and net amount.
    ///
    /// Each fee component is `gross * rate` rounded half-up to 2 decimal
    /// places. The net amount is the exact remainder, never independently
    /// rounded, so the components always sum back to the gross amount.
    ///
    /// # Errors
    /// * `InvalidAmount` - gross is non-positive or finer than cents
    /// * `Validation` - rates are out of range, or the rounded components
    ///   exceed the gross amount (tiny gross with near-100% combined rates)
    pub fn compute_settlement(&self, gross_amount: Decimal, rates: &RateSet) -> Result<Settlement> {
        money::validate_amount(gross_amount)?;
        rates.validate()?;

        let platform_fee = money::apply_rate(gross_amount, rates.platform_fee);
        let merchant_commission = money::apply_rate(gross_amount, rates.merchant_commission);
        let client_cashback = money::apply_rate(gross_amount, rates.client_cashback);
        let referral_bonus = money::apply_rate(gross_amount, rates.referral_bonus);

        let net_amount =
            gross_amount - platform_fee - merchant_commission - client_cashback - referral_bonus;

        if net_amount < Decimal::ZERO {
            return Err(AppError::validation(format!(
                "Rounded fee components exceed gross amount {} by {}",
                gross_amount, -net_amount
            )));
        }

        Ok(Settlement {
            gross_amount,
            platform_fee,
            merchant_commission,
            client_cashback,
            referral_bonus,
            net_amount,
        })
    }
}

impl Default for SettlementCalculator {
    fn default() -> Self {
        Self::new()
    }
}
