use rust_decimal::{Decimal, RoundingStrategy};

use crate::core::error::{AppError, Result};

/// Monetary scale: all ledger amounts are stored with 2 decimal places.
pub const MONEY_SCALE: u32 = 2;

/// Rounds a fee component to monetary scale using round-half-up.
///
/// Half-up (midpoint away from zero) instead of the default banker's
/// rounding: $0.125 rounds to $0.13, never $0.12. Net amounts are never
/// passed through here; they are computed as exact remainders so the
/// conservation invariant holds without rounding leakage.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Applies a fractional rate to a gross amount and rounds to monetary scale.
pub fn apply_rate(gross: Decimal, rate: Decimal) -> Decimal {
    round_money(gross * rate)
}

/// Validates a gross/withdrawal amount supplied by a caller: strictly
/// positive, at most 2 decimal places.
pub fn validate_amount(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(AppError::invalid_amount(format!(
            "amount must be positive, got {}",
            amount
        )));
    }
    if amount.normalize().scale() > MONEY_SCALE {
        return Err(AppError::invalid_amount(format!(
            "amount must have at most {} decimal places, got {}",
            MONEY_SCALE, amount
        )));
    }
    Ok(())
}

/// Validates a fractional rate: within [0, 1], at most 4 decimal places.
pub fn validate_rate(name: &str, rate: Decimal) -> Result<()> {
    if rate < Decimal::ZERO {
        return Err(AppError::validation(format!("{} rate cannot be negative", name)));
    }
    if rate > Decimal::ONE {
        return Err(AppError::validation(format!(
            "{} rate cannot exceed 1.0 (100%)",
            name
        )));
    }
    if rate.normalize().scale() > 4 {
        return Err(AppError::validation(format!(
            "{} rate cannot have more than 4 decimal places",
            name
        )));
    }
    Ok(())
}
