use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::{AppError, Result};
use crate::modules::balances::BalanceKind;

/// Withdrawal request lifecycle.
///
/// Allowed transitions:
/// `pending -> approved | rejected`, `approved -> processing`,
/// `processing -> completed`. Rejected and completed are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR(20)", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum WithdrawalStatus {
    Pending,
    Approved,
    Rejected,
    Processing,
    Completed,
}

impl WithdrawalStatus {
    /// Whether the state machine permits moving from `self` to `next`.
    pub fn can_transition_to(self, next: WithdrawalStatus) -> bool {
        use WithdrawalStatus::*;
        matches!(
            (self, next),
            (Pending, Approved) | (Pending, Rejected) | (Approved, Processing) | (Processing, Completed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, WithdrawalStatus::Rejected | WithdrawalStatus::Completed)
    }
}

impl std::fmt::Display for WithdrawalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WithdrawalStatus::Pending => write!(f, "pending"),
            WithdrawalStatus::Approved => write!(f, "approved"),
            WithdrawalStatus::Rejected => write!(f, "rejected"),
            WithdrawalStatus::Processing => write!(f, "processing"),
            WithdrawalStatus::Completed => write!(f, "completed"),
        }
    }
}

impl std::str::FromStr for WithdrawalStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pending" => Ok(WithdrawalStatus::Pending),
            "approved" => Ok(WithdrawalStatus::Approved),
            "rejected" => Ok(WithdrawalStatus::Rejected),
            "processing" => Ok(WithdrawalStatus::Processing),
            "completed" => Ok(WithdrawalStatus::Completed),
            _ => Err(format!("Invalid withdrawal status: {}", s)),
        }
    }
}

/// A withdrawal request against one balance row.
///
/// The requested amount is reserved (debited) when the request is created,
/// not when it is approved, so a pending request can never be double-spent.
/// Rejection credits the reservation back.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WithdrawalRequest {
    pub id: String,
    pub user_id: String,
    pub balance_kind: BalanceKind,
    pub amount: Decimal,
    /// Withdrawal fee from the rates in force at request time; deducted from
    /// the payout, not debited on top of `amount`
    pub fee: Decimal,
    pub status: WithdrawalStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WithdrawalRequest {
    pub fn new(
        user_id: String,
        balance_kind: BalanceKind,
        amount: Decimal,
        fee: Decimal,
    ) -> Result<Self> {
        if user_id.trim().is_empty() {
            return Err(AppError::validation("User ID cannot be empty"));
        }
        if fee < Decimal::ZERO || fee > amount {
            return Err(AppError::Internal(format!(
                "Withdrawal fee {} out of range for amount {}",
                fee, amount
            )));
        }

        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id,
            balance_kind,
            amount,
            fee,
            status: WithdrawalStatus::Pending,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    }

    /// Amount actually paid out on completion.
    pub fn payout_amount(&self) -> Decimal {
        self.amount - self.fee
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_allowed_transitions() {
        use WithdrawalStatus::*;
        assert!(Pending.can_transition_to(Approved));
        assert!(Pending.can_transition_to(Rejected));
        assert!(Approved.can_transition_to(Processing));
        assert!(Processing.can_transition_to(Completed));
    }

    #[test]
    fn test_disallowed_transitions() {
        use WithdrawalStatus::*;
        let all = [Pending, Approved, Rejected, Processing, Completed];
        let allowed = [
            (Pending, Approved),
            (Pending, Rejected),
            (Approved, Processing),
            (Processing, Completed),
        ];
        for from in all {
            for to in all {
                let expected = allowed.contains(&(from, to));
                assert_eq!(
                    from.can_transition_to(to),
                    expected,
                    "{} -> {}",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn test_terminal_states() {
        assert!(WithdrawalStatus::Rejected.is_terminal());
        assert!(WithdrawalStatus::Completed.is_terminal());
        assert!(!WithdrawalStatus::Pending.is_terminal());
        assert!(!WithdrawalStatus::Approved.is_terminal());
        assert!(!WithdrawalStatus::Processing.is_terminal());
    }

    #[test]
    fn test_new_request_starts_pending() {
        let request = WithdrawalRequest::new(
            "user-1".to_string(),
            BalanceKind::Cashback,
            dec!(50.00),
            dec!(0.50),
        )
        .unwrap();
        assert_eq!(request.status, WithdrawalStatus::Pending);
        assert_eq!(request.payout_amount(), dec!(49.50));
    }

    #[test]
    fn test_fee_cannot_exceed_amount() {
        let result = WithdrawalRequest::new(
            "user-1".to_string(),
            BalanceKind::Cashback,
            dec!(10.00),
            dec!(10.01),
        );
        assert!(result.is_err());
    }
}
