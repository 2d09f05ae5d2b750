use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// The three ledger balance kinds a user can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR(16)", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BalanceKind {
    /// Cashback credited to a purchasing client
    Cashback,
    /// Bonuses credited to a referring user
    Referral,
    /// Amount owed to a merchant from settled sales
    Payable,
}

impl std::fmt::Display for BalanceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BalanceKind::Cashback => write!(f, "cashback"),
            BalanceKind::Referral => write!(f, "referral"),
            BalanceKind::Payable => write!(f, "payable"),
        }
    }
}

impl std::str::FromStr for BalanceKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "cashback" => Ok(BalanceKind::Cashback),
            "referral" => Ok(BalanceKind::Referral),
            "payable" => Ok(BalanceKind::Payable),
            _ => Err(format!("Invalid balance kind: {}", s)),
        }
    }
}

/// One balance row: a user's running total for one kind.
///
/// Rows are only ever mutated through the ledger writer and withdrawal
/// processor, always inside a database transaction alongside the record
/// (Transaction or WithdrawalRequest) that explains the delta. The amount
/// never goes negative; debits are guarded at the SQL layer.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Balance {
    pub user_id: String,
    pub kind: BalanceKind,
    pub amount: Decimal,
    pub updated_at: DateTime<Utc>,
}
