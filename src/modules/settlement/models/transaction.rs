use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::{AppError, Result};

/// Lifecycle status of a ledger transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR(20)", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Cancelled,
    Refunded,
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionStatus::Pending => write!(f, "pending"),
            TransactionStatus::Completed => write!(f, "completed"),
            TransactionStatus::Cancelled => write!(f, "cancelled"),
            TransactionStatus::Refunded => write!(f, "refunded"),
        }
    }
}

impl std::str::FromStr for TransactionStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TransactionStatus::Pending),
            "completed" => Ok(TransactionStatus::Completed),
            "cancelled" => Ok(TransactionStatus::Cancelled),
            "refunded" => Ok(TransactionStatus::Refunded),
            _ => Err(format!("Invalid transaction status: {}", s)),
        }
    }
}

/// Breakdown of a gross sale amount into fee components and net amount.
///
/// Produced by the settlement calculator; `net_amount` is always the exact
/// remainder, so the components sum to the gross amount with no rounding
/// leakage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub gross_amount: Decimal,
    pub platform_fee: Decimal,
    pub merchant_commission: Decimal,
    pub client_cashback: Decimal,
    pub referral_bonus: Decimal,
    pub net_amount: Decimal,
}

impl Settlement {
    /// Sum of all components; equals `gross_amount` for any valid settlement.
    pub fn component_sum(&self) -> Decimal {
        self.platform_fee
            + self.merchant_commission
            + self.client_cashback
            + self.referral_bonus
            + self.net_amount
    }

    /// Amount credited to the merchant payable balance. Merchant commission
    /// is merchant-side revenue and is paid out alongside the net amount.
    pub fn merchant_payout(&self) -> Decimal {
        self.net_amount + self.merchant_commission
    }
}

/// Immutable ledger record of one settled sale.
///
/// Fee fields are written once at posting time from the rates then in force;
/// later rate changes never touch existing rows. There is deliberately no
/// update path for fee fields anywhere in the crate.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LedgerTransaction {
    pub id: String,
    /// Caller-supplied key; unique across all transactions. Retried postings
    /// with the same key return this row instead of double-posting.
    pub idempotency_key: String,
    pub client_id: String,
    pub merchant_id: String,
    pub referrer_id: Option<String>,
    pub gross_amount: Decimal,
    pub platform_fee: Decimal,
    pub merchant_commission: Decimal,
    pub client_cashback: Decimal,
    pub referral_bonus: Decimal,
    pub net_amount: Decimal,
    pub payment_method: String,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
}

impl LedgerTransaction {
    /// Build a completed transaction from a settlement breakdown.
    ///
    /// Enforces the conservation law at construction: the components must
    /// sum exactly to the gross amount.
    pub fn from_settlement(
        idempotency_key: String,
        client_id: String,
        merchant_id: String,
        referrer_id: Option<String>,
        settlement: &Settlement,
        payment_method: String,
    ) -> Result<Self> {
        if idempotency_key.trim().is_empty() {
            return Err(AppError::validation("Idempotency key cannot be empty"));
        }
        if client_id.trim().is_empty() {
            return Err(AppError::validation("Client ID cannot be empty"));
        }
        if merchant_id.trim().is_empty() {
            return Err(AppError::validation("Merchant ID cannot be empty"));
        }
        if payment_method.trim().is_empty() {
            return Err(AppError::validation("Payment method cannot be empty"));
        }
        if settlement.component_sum() != settlement.gross_amount {
            return Err(AppError::Internal(format!(
                "Settlement components sum to {}, expected gross {}",
                settlement.component_sum(),
                settlement.gross_amount
            )));
        }

        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            idempotency_key,
            client_id,
            merchant_id,
            referrer_id,
            gross_amount: settlement.gross_amount,
            platform_fee: settlement.platform_fee,
            merchant_commission: settlement.merchant_commission,
            client_cashback: settlement.client_cashback,
            referral_bonus: settlement.referral_bonus,
            net_amount: settlement.net_amount,
            payment_method,
            status: TransactionStatus::Completed,
            created_at: Utc::now(),
        })
    }

    /// The settlement breakdown stored on this row.
    pub fn settlement(&self) -> Settlement {
        Settlement {
            gross_amount: self.gross_amount,
            platform_fee: self.platform_fee,
            merchant_commission: self.merchant_commission,
            client_cashback: self.client_cashback,
            referral_bonus: self.referral_bonus,
            net_amount: self.net_amount,
        }
    }
}
