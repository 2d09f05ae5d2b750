use sqlx::{MySql, MySqlPool, Transaction};

use super::super::models::LedgerTransaction;
use crate::core::{AppError, Result};

const TRANSACTION_COLUMNS: &str = r#"
    id, idempotency_key, client_id, merchant_id, referrer_id,
    gross_amount, platform_fee, merchant_commission, client_cashback,
    referral_bonus, net_amount, payment_method, status, created_at
"#;

/// Repository for immutable ledger transaction rows.
///
/// Rows are insert-only: there is no update path, which is how fee
/// immutability for completed transactions is enforced. Idempotency rides on
/// the UNIQUE constraint over `idempotency_key`.
pub struct TransactionRepository {
    pool: MySqlPool,
}

impl TransactionRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Insert a transaction row inside an open database transaction.
    ///
    /// A duplicate `idempotency_key` surfaces as `ConcurrencyConflict`: the
    /// caller rolls back and re-reads the winner's row.
    pub async fn insert_tx(
        &self,
        tx: &mut Transaction<'_, MySql>,
        transaction: &LedgerTransaction,
    ) -> Result<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO transactions (
                id, idempotency_key, client_id, merchant_id, referrer_id,
                gross_amount, platform_fee, merchant_commission, client_cashback,
                referral_bonus, net_amount, payment_method, status
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&transaction.id)
        .bind(&transaction.idempotency_key)
        .bind(&transaction.client_id)
        .bind(&transaction.merchant_id)
        .bind(&transaction.referrer_id)
        .bind(transaction.gross_amount)
        .bind(transaction.platform_fee)
        .bind(transaction.merchant_commission)
        .bind(transaction.client_cashback)
        .bind(transaction.referral_bonus)
        .bind(transaction.net_amount)
        .bind(&transaction.payment_method)
        .bind(transaction.status)
        .execute(&mut **tx)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(AppError::conflict(format!(
                    "Transaction with idempotency key '{}' already exists",
                    transaction.idempotency_key
                )))
            }
            Err(e) => Err(AppError::Internal(format!(
                "Failed to insert transaction: {}",
                e
            ))),
        }
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<LedgerTransaction>> {
        let transaction = sqlx::query_as::<_, LedgerTransaction>(&format!(
            "SELECT {} FROM transactions WHERE id = ?",
            TRANSACTION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to fetch transaction: {}", e)))?;

        Ok(transaction)
    }

    /// Lookup by idempotency key, the replay path for retried postings.
    pub async fn find_by_idempotency_key(&self, key: &str) -> Result<Option<LedgerTransaction>> {
        let transaction = sqlx::query_as::<_, LedgerTransaction>(&format!(
            "SELECT {} FROM transactions WHERE idempotency_key = ?",
            TRANSACTION_COLUMNS
        ))
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::Internal(format!("Failed to fetch transaction by idempotency key: {}", e))
        })?;

        Ok(transaction)
    }

    pub async fn list_for_client(&self, client_id: &str, limit: u32) -> Result<Vec<LedgerTransaction>> {
        let transactions = sqlx::query_as::<_, LedgerTransaction>(&format!(
            "SELECT {} FROM transactions WHERE client_id = ? ORDER BY created_at DESC LIMIT ?",
            TRANSACTION_COLUMNS
        ))
        .bind(client_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to list client transactions: {}", e)))?;

        Ok(transactions)
    }

    pub async fn list_for_merchant(
        &self,
        merchant_id: &str,
        limit: u32,
    ) -> Result<Vec<LedgerTransaction>> {
        let transactions = sqlx::query_as::<_, LedgerTransaction>(&format!(
            "SELECT {} FROM transactions WHERE merchant_id = ? ORDER BY created_at DESC LIMIT ?",
            TRANSACTION_COLUMNS
        ))
        .bind(merchant_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to list merchant transactions: {}", e)))?;

        Ok(transactions)
    }
}
