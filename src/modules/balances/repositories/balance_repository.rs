use rust_decimal::Decimal;
use sqlx::{MySql, MySqlPool, Transaction};

use super::super::models::{Balance, BalanceKind};
use crate::core::{AppError, Result};

/// Repository for ledger balance rows.
///
/// Credits and debits only exist as transactional variants: every mutation
/// must ride inside the same database transaction as the transaction record
/// or withdrawal request that explains it. Both use single-statement atomic
/// arithmetic at the storage layer, so concurrent postings to the same row
/// serialize on the row lock instead of racing an application-level
/// read-modify-write.
pub struct BalanceRepository {
    pool: MySqlPool,
}

impl BalanceRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Current amount for one balance row; zero when the row does not exist.
    pub async fn amount_of(&self, user_id: &str, kind: BalanceKind) -> Result<Decimal> {
        let row: Option<(Decimal,)> = sqlx::query_as(
            r#"
            SELECT amount
            FROM balances
            WHERE user_id = ? AND kind = ?
            "#,
        )
        .bind(user_id)
        .bind(kind)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to fetch balance: {}", e)))?;

        Ok(row.map(|r| r.0).unwrap_or_default())
    }

    /// All balance rows for a user.
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<Balance>> {
        let balances = sqlx::query_as::<_, Balance>(
            r#"
            SELECT user_id, kind, amount, updated_at
            FROM balances
            WHERE user_id = ?
            ORDER BY kind
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to list balances: {}", e)))?;

        Ok(balances)
    }

    /// Atomically credit a balance row, creating it at zero first if absent.
    pub async fn credit_tx(
        &self,
        tx: &mut Transaction<'_, MySql>,
        user_id: &str,
        kind: BalanceKind,
        amount: Decimal,
    ) -> Result<()> {
        if amount < Decimal::ZERO {
            return Err(AppError::Internal(format!(
                "Credit amount cannot be negative: {}",
                amount
            )));
        }
        if amount == Decimal::ZERO {
            return Ok(());
        }

        sqlx::query(
            r#"
            INSERT INTO balances (user_id, kind, amount)
            VALUES (?, ?, ?)
            ON DUPLICATE KEY UPDATE
                amount = amount + VALUES(amount),
                updated_at = NOW()
            "#,
        )
        .bind(user_id)
        .bind(kind)
        .bind(amount)
        .execute(&mut **tx)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to credit balance: {}", e)))?;

        Ok(())
    }

    /// Atomically debit a balance row, failing without side effects when the
    /// available amount is insufficient.
    ///
    /// The `amount >= ?` guard makes the non-negativity invariant a property
    /// of the statement itself: a concurrent debit that drained the row
    /// first leaves this one matching zero rows.
    pub async fn debit_tx(
        &self,
        tx: &mut Transaction<'_, MySql>,
        user_id: &str,
        kind: BalanceKind,
        amount: Decimal,
    ) -> Result<()> {
        if amount <= Decimal::ZERO {
            return Err(AppError::Internal(format!(
                "Debit amount must be positive: {}",
                amount
            )));
        }

        let result = sqlx::query(
            r#"
            UPDATE balances
            SET amount = amount - ?, updated_at = NOW()
            WHERE user_id = ? AND kind = ? AND amount >= ?
            "#,
        )
        .bind(amount)
        .bind(user_id)
        .bind(kind)
        .bind(amount)
        .execute(&mut **tx)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to debit balance: {}", e)))?;

        if result.rows_affected() == 0 {
            let available = self.amount_of_tx(tx, user_id, kind).await?;
            return Err(AppError::InsufficientBalance {
                requested: amount,
                available,
            });
        }

        Ok(())
    }

    /// Balance amount read inside an open transaction (sees its own writes).
    async fn amount_of_tx(
        &self,
        tx: &mut Transaction<'_, MySql>,
        user_id: &str,
        kind: BalanceKind,
    ) -> Result<Decimal> {
        let row: Option<(Decimal,)> = sqlx::query_as(
            r#"
            SELECT amount
            FROM balances
            WHERE user_id = ? AND kind = ?
            "#,
        )
        .bind(user_id)
        .bind(kind)
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to fetch balance: {}", e)))?;

        Ok(row.map(|r| r.0).unwrap_or_default())
    }
}
