use sqlx::{MySql, MySqlPool, Transaction};

use super::super::models::{WithdrawalRequest, WithdrawalStatus};
use crate::core::{AppError, Result};

const WITHDRAWAL_COLUMNS: &str = r#"
    id, user_id, balance_kind, amount, fee, status, created_at, updated_at
"#;

/// Repository for withdrawal requests.
pub struct WithdrawalRepository {
    pool: MySqlPool,
}

impl WithdrawalRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    pub async fn insert_tx(
        &self,
        tx: &mut Transaction<'_, MySql>,
        request: &WithdrawalRequest,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO withdrawal_requests (id, user_id, balance_kind, amount, fee, status)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&request.id)
        .bind(&request.user_id)
        .bind(request.balance_kind)
        .bind(request.amount)
        .bind(request.fee)
        .bind(request.status)
        .execute(&mut **tx)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to insert withdrawal request: {}", e)))?;

        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<WithdrawalRequest>> {
        let request = sqlx::query_as::<_, WithdrawalRequest>(&format!(
            "SELECT {} FROM withdrawal_requests WHERE id = ?",
            WITHDRAWAL_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to fetch withdrawal request: {}", e)))?;

        Ok(request)
    }

    /// Fetch with a row lock inside an open transaction. Serializes status
    /// transitions on the same request: the second of two concurrent
    /// transitions blocks here, then sees the first one's status.
    pub async fn find_by_id_for_update(
        &self,
        tx: &mut Transaction<'_, MySql>,
        id: &str,
    ) -> Result<Option<WithdrawalRequest>> {
        let request = sqlx::query_as::<_, WithdrawalRequest>(&format!(
            "SELECT {} FROM withdrawal_requests WHERE id = ? FOR UPDATE",
            WITHDRAWAL_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| {
            AppError::Internal(format!("Failed to lock withdrawal request: {}", e))
        })?;

        Ok(request)
    }

    pub async fn update_status_tx(
        &self,
        tx: &mut Transaction<'_, MySql>,
        id: &str,
        new_status: WithdrawalStatus,
    ) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE withdrawal_requests
            SET status = ?, updated_at = NOW()
            WHERE id = ?
            "#,
        )
        .bind(new_status)
        .bind(id)
        .execute(&mut **tx)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to update withdrawal status: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Withdrawal request with id '{}' not found",
                id
            )));
        }

        Ok(())
    }

    pub async fn list_for_user(&self, user_id: &str, limit: u32) -> Result<Vec<WithdrawalRequest>> {
        let requests = sqlx::query_as::<_, WithdrawalRequest>(&format!(
            "SELECT {} FROM withdrawal_requests WHERE user_id = ? ORDER BY created_at DESC LIMIT ?",
            WITHDRAWAL_COLUMNS
        ))
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to list withdrawal requests: {}", e)))?;

        Ok(requests)
    }
}
