use chrono::{DateTime, Utc};
use sqlx::{MySql, MySqlPool, Transaction};

use super::super::models::CommissionSettings;
use crate::core::{AppError, Result};

/// Repository for the append-only commission settings history.
///
/// Rows are never updated or deleted; a rate change is an insert with a new
/// `effective_from`. This keeps historical settlements reproducible.
pub struct RateRepository {
    pool: MySqlPool,
}

impl RateRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Insert a new settings version inside an open database transaction,
    /// so the version and its audit entry commit together.
    pub async fn insert_tx(
        &self,
        tx: &mut Transaction<'_, MySql>,
        settings: &CommissionSettings,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO commission_settings (
                id, platform_fee, merchant_commission, client_cashback,
                referral_bonus, withdrawal_fee, effective_from, updated_by
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&settings.id)
        .bind(settings.platform_fee)
        .bind(settings.merchant_commission)
        .bind(settings.client_cashback)
        .bind(settings.referral_bonus)
        .bind(settings.withdrawal_fee)
        .bind(settings.effective_from)
        .bind(&settings.updated_by)
        .execute(&mut **tx)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to insert commission settings: {}", e)))?;

        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<CommissionSettings>> {
        let settings = sqlx::query_as::<_, CommissionSettings>(
            r#"
            SELECT
                id, platform_fee, merchant_commission, client_cashback,
                referral_bonus, withdrawal_fee, effective_from, updated_by, created_at
            FROM commission_settings
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to fetch commission settings: {}", e)))?;

        Ok(settings)
    }

    /// The settings version in force at `as_of`: greatest `effective_from`
    /// that is not in the future relative to `as_of`.
    pub async fn find_effective_at(
        &self,
        as_of: DateTime<Utc>,
    ) -> Result<Option<CommissionSettings>> {
        let settings = sqlx::query_as::<_, CommissionSettings>(
            r#"
            SELECT
                id, platform_fee, merchant_commission, client_cashback,
                referral_bonus, withdrawal_fee, effective_from, updated_by, created_at
            FROM commission_settings
            WHERE effective_from <= ?
            ORDER BY effective_from DESC, created_at DESC
            LIMIT 1
            "#,
        )
        .bind(as_of)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to resolve commission settings: {}", e)))?;

        Ok(settings)
    }

    /// Full version history, newest first.
    pub async fn list_history(&self, limit: u32) -> Result<Vec<CommissionSettings>> {
        let history = sqlx::query_as::<_, CommissionSettings>(
            r#"
            SELECT
                id, platform_fee, merchant_commission, client_cashback,
                referral_bonus, withdrawal_fee, effective_from, updated_by, created_at
            FROM commission_settings
            ORDER BY effective_from DESC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::Internal(format!("Failed to list commission settings history: {}", e))
        })?;

        Ok(history)
    }
}
