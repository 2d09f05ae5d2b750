use sqlx::{MySql, MySqlPool, Transaction};

use super::super::models::AuditLogEntry;
use crate::core::{AppError, Result};

/// Repository for the append-only audit log.
pub struct AuditRepository {
    pool: MySqlPool,
}

impl AuditRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Append an entry inside an open database transaction, so the entry
    /// commits (or rolls back) together with the change it records.
    pub async fn append_tx(
        &self,
        tx: &mut Transaction<'_, MySql>,
        entry: &AuditLogEntry,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO audit_logs (id, action, user_id, details)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&entry.id)
        .bind(&entry.action)
        .bind(&entry.user_id)
        .bind(&entry.details)
        .execute(&mut **tx)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to append audit entry: {}", e)))?;

        Ok(())
    }

    /// Entries for one user, newest first.
    pub async fn list_for_user(&self, user_id: &str, limit: u32) -> Result<Vec<AuditLogEntry>> {
        let entries = sqlx::query_as::<_, AuditLogEntry>(
            r#"
            SELECT id, action, user_id, details, created_at
            FROM audit_logs
            WHERE user_id = ?
            ORDER BY created_at DESC
            LIMIT ?
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to list audit entries: {}", e)))?;

        Ok(entries)
    }
}
