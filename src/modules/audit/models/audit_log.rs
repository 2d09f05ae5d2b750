use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Append-only audit trail entry.
///
/// Every state-changing operation on transactions, balances, rates or
/// withdrawal requests writes exactly one entry, inside the same database
/// transaction as the change itself. Entries are never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuditLogEntry {
    pub id: String,
    /// Machine-readable action name, e.g. "transaction.posted"
    pub action: String,
    /// User the action concerns (client, merchant or admin actor)
    pub user_id: String,
    /// Structured context: amounts, ids, old/new statuses
    pub details: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl AuditLogEntry {
    pub fn new(action: impl Into<String>, user_id: impl Into<String>, details: serde_json::Value) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            action: action.into(),
            user_id: user_id.into(),
            details,
            created_at: Utc::now(),
        }
    }
}
