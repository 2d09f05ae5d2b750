use chrono::{DateTime, Utc};
use serde_json::json;

use super::super::models::{CommissionSettings, RateSet};
use super::super::repositories::RateRepository;
use crate::core::{AppError, Result};
use crate::modules::audit::models::AuditLogEntry;
use crate::modules::audit::repositories::AuditRepository;

/// Resolves the commission rates in force at a point in time.
///
/// Transactions are always settled with the rates in force at the time of
/// sale, not the rates in force when a report is later generated. The
/// resolver is read-only; publishing a new version goes through
/// `publish_rates`, which inserts a row and never mutates history.
pub struct RateResolver {
    rate_repo: RateRepository,
    audit_repo: AuditRepository,
}

impl RateResolver {
    pub fn new(rate_repo: RateRepository, audit_repo: AuditRepository) -> Self {
        Self {
            rate_repo,
            audit_repo,
        }
    }

    /// Rates in force at `as_of`.
    ///
    /// # Errors
    /// * `NoActiveRates` - no settings version has `effective_from <= as_of`.
    ///   Seeding a default version at system initialization is a deployment
    ///   precondition; this error means that precondition was violated.
    pub async fn resolve_rates(&self, as_of: DateTime<Utc>) -> Result<RateSet> {
        let settings = self
            .rate_repo
            .find_effective_at(as_of)
            .await?
            .ok_or(AppError::NoActiveRates(as_of))?;

        Ok(settings.rates())
    }

    /// The full settings row in force at `as_of`, for admin display.
    pub async fn current_settings(&self, as_of: DateTime<Utc>) -> Result<CommissionSettings> {
        self.rate_repo
            .find_effective_at(as_of)
            .await?
            .ok_or(AppError::NoActiveRates(as_of))
    }

    /// Publish a new settings version. Append-only: the previous version
    /// stays untouched and still governs transactions settled before
    /// `effective_from`.
    pub async fn publish_rates(
        &self,
        rates: RateSet,
        effective_from: DateTime<Utc>,
        updated_by: String,
    ) -> Result<CommissionSettings> {
        let settings = CommissionSettings::new(rates, effective_from, updated_by)?;

        let mut tx = self
            .rate_repo
            .pool()
            .begin()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to begin transaction: {}", e)))?;

        self.rate_repo.insert_tx(&mut tx, &settings).await?;

        let audit_entry = AuditLogEntry::new(
            "rates.published",
            &settings.updated_by,
            json!({
                "settings_id": settings.id,
                "effective_from": settings.effective_from,
                "platform_fee": settings.platform_fee,
                "merchant_commission": settings.merchant_commission,
                "client_cashback": settings.client_cashback,
                "referral_bonus": settings.referral_bonus,
                "withdrawal_fee": settings.withdrawal_fee,
            }),
        );
        self.audit_repo.append_tx(&mut tx, &audit_entry).await?;

        tx.commit()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to commit transaction: {}", e)))?;

        let inserted = self.rate_repo.find_by_id(&settings.id).await?.ok_or_else(|| {
            AppError::Internal("Commission settings were inserted but not found".to_string())
        })?;

        tracing::info!(
            settings_id = %inserted.id,
            effective_from = %inserted.effective_from,
            updated_by = %inserted.updated_by,
            "Published new commission settings version"
        );

        Ok(inserted)
    }

    /// Version history, newest first.
    pub async fn history(&self, limit: u32) -> Result<Vec<CommissionSettings>> {
        self.rate_repo.list_history(limit).await
    }
}
