use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;

use super::super::models::{WithdrawalRequest, WithdrawalStatus};
use super::super::repositories::WithdrawalRepository;
use crate::core::{money, AppError, Result};
use crate::modules::audit::models::AuditLogEntry;
use crate::modules::audit::repositories::AuditRepository;
use crate::modules::balances::repositories::BalanceRepository;
use crate::modules::balances::BalanceKind;
use crate::modules::rates::services::RateResolver;

/// Handles withdrawal requests and their status lifecycle.
///
/// Reservation pattern: the requested amount is debited when the request is
/// created. Approval and processing only move the status; rejection is the
/// compensating credit. Debit, request row and audit entry commit together.
pub struct WithdrawalProcessor {
    withdrawal_repo: WithdrawalRepository,
    balance_repo: BalanceRepository,
    audit_repo: AuditRepository,
    rate_resolver: Arc<RateResolver>,
}

impl WithdrawalProcessor {
    pub fn new(
        withdrawal_repo: WithdrawalRepository,
        balance_repo: BalanceRepository,
        audit_repo: AuditRepository,
        rate_resolver: Arc<RateResolver>,
    ) -> Self {
        Self {
            withdrawal_repo,
            balance_repo,
            audit_repo,
            rate_resolver,
        }
    }

    /// Create a pending withdrawal request, reserving the amount.
    ///
    /// # Errors
    /// * `InvalidAmount` - non-positive or sub-cent amount
    /// * `InsufficientBalance` - the balance row cannot cover the amount;
    ///   nothing is debited and no request row is created
    pub async fn request_withdrawal(
        &self,
        user_id: &str,
        balance_kind: BalanceKind,
        amount: Decimal,
    ) -> Result<WithdrawalRequest> {
        money::validate_amount(amount)?;

        let rates = self.rate_resolver.resolve_rates(Utc::now()).await?;
        let fee = money::apply_rate(amount, rates.withdrawal_fee);

        let request = WithdrawalRequest::new(user_id.to_string(), balance_kind, amount, fee)?;

        let mut tx = self
            .withdrawal_repo
            .pool()
            .begin()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to start transaction: {}", e)))?;

        // Reservation debit; fails the whole request when insufficient
        self.balance_repo
            .debit_tx(&mut tx, user_id, balance_kind, amount)
            .await?;

        self.withdrawal_repo.insert_tx(&mut tx, &request).await?;

        let audit = AuditLogEntry::new(
            "withdrawal.requested",
            user_id,
            serde_json::json!({
                "withdrawal_id": request.id,
                "balance_kind": balance_kind,
                "amount": amount,
                "fee": fee,
            }),
        );
        self.audit_repo.append_tx(&mut tx, &audit).await?;

        tx.commit()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to commit transaction: {}", e)))?;

        tracing::info!(
            withdrawal_id = %request.id,
            user_id = %user_id,
            amount = %amount,
            fee = %fee,
            "Created withdrawal request"
        );

        Ok(request)
    }

    /// Move a withdrawal request through its lifecycle.
    ///
    /// Enforces the state machine under a row lock; a rejection credits the
    /// reserved amount back in the same database transaction.
    ///
    /// # Errors
    /// * `InvalidTransition` - the state machine does not allow the move
    pub async fn transition_withdrawal(
        &self,
        id: &str,
        new_status: WithdrawalStatus,
        actor_id: &str,
    ) -> Result<WithdrawalRequest> {
        if actor_id.trim().is_empty() {
            return Err(AppError::validation("Actor ID cannot be empty"));
        }

        let mut tx = self
            .withdrawal_repo
            .pool()
            .begin()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to start transaction: {}", e)))?;

        let request = self
            .withdrawal_repo
            .find_by_id_for_update(&mut tx, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Withdrawal request '{}' not found", id)))?;

        if !request.status.can_transition_to(new_status) {
            return Err(AppError::InvalidTransition {
                from: request.status.to_string(),
                to: new_status.to_string(),
            });
        }

        self.withdrawal_repo
            .update_status_tx(&mut tx, id, new_status)
            .await?;

        // Compensating credit: rejection returns the reservation
        if new_status == WithdrawalStatus::Rejected {
            self.balance_repo
                .credit_tx(&mut tx, &request.user_id, request.balance_kind, request.amount)
                .await?;
        }

        let audit = AuditLogEntry::new(
            "withdrawal.transitioned",
            &request.user_id,
            serde_json::json!({
                "withdrawal_id": request.id,
                "from": request.status,
                "to": new_status,
                "actor_id": actor_id,
                "amount": request.amount,
            }),
        );
        self.audit_repo.append_tx(&mut tx, &audit).await?;

        tx.commit()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to commit transaction: {}", e)))?;

        tracing::info!(
            withdrawal_id = %request.id,
            from = %request.status,
            to = %new_status,
            actor_id = %actor_id,
            "Withdrawal status transition"
        );

        Ok(WithdrawalRequest {
            status: new_status,
            updated_at: Utc::now(),
            ..request
        })
    }

    pub async fn get_withdrawal(&self, id: &str) -> Result<WithdrawalRequest> {
        self.withdrawal_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Withdrawal request '{}' not found", id)))
    }

    pub async fn list_user_withdrawals(
        &self,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<WithdrawalRequest>> {
        self.withdrawal_repo.list_for_user(user_id, limit).await
    }
}
