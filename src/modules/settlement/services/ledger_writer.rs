use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;

use super::super::models::LedgerTransaction;
use super::super::repositories::TransactionRepository;
use super::SettlementCalculator;
use crate::core::{AppError, Result};
use crate::modules::audit::models::AuditLogEntry;
use crate::modules::audit::repositories::AuditRepository;
use crate::modules::balances::repositories::BalanceRepository;
use crate::modules::balances::BalanceKind;
use crate::modules::rates::services::RateResolver;

/// A sale to be settled and posted to the ledger.
#[derive(Debug, Clone, Deserialize)]
pub struct PostSaleRequest {
    pub client_id: String,
    pub merchant_id: String,
    pub gross_amount: Decimal,
    pub payment_method: String,
    pub referrer_id: Option<String>,
    /// Caller-generated; retries with the same key replay the original row
    pub idempotency_key: String,
}

/// Posts settled sales to the ledger.
///
/// One posting is one database transaction covering: the immutable
/// transaction row, the client cashback credit, the merchant payable credit,
/// the optional referrer credit, and the audit entry. Nothing outside this
/// service and the withdrawal processor writes to balance rows.
pub struct LedgerWriter {
    transaction_repo: TransactionRepository,
    balance_repo: BalanceRepository,
    audit_repo: AuditRepository,
    rate_resolver: Arc<RateResolver>,
    calculator: SettlementCalculator,
}

impl LedgerWriter {
    pub fn new(
        transaction_repo: TransactionRepository,
        balance_repo: BalanceRepository,
        audit_repo: AuditRepository,
        rate_resolver: Arc<RateResolver>,
    ) -> Self {
        Self {
            transaction_repo,
            balance_repo,
            audit_repo,
            rate_resolver,
            calculator: SettlementCalculator::new(),
        }
    }

    /// Settle a sale with the rates in force now and post it atomically.
    ///
    /// Idempotent: a retry with the same key returns the stored row without
    /// re-applying any balance delta, whether the duplicate is detected by
    /// the pre-check or by the UNIQUE constraint under a concurrent race.
    pub async fn post_transaction(&self, request: PostSaleRequest) -> Result<LedgerTransaction> {
        // Replay path for retried requests
        if let Some(existing) = self
            .transaction_repo
            .find_by_idempotency_key(&request.idempotency_key)
            .await?
        {
            tracing::info!(
                idempotency_key = %request.idempotency_key,
                transaction_id = %existing.id,
                "Transaction already posted (idempotent replay)"
            );
            return Ok(existing);
        }

        let rates = self.rate_resolver.resolve_rates(Utc::now()).await?;

        // No referrer on record: the referral share stays in the net amount
        let rates = if request.referrer_id.is_some() {
            rates
        } else {
            rates.without_referral()
        };

        let settlement = self
            .calculator
            .compute_settlement(request.gross_amount, &rates)?;

        let transaction = LedgerTransaction::from_settlement(
            request.idempotency_key.clone(),
            request.client_id.clone(),
            request.merchant_id.clone(),
            request.referrer_id.clone(),
            &settlement,
            request.payment_method.clone(),
        )?;

        let mut tx = self
            .transaction_repo
            .pool()
            .begin()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to start transaction: {}", e)))?;

        match self.transaction_repo.insert_tx(&mut tx, &transaction).await {
            Ok(()) => {}
            Err(AppError::ConcurrencyConflict(_)) => {
                // Lost the race to a concurrent posting with the same key:
                // roll back and return the winner's row.
                tx.rollback()
                    .await
                    .map_err(|e| AppError::Internal(format!("Failed to roll back: {}", e)))?;
                return self
                    .transaction_repo
                    .find_by_idempotency_key(&request.idempotency_key)
                    .await?
                    .ok_or_else(|| {
                        AppError::conflict(format!(
                            "Concurrent posting for idempotency key '{}'; retry the request",
                            request.idempotency_key
                        ))
                    });
            }
            Err(e) => return Err(e),
        }

        self.balance_repo
            .credit_tx(
                &mut tx,
                &transaction.client_id,
                BalanceKind::Cashback,
                settlement.client_cashback,
            )
            .await?;

        self.balance_repo
            .credit_tx(
                &mut tx,
                &transaction.merchant_id,
                BalanceKind::Payable,
                settlement.merchant_payout(),
            )
            .await?;

        if let Some(referrer_id) = &transaction.referrer_id {
            self.balance_repo
                .credit_tx(
                    &mut tx,
                    referrer_id,
                    BalanceKind::Referral,
                    settlement.referral_bonus,
                )
                .await?;
        }

        let audit = AuditLogEntry::new(
            "transaction.posted",
            &transaction.client_id,
            serde_json::json!({
                "transaction_id": transaction.id,
                "idempotency_key": transaction.idempotency_key,
                "merchant_id": transaction.merchant_id,
                "referrer_id": transaction.referrer_id,
                "gross_amount": transaction.gross_amount,
                "client_cashback": settlement.client_cashback,
                "merchant_payout": settlement.merchant_payout(),
                "referral_bonus": settlement.referral_bonus,
                "payment_method": transaction.payment_method,
            }),
        );
        self.audit_repo.append_tx(&mut tx, &audit).await?;

        tx.commit()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to commit transaction: {}", e)))?;

        tracing::info!(
            transaction_id = %transaction.id,
            client_id = %transaction.client_id,
            merchant_id = %transaction.merchant_id,
            gross_amount = %transaction.gross_amount,
            net_amount = %transaction.net_amount,
            "Posted ledger transaction"
        );

        Ok(transaction)
    }

    pub async fn get_transaction(&self, id: &str) -> Result<LedgerTransaction> {
        self.transaction_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Transaction '{}' not found", id)))
    }

    pub async fn list_client_transactions(
        &self,
        client_id: &str,
        limit: u32,
    ) -> Result<Vec<LedgerTransaction>> {
        self.transaction_repo.list_for_client(client_id, limit).await
    }

    pub async fn list_merchant_transactions(
        &self,
        merchant_id: &str,
        limit: u32,
    ) -> Result<Vec<LedgerTransaction>> {
        self.transaction_repo
            .list_for_merchant(merchant_id, limit)
            .await
    }
}
