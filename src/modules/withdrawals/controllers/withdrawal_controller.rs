use std::sync::Arc;

use actix_web::{web, HttpResponse};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::core::error::AppError;
use crate::modules::balances::BalanceKind;
use crate::modules::withdrawals::models::WithdrawalStatus;
use crate::modules::withdrawals::services::WithdrawalProcessor;

#[derive(Debug, Deserialize)]
pub struct CreateWithdrawalRequest {
    pub user_id: String,
    pub balance_kind: BalanceKind,
    pub amount: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct TransitionRequest {
    pub status: WithdrawalStatus,
    pub actor_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub user_id: String,
    pub limit: Option<u32>,
}

/// Request a withdrawal (reserves the amount)
/// POST /withdrawals
pub async fn create_withdrawal(
    processor: web::Data<Arc<WithdrawalProcessor>>,
    body: web::Json<CreateWithdrawalRequest>,
) -> Result<HttpResponse, AppError> {
    let req = body.into_inner();
    let request = processor
        .request_withdrawal(&req.user_id, req.balance_kind, req.amount)
        .await?;

    Ok(HttpResponse::Created().json(request))
}

/// Transition a withdrawal through its lifecycle
/// PATCH /withdrawals/{id}/status
pub async fn transition_withdrawal(
    processor: web::Data<Arc<WithdrawalProcessor>>,
    path: web::Path<String>,
    body: web::Json<TransitionRequest>,
) -> Result<HttpResponse, AppError> {
    let req = body.into_inner();
    let request = processor
        .transition_withdrawal(&path.into_inner(), req.status, &req.actor_id)
        .await?;

    Ok(HttpResponse::Ok().json(request))
}

/// Fetch one withdrawal request
/// GET /withdrawals/{id}
pub async fn get_withdrawal(
    processor: web::Data<Arc<WithdrawalProcessor>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let request = processor.get_withdrawal(&path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(request))
}

/// Withdrawal history for a user
/// GET /withdrawals?user_id=...
pub async fn list_withdrawals(
    processor: web::Data<Arc<WithdrawalProcessor>>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
    let limit = query.limit.unwrap_or(50).min(100);
    let requests = processor.list_user_withdrawals(&query.user_id, limit).await?;

    Ok(HttpResponse::Ok().json(requests))
}

/// Configure withdrawal routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/withdrawals")
            .route("", web::post().to(create_withdrawal))
            .route("", web::get().to(list_withdrawals))
            .route("/{id}", web::get().to(get_withdrawal))
            .route("/{id}/status", web::patch().to(transition_withdrawal)),
    );
}
