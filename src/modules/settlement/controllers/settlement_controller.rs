use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::core::error::AppError;
use crate::modules::settlement::services::{LedgerWriter, PostSaleRequest};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub client_id: Option<String>,
    pub merchant_id: Option<String>,
    pub limit: Option<u32>,
}

/// Settle and post a sale
/// POST /settlements
pub async fn post_settlement(
    ledger: web::Data<Arc<LedgerWriter>>,
    body: web::Json<PostSaleRequest>,
) -> Result<HttpResponse, AppError> {
    let transaction = ledger.post_transaction(body.into_inner()).await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "transaction": transaction,
        "settlement": transaction.settlement(),
    })))
}

/// Fetch a posted transaction
/// GET /transactions/{id}
pub async fn get_transaction(
    ledger: web::Data<Arc<LedgerWriter>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let transaction = ledger.get_transaction(&path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(transaction))
}

/// Transaction history for a client or merchant
/// GET /transactions?client_id=... | ?merchant_id=...
pub async fn list_transactions(
    ledger: web::Data<Arc<LedgerWriter>>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
    let limit = query.limit.unwrap_or(50).min(100);

    let transactions = match (&query.client_id, &query.merchant_id) {
        (Some(client_id), None) => ledger.list_client_transactions(client_id, limit).await?,
        (None, Some(merchant_id)) => ledger.list_merchant_transactions(merchant_id, limit).await?,
        _ => {
            return Err(AppError::validation(
                "Provide exactly one of client_id or merchant_id",
            ))
        }
    };

    Ok(HttpResponse::Ok().json(transactions))
}

/// Configure settlement routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/settlements", web::post().to(post_settlement))
        .service(
            web::scope("/transactions")
                .route("", web::get().to(list_transactions))
                .route("/{id}", web::get().to(get_transaction)),
        );
}
