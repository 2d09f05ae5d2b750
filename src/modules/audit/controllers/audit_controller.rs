use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::core::error::AppError;
use crate::modules::audit::repositories::AuditRepository;

#[derive(Debug, Deserialize)]
pub struct AuditQuery {
    pub user_id: String,
    pub limit: Option<u32>,
}

/// Audit trail for a user, newest first
/// GET /audit?user_id=...
pub async fn list_audit_entries(
    repo: web::Data<Arc<AuditRepository>>,
    query: web::Query<AuditQuery>,
) -> Result<HttpResponse, AppError> {
    let limit = query.limit.unwrap_or(50).min(100);
    let entries = repo.list_for_user(&query.user_id, limit).await?;

    Ok(HttpResponse::Ok().json(entries))
}

/// Configure audit routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/audit", web::get().to(list_audit_entries));
}
