use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::error::AppError;
use crate::modules::balances::repositories::BalanceRepository;

/// All balance rows for a user
/// GET /balances/{user_id}
pub async fn get_balances(
    repo: web::Data<Arc<BalanceRepository>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let balances = repo.list_for_user(&path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(balances))
}

/// Configure balance routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/balances/{user_id}", web::get().to(get_balances));
}
