use std::sync::Arc;

use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::core::error::AppError;
use crate::modules::rates::models::RateSet;
use crate::modules::rates::services::RateResolver;

#[derive(Debug, Deserialize)]
pub struct PublishRatesRequest {
    #[serde(flatten)]
    pub rates: RateSet,
    /// Defaults to now when omitted
    pub effective_from: Option<DateTime<Utc>>,
    pub updated_by: String,
}

#[derive(Debug, Deserialize)]
pub struct RatesQuery {
    /// Resolve rates as of this instant; defaults to now
    pub as_of: Option<DateTime<Utc>>,
}

/// Current (or historical) commission settings
/// GET /rates?as_of=...
pub async fn get_rates(
    resolver: web::Data<Arc<RateResolver>>,
    query: web::Query<RatesQuery>,
) -> Result<HttpResponse, AppError> {
    let as_of = query.as_of.unwrap_or_else(Utc::now);
    let settings = resolver.current_settings(as_of).await?;

    Ok(HttpResponse::Ok().json(settings))
}

/// Publish a new commission settings version (append-only)
/// POST /rates
pub async fn publish_rates(
    resolver: web::Data<Arc<RateResolver>>,
    body: web::Json<PublishRatesRequest>,
) -> Result<HttpResponse, AppError> {
    let req = body.into_inner();
    let effective_from = req.effective_from.unwrap_or_else(Utc::now);

    let settings = resolver
        .publish_rates(req.rates, effective_from, req.updated_by)
        .await?;

    Ok(HttpResponse::Created().json(settings))
}

/// Settings version history
/// GET /rates/history
pub async fn rate_history(
    resolver: web::Data<Arc<RateResolver>>,
) -> Result<HttpResponse, AppError> {
    let history = resolver.history(100).await?;

    Ok(HttpResponse::Ok().json(history))
}

/// Configure rate routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/rates")
            .route("", web::get().to(get_rates))
            .route("", web::post().to(publish_rates))
            .route("/history", web::get().to(rate_history)),
    );
}
