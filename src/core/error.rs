use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};

/// Application-wide Result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Main application error type
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// No commission settings row is effective at the requested instant.
    /// Fatal configuration gap: defaults must be seeded before any sale.
    #[error("No active commission rates as of {0}")]
    NoActiveRates(chrono::DateTime<chrono::Utc>),

    /// Caller supplied a non-positive or malformed amount
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Business-rule rejection: balance too low for the requested debit
    #[error("Insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance {
        requested: rust_decimal::Decimal,
        available: rust_decimal::Decimal,
    },

    /// Disallowed withdrawal status transition
    #[error("Invalid withdrawal transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    /// Transient write conflict; safe to retry with the same idempotency key
    #[error("Concurrency conflict: {0}")]
    ConcurrencyConflict(String),

    /// Validation errors for business rules
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Database operation errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();
        let error_message = self.to_string();

        HttpResponse::build(status_code).json(serde_json::json!({
            "error": {
                "message": error_message,
                "code": status_code.as_u16(),
                "retryable": matches!(self, AppError::ConcurrencyConflict(_)),
            }
        }))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NoActiveRates(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InvalidAmount(_) => StatusCode::BAD_REQUEST,
            AppError::InsufficientBalance { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InvalidTransition { .. } => StatusCode::CONFLICT,
            AppError::ConcurrencyConflict(_) => StatusCode::CONFLICT,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Json(_) => StatusCode::BAD_REQUEST,
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Helper functions for common error scenarios
impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        AppError::NotFound(resource.into())
    }

    pub fn invalid_amount(msg: impl Into<String>) -> Self {
        AppError::InvalidAmount(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        AppError::ConcurrencyConflict(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::InvalidAmount("zero".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::InsufficientBalance {
                requested: Decimal::new(1500, 2),
                available: Decimal::new(1000, 2),
            }
            .status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::InvalidTransition {
                from: "completed".into(),
                to: "pending".into(),
            }
            .status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::ConcurrencyConflict("balance row contended".into()).status_code(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_insufficient_balance_message() {
        let err = AppError::InsufficientBalance {
            requested: Decimal::new(1500, 2),
            available: Decimal::new(1000, 2),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient balance: requested 15.00, available 10.00"
        );
    }
}
