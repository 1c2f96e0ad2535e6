//! Application error taxonomy and HTTP mapping.
//!
//! # Design Decisions
//! - One enum for everything a handler can surface to a client
//! - Internal detail is logged; clients only ever see a generic message
//! - Enrichment failures never appear here: they are defaulted at the
//!   call site, not propagated

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Missing or empty client input. Rejected before any storage access.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    /// Bad or missing admin credential. No mutation performed.
    #[error("unauthorized")]
    Unauthorized,

    /// Request rejected by the rate limiter before reaching the handler.
    #[error("rate limited")]
    RateLimited,

    /// Credential scan or other storage read failed.
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),

    /// The audit record could not be written. The check is not complete
    /// without its audit trail, so this fails the whole request.
    #[error("audit write failed: {0}")]
    AuditWrite(StoreError),

    /// Hashing a new code failed.
    #[error("hashing failed: {0}")]
    Hashing(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, *msg),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized"),
            AppError::RateLimited => (StatusCode::TOO_MANY_REQUESTS, "rate limit exceeded"),
            AppError::Storage(e) => {
                tracing::error!(error = %e, "storage failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error")
            }
            AppError::AuditWrite(e) => {
                tracing::error!(error = %e, "audit log insert failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error")
            }
            AppError::Hashing(e) => {
                tracing::error!(error = %e, "code hashing failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error")
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
