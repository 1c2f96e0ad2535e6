//! Admin bearer-credential middleware.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use subtle::ConstantTimeEq;

use crate::error::AppError;

/// State for the admin auth layer.
pub struct AdminAuthState {
    pub api_key: String,
}

pub async fn admin_auth_middleware(
    State(state): State<Arc<AdminAuthState>>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok());

    if let Some(auth_val) = auth_header {
        if let Some(presented) = auth_val.strip_prefix("Bearer ") {
            // Constant-time compare; ct_eq is false on length mismatch.
            if bool::from(presented.as_bytes().ct_eq(state.api_key.as_bytes())) {
                return Ok(next.run(request).await);
            }
        }
    }

    Err(AppError::Unauthorized)
}
