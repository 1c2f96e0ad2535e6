use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::http::server::AppState;
use crate::matcher;
use crate::store::models::LogEntry;

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
}

pub async fn get_status() -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
    })
}

#[derive(Debug, Deserialize)]
pub struct AddCodeRequest {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct AddCodeResponse {
    pub added: bool,
    pub id: i64,
}

/// Hash the plaintext and persist hash + destination. The plaintext is
/// never stored.
pub async fn add_code(
    State(state): State<AppState>,
    Json(request): Json<AddCodeRequest>,
) -> Result<Json<AddCodeResponse>, AppError> {
    if request.code.trim().is_empty() || request.url.trim().is_empty() {
        return Err(AppError::InvalidInput("code and url are required"));
    }

    let hash = matcher::hash_code(&request.code)?;
    let id = state.store.insert_code(&hash, &request.url).await?;
    tracing::info!(code_id = id, "access code added");

    Ok(Json(AddCodeResponse { added: true, id }))
}

#[derive(Debug, Deserialize)]
pub struct DeleteCodeRequest {
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub struct DeleteCodeResponse {
    pub deleted: bool,
}

pub async fn delete_code(
    State(state): State<AppState>,
    Json(request): Json<DeleteCodeRequest>,
) -> Result<Json<DeleteCodeResponse>, AppError> {
    let deleted = state.store.delete_code(request.id).await?;
    if deleted {
        tracing::info!(code_id = request.id, "access code deleted");
    }
    Ok(Json(DeleteCodeResponse { deleted }))
}

/// Recent audit records, newest first, capped by configuration.
pub async fn get_logs(State(state): State<AppState>) -> Result<Json<Vec<LogEntry>>, AppError> {
    let logs = state.store.recent_logs(state.admin.max_log_rows).await?;
    Ok(Json(logs))
}
