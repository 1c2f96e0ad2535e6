//! The check pipeline and the health probe.
//!
//! # Responsibilities
//! - Validate input before any storage access
//! - Build requester context and enrich it (fail-open)
//! - Scan the credential store for a match
//! - Compute the attempt ordinal from log history (degrade to 1)
//! - Append the audit record before responding (log-before-respond)
//!
//! Within one request these steps are strictly sequential; the audit
//! trail's meaning depends on that ordering.

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    extract::{ConnectInfo, State},
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::context;
use crate::error::AppError;
use crate::http::server::AppState;
use crate::matcher;
use crate::store::models::{AttemptStatus, NewLogEntry};

#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    #[serde(default)]
    pub code: String,

    /// Client-supplied hint; takes precedence over the server heuristic.
    pub browser: Option<String>,

    /// Client-supplied hint; takes precedence over the server heuristic.
    pub device_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub valid: bool,
    pub url: Option<String>,
}

pub async fn check(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(request): Json<CheckRequest>,
) -> Result<Json<CheckResponse>, AppError> {
    let started = Instant::now();

    if request.code.trim().is_empty() {
        return Err(AppError::InvalidInput("code is required"));
    }

    let mut context = context::extract(&headers, Some(addr));
    if let Some(hint) = request.device_type.as_deref().filter(|s| !s.trim().is_empty()) {
        context.device_type = hint.to_string();
    }
    if let Some(hint) = request.browser.as_deref().filter(|s| !s.trim().is_empty()) {
        context.browser_name = hint.to_string();
    }

    // Best-effort enrichment; an unreachable provider yields null fields.
    let geo = state.geo.lookup(&context.ip).await.unwrap_or_default();

    // Credential scan is correctness-critical: failure here is a 500.
    let records = state.store.list_codes().await?;
    let outcome = matcher::find_match(&request.code, &records);

    // Advisory ordinal; degrade to 1 when history is unavailable.
    let attempt_number = match state.store.count_attempts(&request.code, &context.ip).await {
        Ok(prior) => prior + 1,
        Err(e) => {
            tracing::warn!(error = %e, "attempt count unavailable, defaulting to 1");
            1
        }
    };

    let status = if outcome.matched {
        AttemptStatus::Success
    } else {
        AttemptStatus::Failed
    };

    let entry = NewLogEntry {
        code: request.code.clone(),
        url: outcome.url.clone(),
        status,
        ip: context.ip.clone(),
        user_agent: context.user_agent,
        referer: context.referer,
        device_type: context.device_type,
        os: context.os,
        browser_name: context.browser_name,
        languages: context.languages,
        country: geo.country,
        region: geo.region,
        city: geo.city,
        attempt_number,
        response_ms: started.elapsed().as_millis() as i64,
    };

    // The check is not complete without its audit record.
    state
        .store
        .insert_log(&entry)
        .await
        .map_err(AppError::AuditWrite)?;

    if let Some(code_id) = outcome.code_id {
        if let Err(e) = state.store.record_outcome(code_id, outcome.matched).await {
            tracing::warn!(code_id, error = %e, "outcome counter update failed");
        }
    }

    tracing::info!(
        ip = %context.ip,
        matched = outcome.matched,
        attempt = attempt_number,
        elapsed_ms = entry.response_ms,
        "check completed"
    );

    Ok(Json(CheckResponse {
        valid: outcome.matched,
        url: outcome.url,
    }))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Liveness probe. Bypasses rate limiting, storage, and logging.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
