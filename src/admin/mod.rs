//! Admin surface: code management and log inspection, behind bearer auth.

pub mod handlers;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::http::server::AppState;
use crate::security::auth::{admin_auth_middleware, AdminAuthState};

use self::handlers::*;

pub fn admin_router(state: AppState) -> Router {
    let auth_state = Arc::new(AdminAuthState {
        api_key: state.admin.api_key.clone(),
    });

    Router::new()
        .route("/admin/status", get(get_status))
        .route("/admin/add", post(add_code))
        .route("/admin/delete", post(delete_code))
        .route("/admin/logs", get(get_logs))
        .layer(middleware::from_fn_with_state(
            auth_state,
            admin_auth_middleware,
        ))
        .with_state(state)
}
