//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, timeout, CORS, rate limiting)
//! - Bind server to listener and serve with graceful shutdown

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::admin;
use crate::config::{AdminConfig, AppConfig};
use crate::context::geo::GeoResolver;
use crate::http::handlers;
use crate::security::rate_limit::{rate_limit_middleware, RateLimiterState};
use crate::store::Store;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub geo: Arc<dyn GeoResolver>,
    pub admin: AdminConfig,
}

/// HTTP server for the validation service.
pub struct HttpServer {
    router: Router,
    limiter: Arc<RateLimiterState>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and
    /// capabilities.
    pub fn new(config: AppConfig, store: Arc<dyn Store>, geo: Arc<dyn GeoResolver>) -> Self {
        let state = AppState {
            store,
            geo,
            admin: config.admin.clone(),
        };
        let limiter = Arc::new(RateLimiterState::new(&config.rate_limit));
        let router = Self::build_router(&config, state, limiter.clone());
        Self { router, limiter }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &AppConfig, state: AppState, limiter: Arc<RateLimiterState>) -> Router {
        // Only /check sits behind the rate limiter; the health probe and
        // the admin surface are gated differently.
        let check_routes = Router::new()
            .route("/check", post(handlers::check))
            .layer(middleware::from_fn_with_state(limiter, rate_limit_middleware))
            .layer(CorsLayer::permissive())
            .with_state(state.clone());

        Router::new()
            .merge(check_routes)
            .merge(admin::admin_router(state))
            .route("/health", get(handlers::health))
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.listener.request_timeout_secs,
                    ))),
            )
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        // Periodically drop expired rate-limit windows.
        let limiter = self.limiter.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(limiter.window().max(Duration::from_secs(1)) * 2);
            loop {
                interval.tick().await;
                limiter.sweep();
            }
        });

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}
