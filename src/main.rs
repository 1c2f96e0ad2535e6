//! Service entry point.
//!
//! ```text
//!                        ┌──────────────────────────────────────────┐
//!                        │               CODEGATE                   │
//!                        │                                          │
//!   POST /check ─────────┼─▶ rate limit ─▶ context ─▶ matcher ──┐   │
//!                        │                                      ▼   │
//!   {valid, url} ◀───────┼── response ◀── audit log ◀── attempt #   │
//!                        │                                          │
//!                        │  /admin/* (bearer auth): add/delete/logs │
//!                        │  /health: liveness, bypasses everything  │
//!                        └──────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use codegate::config::loader::load_config;
use codegate::context::geo::{GeoResolver, HttpGeoResolver, NoopGeoResolver};
use codegate::store::{PostgresStore, Store};
use codegate::HttpServer;

#[derive(Parser)]
#[command(name = "codegate")]
#[command(about = "Access-code validation and audit-logging service", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file. Missing file means defaults
    /// plus environment overrides.
    #[arg(short, long, default_value = "codegate.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    // RUST_LOG wins; the configured level is the fallback.
    let default_filter = format!(
        "codegate={level},tower_http={level}",
        level = config.observability.log_level
    );
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "codegate starting");

    tracing::info!(
        config_file = %cli.config.display(),
        bind_address = %config.listener.bind_address,
        rate_limit_window_ms = config.rate_limit.window_ms,
        rate_limit_max = config.rate_limit.max,
        geolocation_enabled = config.geolocation.enabled,
        "Configuration loaded"
    );

    let store: Arc<dyn Store> = Arc::new(PostgresStore::connect(&config.database).await?);
    tracing::info!(
        host = %config.database.host,
        database = %config.database.name,
        pool_size = config.database.pool_size,
        "Database connected"
    );

    let geo: Arc<dyn GeoResolver> = if config.geolocation.enabled {
        Arc::new(HttpGeoResolver::new(&config.geolocation)?)
    } else {
        Arc::new(NoopGeoResolver)
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(config, store, geo);
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
