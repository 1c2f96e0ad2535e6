//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;

use codegate::context::geo::NoopGeoResolver;
use codegate::matcher;
use codegate::store::{MemoryStore, Store};
use codegate::{AppConfig, HttpServer};

pub struct TestApp {
    pub addr: SocketAddr,
    pub store: Arc<MemoryStore>,
    pub client: reqwest::Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Submit a code from a fixed client IP via the forwarded-for header.
    pub async fn check(&self, code: &str, ip: &str) -> reqwest::Response {
        self.client
            .post(self.url("/check"))
            .header("x-forwarded-for", ip)
            .json(&serde_json::json!({ "code": code }))
            .send()
            .await
            .expect("server unreachable")
    }

    /// Store a code the way the admin add path does: hashed, never plaintext.
    pub async fn seed_code(&self, code: &str, target_url: &str) -> i64 {
        let hash = matcher::hash_code(code).expect("hashing failed");
        self.store
            .insert_code(&hash, target_url)
            .await
            .expect("seed failed")
    }
}

/// Spawn the real server on an ephemeral loopback port, backed by the
/// in-memory store and the no-op geo resolver.
pub async fn spawn_app(config: AppConfig) -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let geo = Arc::new(NoopGeoResolver);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind failed");
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::new(config, store.clone(), geo);
    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });

    let client = reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap();

    TestApp { addr, store, client }
}

/// Config with rate limiting loose enough to stay out of the way.
#[allow(dead_code)]
pub fn permissive_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.rate_limit.max = 1_000;
    config.admin.api_key = "test-admin-key".to_string();
    config
}
