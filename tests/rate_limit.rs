//! Rate limiting behavior at the HTTP surface.

use codegate::AppConfig;

mod common;

fn limited_config(max: u32) -> AppConfig {
    let mut config = AppConfig::default();
    config.rate_limit.window_ms = 60_000;
    config.rate_limit.max = max;
    config.admin.api_key = "test-admin-key".to_string();
    config
}

#[tokio::test]
async fn excess_requests_get_429_and_no_log_row() {
    let app = common::spawn_app(limited_config(3)).await;
    app.seed_code("ABC123", "https://example.com/a").await;

    for _ in 0..3 {
        let res = app.check("WRONG", "198.51.100.7").await;
        assert_eq!(res.status(), 200);
    }
    for _ in 0..2 {
        let res = app.check("WRONG", "198.51.100.7").await;
        assert_eq!(res.status(), 429);
    }

    // Only admitted requests reached the audit log.
    assert_eq!(app.store.logs().len(), 3);
}

#[tokio::test]
async fn limit_is_keyed_per_ip() {
    let app = common::spawn_app(limited_config(2)).await;
    app.seed_code("ABC123", "https://example.com/a").await;

    app.check("ABC123", "198.51.100.7").await;
    app.check("ABC123", "198.51.100.7").await;
    let res = app.check("ABC123", "198.51.100.7").await;
    assert_eq!(res.status(), 429);

    // A different requester is unaffected.
    let res = app.check("ABC123", "203.0.113.9").await;
    assert_eq!(res.status(), 200);
}

#[tokio::test]
async fn health_is_not_rate_limited() {
    let app = common::spawn_app(limited_config(1)).await;

    app.check("ABC123", "198.51.100.7").await;
    let res = app.check("ABC123", "198.51.100.7").await;
    assert_eq!(res.status(), 429);

    for _ in 0..10 {
        let res = app.client.get(app.url("/health")).send().await.unwrap();
        assert_eq!(res.status(), 200);
    }
}
