//! Admin surface: credential gating, code management, log inspection.

use serde_json::Value;

mod common;

const KEY: &str = "test-admin-key";

#[tokio::test]
async fn add_without_credential_is_rejected_without_mutation() {
    let app = common::spawn_app(common::permissive_config()).await;

    let res = app
        .client
        .post(app.url("/admin/add"))
        .json(&serde_json::json!({ "code": "ABC123", "url": "https://example.com/a" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 401);
    assert!(app.store.codes().is_empty());
}

#[tokio::test]
async fn wrong_credential_is_rejected() {
    let app = common::spawn_app(common::permissive_config()).await;

    let res = app
        .client
        .post(app.url("/admin/add"))
        .bearer_auth("wrong-key")
        .json(&serde_json::json!({ "code": "ABC123", "url": "https://example.com/a" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 401);
    assert!(app.store.codes().is_empty());
}

#[tokio::test]
async fn added_code_is_hashed_and_usable_end_to_end() {
    let app = common::spawn_app(common::permissive_config()).await;

    let res = app
        .client
        .post(app.url("/admin/add"))
        .bearer_auth(KEY)
        .json(&serde_json::json!({ "code": "ABC123", "url": "https://example.com/a" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["added"], Value::Bool(true));

    // Plaintext is never persisted.
    let codes = app.store.codes();
    assert_eq!(codes.len(), 1);
    assert!(codes[0].code_hash.starts_with("$argon2"));
    assert_ne!(codes[0].code_hash, "ABC123");

    // The stored hash verifies through the public check path.
    let res = app.check("ABC123", "198.51.100.7").await;
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["valid"], Value::Bool(true));
    assert_eq!(body["url"], Value::String("https://example.com/a".into()));
}

#[tokio::test]
async fn add_with_missing_fields_is_a_400() {
    let app = common::spawn_app(common::permissive_config()).await;

    let res = app
        .client
        .post(app.url("/admin/add"))
        .bearer_auth(KEY)
        .json(&serde_json::json!({ "code": "ABC123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
    assert!(app.store.codes().is_empty());
}

#[tokio::test]
async fn delete_reports_whether_a_row_existed() {
    let app = common::spawn_app(common::permissive_config()).await;
    let id = app.seed_code("ABC123", "https://example.com/a").await;

    let res = app
        .client
        .post(app.url("/admin/delete"))
        .bearer_auth(KEY)
        .json(&serde_json::json!({ "id": id }))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["deleted"], Value::Bool(true));

    let res = app
        .client
        .post(app.url("/admin/delete"))
        .bearer_auth(KEY)
        .json(&serde_json::json!({ "id": id }))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["deleted"], Value::Bool(false));

    // Deleted code no longer validates, but its history remains queryable.
    let res = app.check("ABC123", "198.51.100.7").await;
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["valid"], Value::Bool(false));
}

#[tokio::test]
async fn logs_are_newest_first_and_capped() {
    let mut config = common::permissive_config();
    config.admin.max_log_rows = 2;
    let app = common::spawn_app(config).await;
    app.seed_code("ABC123", "https://example.com/a").await;

    app.check("ABC123", "198.51.100.7").await;
    app.check("WRONG1", "198.51.100.7").await;
    app.check("WRONG2", "198.51.100.7").await;

    let res = app
        .client
        .get(app.url("/admin/logs"))
        .bearer_auth(KEY)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["code"], Value::String("WRONG2".into()));
    assert_eq!(rows[1]["code"], Value::String("WRONG1".into()));
}

#[tokio::test]
async fn status_requires_credential_and_reports_version() {
    let app = common::spawn_app(common::permissive_config()).await;

    let res = app.client.get(app.url("/admin/status")).send().await.unwrap();
    assert_eq!(res.status(), 401);

    let res = app
        .client
        .get(app.url("/admin/status"))
        .bearer_auth(KEY)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], Value::String("operational".into()));
}
