//! Postgres-backed store.

use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;

use crate::config::schema::DatabaseConfig;
use crate::store::models::{AccessCode, AttemptStatus, LogEntry, NewLogEntry};
use crate::store::{Store, StoreError};

pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Connect and bootstrap the schema.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.pool_size)
            .connect(&config.url())
            .await?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS access_codes (
                id            BIGSERIAL PRIMARY KEY,
                code_hash     TEXT NOT NULL,
                target_url    TEXT NOT NULL,
                success_count BIGINT NOT NULL DEFAULT 0,
                fail_count    BIGINT NOT NULL DEFAULT 0,
                created_at    TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS logs (
                id             BIGSERIAL PRIMARY KEY,
                code           TEXT NOT NULL,
                url            TEXT,
                status         TEXT NOT NULL,
                ip             TEXT NOT NULL,
                user_agent     TEXT,
                referer        TEXT,
                device_type    TEXT NOT NULL,
                os             TEXT NOT NULL,
                browser_name   TEXT NOT NULL,
                languages      TEXT,
                country        TEXT,
                region         TEXT,
                city           TEXT,
                attempt_number BIGINT NOT NULL,
                response_ms    BIGINT NOT NULL,
                created_at     TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        // Attempt counting queries by (code, ip) on every check.
        sqlx::query("CREATE INDEX IF NOT EXISTS logs_code_ip_idx ON logs (code, ip)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

fn code_from_row(row: &PgRow) -> Result<AccessCode, sqlx::Error> {
    Ok(AccessCode {
        id: row.try_get("id")?,
        code_hash: row.try_get("code_hash")?,
        target_url: row.try_get("target_url")?,
        success_count: row.try_get("success_count")?,
        fail_count: row.try_get("fail_count")?,
        created_at: row.try_get("created_at")?,
    })
}

fn log_from_row(row: &PgRow) -> Result<LogEntry, sqlx::Error> {
    let status: String = row.try_get("status")?;
    Ok(LogEntry {
        id: row.try_get("id")?,
        code: row.try_get("code")?,
        url: row.try_get("url")?,
        status: AttemptStatus::from_db(&status),
        ip: row.try_get("ip")?,
        user_agent: row.try_get("user_agent")?,
        referer: row.try_get("referer")?,
        device_type: row.try_get("device_type")?,
        os: row.try_get("os")?,
        browser_name: row.try_get("browser_name")?,
        languages: row.try_get("languages")?,
        country: row.try_get("country")?,
        region: row.try_get("region")?,
        city: row.try_get("city")?,
        attempt_number: row.try_get("attempt_number")?,
        response_ms: row.try_get("response_ms")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait::async_trait]
impl Store for PostgresStore {
    async fn list_codes(&self) -> Result<Vec<AccessCode>, StoreError> {
        let rows = sqlx::query("SELECT * FROM access_codes ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        let mut codes = Vec::with_capacity(rows.len());
        for row in &rows {
            codes.push(code_from_row(row)?);
        }
        Ok(codes)
    }

    async fn insert_code(&self, code_hash: &str, target_url: &str) -> Result<i64, StoreError> {
        let row = sqlx::query(
            "INSERT INTO access_codes (code_hash, target_url) VALUES ($1, $2) RETURNING id",
        )
        .bind(code_hash)
        .bind(target_url)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.try_get("id")?)
    }

    async fn delete_code(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM access_codes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_attempts(&self, code: &str, ip: &str) -> Result<i64, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM logs WHERE code = $1 AND ip = $2")
            .bind(code)
            .bind(ip)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("n")?)
    }

    async fn insert_log(&self, entry: &NewLogEntry) -> Result<i64, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO logs
                (code, url, status, ip, user_agent, referer, device_type, os,
                 browser_name, languages, country, region, city,
                 attempt_number, response_ms)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING id
            "#,
        )
        .bind(&entry.code)
        .bind(&entry.url)
        .bind(entry.status.as_str())
        .bind(&entry.ip)
        .bind(&entry.user_agent)
        .bind(&entry.referer)
        .bind(&entry.device_type)
        .bind(&entry.os)
        .bind(&entry.browser_name)
        .bind(&entry.languages)
        .bind(&entry.country)
        .bind(&entry.region)
        .bind(&entry.city)
        .bind(entry.attempt_number)
        .bind(entry.response_ms)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.try_get("id")?)
    }

    async fn recent_logs(&self, limit: i64) -> Result<Vec<LogEntry>, StoreError> {
        let rows = sqlx::query("SELECT * FROM logs ORDER BY id DESC LIMIT $1")
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        let mut logs = Vec::with_capacity(rows.len());
        for row in &rows {
            logs.push(log_from_row(row)?);
        }
        Ok(logs)
    }

    async fn record_outcome(&self, code_id: i64, success: bool) -> Result<(), StoreError> {
        let sql = if success {
            "UPDATE access_codes SET success_count = success_count + 1 WHERE id = $1"
        } else {
            "UPDATE access_codes SET fail_count = fail_count + 1 WHERE id = $1"
        };
        sqlx::query(sql).bind(code_id).execute(&self.pool).await?;
        Ok(())
    }
}
