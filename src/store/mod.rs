//! Storage subsystem.
//!
//! # Data Flow
//! ```text
//! /check handler
//!     → list_codes (credential scan input)
//!     → count_attempts (prior history for this code+ip)
//!     → insert_log (audit record, must succeed before responding)
//!     → record_outcome (best-effort counter bump)
//!
//! /admin handlers
//!     → insert_code / delete_code / recent_logs
//! ```
//!
//! # Design Decisions
//! - Storage is an injected capability (`Arc<dyn Store>`), not a global
//!   pool, so handlers can run against a test double
//! - Log rows are append-only; nothing in this crate mutates or deletes them
//! - No multi-row transactions: each write is individually atomic

pub mod memory;
pub mod models;
pub mod postgres;

use async_trait::async_trait;

pub use memory::MemoryStore;
pub use models::{AccessCode, AttemptStatus, LogEntry, NewLogEntry};
pub use postgres::PostgresStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Storage access capability shared by the check pipeline and the admin
/// surface.
#[async_trait]
pub trait Store: Send + Sync {
    /// All stored access codes, in stable stored order. The matcher scans
    /// the full set; there is deliberately no plaintext lookup.
    async fn list_codes(&self) -> Result<Vec<AccessCode>, StoreError>;

    /// Persist a new code hash and its destination. Returns the assigned id.
    async fn insert_code(&self, code_hash: &str, target_url: &str) -> Result<i64, StoreError>;

    /// Remove a code by id. Returns whether a row existed.
    async fn delete_code(&self, id: i64) -> Result<bool, StoreError>;

    /// Number of prior log rows for this (code, ip) pair.
    async fn count_attempts(&self, code: &str, ip: &str) -> Result<i64, StoreError>;

    /// Append one audit record. Returns the assigned id.
    async fn insert_log(&self, entry: &NewLogEntry) -> Result<i64, StoreError>;

    /// Recent log rows, newest first, capped at `limit`.
    async fn recent_logs(&self, limit: i64) -> Result<Vec<LogEntry>, StoreError>;

    /// Bump the per-code outcome counter.
    async fn record_outcome(&self, code_id: i64, success: bool) -> Result<(), StoreError>;
}
