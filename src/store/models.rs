//! Persisted data model: access codes and audit log entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored access code.
///
/// `code_hash` is an Argon2id PHC string; the plaintext is never persisted
/// here. Immutable after creation except for the outcome counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessCode {
    pub id: i64,
    pub code_hash: String,
    pub target_url: String,
    pub success_count: i64,
    pub fail_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Outcome of one validation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttemptStatus {
    Success,
    Failed,
}

impl AttemptStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttemptStatus::Success => "success",
            AttemptStatus::Failed => "failed",
        }
    }

    pub fn from_db(s: &str) -> Self {
        match s {
            "success" => AttemptStatus::Success,
            _ => AttemptStatus::Failed,
        }
    }
}

/// One appended audit record.
///
/// `code` holds the plaintext as submitted. That is deliberate: attempt
/// counting correlates rows by (code, ip), and the history must survive
/// deletion of the matching AccessCode. The asymmetry with the hashed
/// credential store is a known tension, not an oversight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: i64,
    pub code: String,
    pub url: Option<String>,
    pub status: AttemptStatus,
    pub ip: String,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    pub device_type: String,
    pub os: String,
    pub browser_name: String,
    pub languages: Option<String>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub city: Option<String>,
    /// 1-based ordinal for this (code, ip) pair, inclusive of this attempt.
    pub attempt_number: i64,
    /// Wall-clock milliseconds from request entry to just before the
    /// response was produced.
    pub response_ms: i64,
    pub created_at: DateTime<Utc>,
}

/// A log record ready for insertion. Id and timestamp are assigned by the
/// store.
#[derive(Debug, Clone)]
pub struct NewLogEntry {
    pub code: String,
    pub url: Option<String>,
    pub status: AttemptStatus,
    pub ip: String,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    pub device_type: String,
    pub os: String,
    pub browser_name: String,
    pub languages: Option<String>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub city: Option<String>,
    pub attempt_number: i64,
    pub response_ms: i64,
}
