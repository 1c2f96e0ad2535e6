//! In-memory store.
//!
//! Backs the integration tests. The failure toggles let tests drive the
//! degraded paths (audit-write failure, attempt-count fallback) without a
//! real database outage.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use chrono::Utc;

use crate::store::models::{AccessCode, LogEntry, NewLogEntry};
use crate::store::{Store, StoreError};

#[derive(Default)]
struct Inner {
    codes: Vec<AccessCode>,
    logs: Vec<LogEntry>,
    next_code_id: i64,
    next_log_id: i64,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    fail_list_codes: AtomicBool,
    fail_log_inserts: AtomicBool,
    fail_attempt_counts: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all stored codes, in stored order.
    pub fn codes(&self) -> Vec<AccessCode> {
        self.inner.lock().expect("memory store poisoned").codes.clone()
    }

    /// Snapshot of all log rows, in insertion order.
    pub fn logs(&self) -> Vec<LogEntry> {
        self.inner.lock().expect("memory store poisoned").logs.clone()
    }

    /// Make subsequent `list_codes` calls fail.
    pub fn set_fail_list_codes(&self, fail: bool) {
        self.fail_list_codes.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent `insert_log` calls fail.
    pub fn set_fail_log_inserts(&self, fail: bool) {
        self.fail_log_inserts.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent `count_attempts` calls fail.
    pub fn set_fail_attempt_counts(&self, fail: bool) {
        self.fail_attempt_counts.store(fail, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl Store for MemoryStore {
    async fn list_codes(&self) -> Result<Vec<AccessCode>, StoreError> {
        if self.fail_list_codes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("credential scan disabled".into()));
        }
        Ok(self.codes())
    }

    async fn insert_code(&self, code_hash: &str, target_url: &str) -> Result<i64, StoreError> {
        let mut inner = self.inner.lock().expect("memory store poisoned");
        inner.next_code_id += 1;
        let id = inner.next_code_id;
        inner.codes.push(AccessCode {
            id,
            code_hash: code_hash.to_string(),
            target_url: target_url.to_string(),
            success_count: 0,
            fail_count: 0,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn delete_code(&self, id: i64) -> Result<bool, StoreError> {
        let mut inner = self.inner.lock().expect("memory store poisoned");
        let before = inner.codes.len();
        inner.codes.retain(|c| c.id != id);
        Ok(inner.codes.len() < before)
    }

    async fn count_attempts(&self, code: &str, ip: &str) -> Result<i64, StoreError> {
        if self.fail_attempt_counts.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("attempt count disabled".into()));
        }
        let inner = self.inner.lock().expect("memory store poisoned");
        Ok(inner
            .logs
            .iter()
            .filter(|l| l.code == code && l.ip == ip)
            .count() as i64)
    }

    async fn insert_log(&self, entry: &NewLogEntry) -> Result<i64, StoreError> {
        if self.fail_log_inserts.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("log insert disabled".into()));
        }
        let mut inner = self.inner.lock().expect("memory store poisoned");
        inner.next_log_id += 1;
        let id = inner.next_log_id;
        inner.logs.push(LogEntry {
            id,
            code: entry.code.clone(),
            url: entry.url.clone(),
            status: entry.status,
            ip: entry.ip.clone(),
            user_agent: entry.user_agent.clone(),
            referer: entry.referer.clone(),
            device_type: entry.device_type.clone(),
            os: entry.os.clone(),
            browser_name: entry.browser_name.clone(),
            languages: entry.languages.clone(),
            country: entry.country.clone(),
            region: entry.region.clone(),
            city: entry.city.clone(),
            attempt_number: entry.attempt_number,
            response_ms: entry.response_ms,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn recent_logs(&self, limit: i64) -> Result<Vec<LogEntry>, StoreError> {
        let inner = self.inner.lock().expect("memory store poisoned");
        Ok(inner
            .logs
            .iter()
            .rev()
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn record_outcome(&self, code_id: i64, success: bool) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("memory store poisoned");
        if let Some(code) = inner.codes.iter_mut().find(|c| c.id == code_id) {
            if success {
                code.success_count += 1;
            } else {
                code.fail_count += 1;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::models::AttemptStatus;

    fn entry(code: &str, ip: &str, attempt: i64) -> NewLogEntry {
        NewLogEntry {
            code: code.to_string(),
            url: None,
            status: AttemptStatus::Failed,
            ip: ip.to_string(),
            user_agent: None,
            referer: None,
            device_type: "desktop".into(),
            os: "Unknown".into(),
            browser_name: "Other".into(),
            languages: None,
            country: None,
            region: None,
            city: None,
            attempt_number: attempt,
            response_ms: 0,
        }
    }

    #[tokio::test]
    async fn count_attempts_is_scoped_to_code_and_ip() {
        let store = MemoryStore::new();
        store.insert_log(&entry("AAA", "1.1.1.1", 1)).await.unwrap();
        store.insert_log(&entry("AAA", "1.1.1.1", 2)).await.unwrap();
        store.insert_log(&entry("AAA", "2.2.2.2", 1)).await.unwrap();
        store.insert_log(&entry("BBB", "1.1.1.1", 1)).await.unwrap();

        assert_eq!(store.count_attempts("AAA", "1.1.1.1").await.unwrap(), 2);
        assert_eq!(store.count_attempts("AAA", "2.2.2.2").await.unwrap(), 1);
        assert_eq!(store.count_attempts("BBB", "1.1.1.1").await.unwrap(), 1);
        assert_eq!(store.count_attempts("CCC", "1.1.1.1").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn recent_logs_returns_newest_first_and_caps() {
        let store = MemoryStore::new();
        for i in 1..=5 {
            store.insert_log(&entry("AAA", "1.1.1.1", i)).await.unwrap();
        }
        let logs = store.recent_logs(3).await.unwrap();
        assert_eq!(logs.len(), 3);
        assert_eq!(logs[0].attempt_number, 5);
        assert_eq!(logs[2].attempt_number, 3);
    }

    #[tokio::test]
    async fn delete_code_reports_whether_a_row_existed() {
        let store = MemoryStore::new();
        let id = store.insert_code("$argon2id$x", "https://example.com").await.unwrap();
        assert!(store.delete_code(id).await.unwrap());
        assert!(!store.delete_code(id).await.unwrap());
    }
}
