//! Secret matcher: hashing and the linear credential scan.
//!
//! # Design Decisions
//! - Codes are low-entropy human-typed secrets, so they are stored as
//!   salted Argon2id hashes and matched by verifying the candidate against
//!   every stored hash in order. The O(n) scan is the contract: there is
//!   no plaintext index to build, and adding one would undo the tradeoff.
//! - A record whose hash fails to parse or verify abnormally is skipped,
//!   never fatal; the scan continues with the next candidate.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::error::AppError;
use crate::store::models::AccessCode;

/// Result of scanning the credential store for a candidate code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOutcome {
    pub matched: bool,
    pub url: Option<String>,
    pub code_id: Option<i64>,
}

impl MatchOutcome {
    fn miss() -> Self {
        Self {
            matched: false,
            url: None,
            code_id: None,
        }
    }
}

/// Hash a plaintext code with a fresh random salt for persistence.
pub fn hash_code(code: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(code.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Hashing(e.to_string()))
}

/// Scan stored records in order and return the first match.
///
/// Pure lookup: logging the outcome is the caller's responsibility.
pub fn find_match(candidate: &str, records: &[AccessCode]) -> MatchOutcome {
    let argon2 = Argon2::default();
    for record in records {
        let parsed = match PasswordHash::new(&record.code_hash) {
            Ok(hash) => hash,
            Err(e) => {
                tracing::debug!(code_id = record.id, error = %e, "skipping unparseable stored hash");
                continue;
            }
        };
        if argon2.verify_password(candidate.as_bytes(), &parsed).is_ok() {
            return MatchOutcome {
                matched: true,
                url: Some(record.target_url.clone()),
                code_id: Some(record.id),
            };
        }
    }
    MatchOutcome::miss()
}
