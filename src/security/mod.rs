//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming /check request:
//!     → rate_limit.rs (fixed window per IP, 429 before any storage access)
//!     → Pass to the check pipeline
//!
//! Incoming /admin request:
//!     → auth.rs (Bearer credential compare)
//!     → Pass to admin handlers
//! ```
//!
//! # Design Decisions
//! - A rate-limited request never reaches the matcher or the audit log
//! - The admin credential is opaque; comparison is constant-time

pub mod auth;
pub mod rate_limit;
