//! Access-code validation and attempt-logging service.
//!
//! A client submits a secret access code; the service verifies it against
//! a store of salted Argon2id hashes, returns the associated redirect URL
//! on success, and appends one audit record per attempt (requester
//! context, geolocation, attempt ordinal, timing). A thin admin surface
//! manages codes and inspects the log.

pub mod admin;
pub mod config;
pub mod context;
pub mod error;
pub mod http;
pub mod matcher;
pub mod security;
pub mod store;

pub use config::AppConfig;
pub use http::HttpServer;
