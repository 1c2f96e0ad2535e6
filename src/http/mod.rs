//! HTTP subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware layers, graceful shutdown)
//!     → security/rate_limit.rs (per-IP window, /check only)
//!     → handlers.rs (the check pipeline, health probe)
//!     → admin/ (code management, behind bearer auth)
//! ```

pub mod handlers;
pub mod server;

pub use server::{AppState, HttpServer};
