//! Request context extraction.
//!
//! # Data Flow
//! ```text
//! Incoming request headers + socket address
//!     → client_ip (forwarded-for → remote addr → "Unknown")
//!     → device.rs (device/OS/browser from user-agent substrings)
//!     → geo.rs (best-effort geolocation, fail-open)
//!     → RequestContext consumed by the check pipeline
//! ```
//!
//! # Design Decisions
//! - Extraction never fails: absent or malformed headers degrade to
//!   None/"Unknown" defaults
//! - Heuristics are best-effort, not exhaustive

pub mod device;
pub mod geo;

use std::net::SocketAddr;

use axum::http::{header, HeaderMap};

/// Sentinel used when no requester address can be determined.
pub const UNKNOWN_IP: &str = "Unknown";

/// Requester identity and environment facts for one request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub ip: String,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    pub languages: Option<String>,
    pub device_type: String,
    pub os: String,
    pub browser_name: String,
}

/// Resolve the requester IP: first `x-forwarded-for` entry, then the raw
/// socket address, then the `"Unknown"` sentinel. Never fails.
pub fn client_ip(headers: &HeaderMap, remote: Option<SocketAddr>) -> String {
    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }
    remote
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_IP.to_string())
}

fn header_value(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string())
}

/// Build the full context from headers and connection info.
pub fn extract(headers: &HeaderMap, remote: Option<SocketAddr>) -> RequestContext {
    let ip = client_ip(headers, remote);
    let user_agent = header_value(headers, header::USER_AGENT);
    let referer = header_value(headers, header::REFERER);
    let languages = header_value(headers, header::ACCEPT_LANGUAGE);

    let ua = user_agent.as_deref().unwrap_or("");
    RequestContext {
        device_type: device::classify_device(ua).to_string(),
        os: device::detect_os(ua).to_string(),
        browser_name: device::detect_browser(ua).to_string(),
        ip,
        user_agent,
        referer,
        languages,
    }
}
