//! User-agent substring heuristics.
//!
//! Best-effort classification only. Unrecognized agents fall back to
//! "desktop" / "Unknown" / "Other" rather than failing; clients can
//! override via the hints in the check request body.

const BOT_MARKERS: &[&str] = &[
    "bot", "crawler", "spider", "curl", "wget", "python-requests", "headless",
];

/// Classify the requesting device as mobile, tablet, bot, or desktop.
pub fn classify_device(user_agent: &str) -> &'static str {
    let ua = user_agent.to_ascii_lowercase();
    if ua.is_empty() {
        return "desktop";
    }
    if BOT_MARKERS.iter().any(|m| ua.contains(m)) {
        return "bot";
    }
    if ua.contains("ipad") || ua.contains("tablet") || (ua.contains("android") && !ua.contains("mobile")) {
        return "tablet";
    }
    if ua.contains("mobi") || ua.contains("iphone") || ua.contains("android") {
        return "mobile";
    }
    "desktop"
}

/// Best-effort operating system name.
pub fn detect_os(user_agent: &str) -> &'static str {
    let ua = user_agent.to_ascii_lowercase();
    if ua.contains("windows") {
        "Windows"
    } else if ua.contains("iphone") || ua.contains("ipad") || ua.contains("ios") {
        "iOS"
    } else if ua.contains("mac os") || ua.contains("macintosh") {
        "macOS"
    } else if ua.contains("android") {
        "Android"
    } else if ua.contains("linux") {
        "Linux"
    } else {
        "Unknown"
    }
}

/// Best-effort browser name.
///
/// Order matters: Chrome-derived agents also carry "safari", and Edge and
/// Opera also carry "chrome".
pub fn detect_browser(user_agent: &str) -> &'static str {
    let ua = user_agent.to_ascii_lowercase();
    if ua.contains("edg/") || ua.contains("edge/") {
        "Edge"
    } else if ua.contains("opr/") || ua.contains("opera") {
        "Opera"
    } else if ua.contains("firefox") {
        "Firefox"
    } else if ua.contains("chrome") || ua.contains("crios") {
        "Chrome"
    } else if ua.contains("safari") {
        "Safari"
    } else {
        "Other"
    }
}
