//! Configuration loading from disk and environment.
//!
//! The TOML file is optional; the original deployment of this service was
//! configured entirely through environment variables, so every secret and
//! connection detail can be overridden by the environment after the file
//! (or the defaults) are read.

use std::env;
use std::fs;
use std::path::Path;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", format_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load, override from the environment, and validate configuration.
///
/// A missing file is not an error: defaults plus environment overrides
/// form the effective configuration.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    // Runs before the tracing subscriber is up, so a missing file is not
    // reported here; the caller logs the effective configuration.
    let mut config = if path.exists() {
        toml::from_str(&fs::read_to_string(path)?)?
    } else {
        AppConfig::default()
    };

    apply_env_overrides(&mut config, |name| env::var(name).ok());

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply recognized environment overrides. The lookup is injected so the
/// override logic is testable without touching process state.
pub fn apply_env_overrides(config: &mut AppConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(host) = lookup("DB_HOST") {
        config.database.host = host;
    }
    if let Some(user) = lookup("DB_USER") {
        config.database.user = user;
    }
    if let Some(password) = lookup("DB_PASS") {
        config.database.password = password;
    }
    if let Some(name) = lookup("DB_NAME") {
        config.database.name = name;
    }
    if let Some(port) = lookup("DB_PORT").and_then(|p| p.parse().ok()) {
        config.database.port = port;
    }
    if let Some(size) = lookup("DB_POOL_SIZE").and_then(|p| p.parse().ok()) {
        config.database.pool_size = size;
    }
    if let Some(port) = lookup("PORT").and_then(|p| p.parse::<u16>().ok()) {
        config.listener.bind_address = format!("0.0.0.0:{port}");
    }
    if let Some(key) = lookup("ADMIN_API_KEY") {
        config.admin.api_key = key;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_overrides_take_precedence() {
        let mut config = AppConfig::default();
        apply_env_overrides(&mut config, |name| match name {
            "DB_HOST" => Some("db.internal".into()),
            "DB_PASS" => Some("s3cret".into()),
            "DB_PORT" => Some("5433".into()),
            "PORT" => Some("8088".into()),
            "ADMIN_API_KEY" => Some("from-env".into()),
            _ => None,
        });

        assert_eq!(config.database.host, "db.internal");
        assert_eq!(config.database.password, "s3cret");
        assert_eq!(config.database.port, 5433);
        assert_eq!(config.listener.bind_address, "0.0.0.0:8088");
        assert_eq!(config.admin.api_key, "from-env");
        // Untouched fields keep their defaults.
        assert_eq!(config.database.name, "codegate");
    }

    #[test]
    fn unparseable_numeric_overrides_are_ignored() {
        let mut config = AppConfig::default();
        apply_env_overrides(&mut config, |name| match name {
            "DB_PORT" => Some("not-a-port".into()),
            "PORT" => Some("99999999".into()),
            _ => None,
        });
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.listener.bind_address, "0.0.0.0:3000");
    }

    #[test]
    fn toml_round_trip() {
        let toml = r#"
            [listener]
            bind_address = "127.0.0.1:9000"

            [rate_limit]
            window_ms = 10000
            max = 5
        "#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:9000");
        assert_eq!(config.rate_limit.window_ms, 10_000);
        assert_eq!(config.rate_limit.max, 5);
        // Sections not present fall back to defaults.
        assert_eq!(config.database.port, 5432);
    }
}
