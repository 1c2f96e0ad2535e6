//! Configuration validation.
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::AppConfig;

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid bind address: {0}")]
    InvalidBindAddress(String),

    #[error("database {0} must not be empty")]
    EmptyDatabaseField(&'static str),

    #[error("database pool_size must be greater than zero")]
    ZeroPoolSize,

    #[error("rate_limit.window_ms must be greater than zero")]
    ZeroWindow,

    #[error("rate_limit.max must be greater than zero")]
    ZeroMax,

    #[error("geolocation.endpoint must not be empty when enabled")]
    EmptyGeoEndpoint,

    #[error("geolocation.timeout_ms must be greater than zero when enabled")]
    ZeroGeoTimeout,

    #[error("admin.api_key must not be empty")]
    EmptyAdminKey,

    #[error("admin.max_log_rows must be greater than zero")]
    ZeroLogRows,
}

/// Semantic validation on top of what serde already guarantees.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.database.host.is_empty() {
        errors.push(ValidationError::EmptyDatabaseField("host"));
    }
    if config.database.user.is_empty() {
        errors.push(ValidationError::EmptyDatabaseField("user"));
    }
    if config.database.name.is_empty() {
        errors.push(ValidationError::EmptyDatabaseField("name"));
    }
    if config.database.pool_size == 0 {
        errors.push(ValidationError::ZeroPoolSize);
    }

    if config.rate_limit.enabled {
        if config.rate_limit.window_ms == 0 {
            errors.push(ValidationError::ZeroWindow);
        }
        if config.rate_limit.max == 0 {
            errors.push(ValidationError::ZeroMax);
        }
    }

    if config.geolocation.enabled {
        if config.geolocation.endpoint.is_empty() {
            errors.push(ValidationError::EmptyGeoEndpoint);
        }
        if config.geolocation.timeout_ms == 0 {
            errors.push(ValidationError::ZeroGeoTimeout);
        }
    }

    if config.admin.api_key.is_empty() {
        errors.push(ValidationError::EmptyAdminKey);
    }
    if config.admin.max_log_rows <= 0 {
        errors.push(ValidationError::ZeroLogRows);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
