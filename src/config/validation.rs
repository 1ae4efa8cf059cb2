//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (interval > 0, capacity > 0)
//! - Check the bind address and stream path are usable
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ServerConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a socket address")]
    InvalidBindAddress(String),

    #[error("stream.path `{0}` must start with `/` and contain no route captures")]
    InvalidStreamPath(String),

    #[error("stream.interval_ms must be greater than zero")]
    ZeroInterval,

    #[error("stream.channel_capacity must be greater than zero")]
    ZeroChannelCapacity,

    #[error("observability.log_level `{0}` is not one of trace, debug, info, warn, error")]
    UnknownLogLevel(String),
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    let path = &config.stream.path;
    if !path.starts_with('/') || path.contains(['{', '}', '*']) {
        errors.push(ValidationError::InvalidStreamPath(path.clone()));
    }

    if config.stream.interval_ms == 0 {
        errors.push(ValidationError::ZeroInterval);
    }

    if config.stream.channel_capacity == 0 {
        errors.push(ValidationError::ZeroChannelCapacity);
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
