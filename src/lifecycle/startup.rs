//! Startup orchestration.
//!
//! # Responsibilities
//! - Resolve the configured bind address
//! - Bind the listener before any traffic is accepted
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Bind failures are reported, never retried

use std::net::{AddrParseError, SocketAddr};

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::ListenerConfig;

/// Error type for startup operations.
#[derive(Debug, Error)]
pub enum StartupError {
    /// The configured address is not a socket address.
    #[error("invalid bind address `{address}`: {source}")]
    InvalidAddress {
        address: String,
        #[source]
        source: AddrParseError,
    },

    /// Failed to bind to address.
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

/// Bind a TCP listener on the configured address.
pub async fn bind_listener(config: &ListenerConfig) -> Result<TcpListener, StartupError> {
    let address: SocketAddr =
        config
            .bind_address
            .parse()
            .map_err(|source| StartupError::InvalidAddress {
                address: config.bind_address.clone(),
                source,
            })?;

    let listener = TcpListener::bind(address)
        .await
        .map_err(|source| StartupError::Bind { address, source })?;

    tracing::debug!(address = %address, "Listener bound");
    Ok(listener)
}
