//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the single stream route
//! - Wire up middleware (tracing, request ID)
//! - Serve on a bound listener
//! - Drain connections on shutdown, bounded by the grace period

use std::future::IntoFuture;

use axum::{routing::get, Router};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::{validate_config, ConfigError, ServerConfig};
use crate::lifecycle::ShutdownSignal;
use crate::stream::{clock_stream, StreamState};

/// Errors raised while serving.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to read listener address: {0}")]
    LocalAddr(#[source] std::io::Error),

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// How a shutdown finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownOutcome {
    /// Every connection closed within the grace period.
    Drained,
    /// The grace period ran out with connections still open.
    GraceElapsed,
}

/// HTTP server for the clock stream.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
    shutdown: ShutdownSignal,
}

impl HttpServer {
    /// Create a new HTTP server whose sessions observe `shutdown`.
    ///
    /// The config is validated first; a zero interval or channel capacity
    /// would otherwise fail inside every stream request.
    pub fn new(config: ServerConfig, shutdown: ShutdownSignal) -> Result<Self, ServerError> {
        validate_config(&config).map_err(ConfigError::Validation)?;

        let state = StreamState::new(&config.stream, shutdown.clone());
        let router = Self::build_router(&config, state);
        Ok(Self {
            router,
            config,
            shutdown,
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ServerConfig, state: StreamState) -> Router {
        Router::new()
            .route(&config.stream.path, get(clock_stream))
            .with_state(state)
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The fully layered router, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until the shutdown signal fires, then drain.
    ///
    /// Once the signal fires no new connections are accepted; open ones get
    /// the configured grace period before they are abandoned.
    pub async fn run(self, listener: TcpListener) -> Result<ShutdownOutcome, ServerError> {
        let addr = listener.local_addr().map_err(ServerError::LocalAddr)?;
        let grace = self.config.shutdown.grace_period();

        tracing::info!(
            address = %addr,
            path = %self.config.stream.path,
            "Server started"
        );

        let drain = self.shutdown.clone();
        let serve = axum::serve(listener, self.router)
            .with_graceful_shutdown(async move { drain.cancelled().await })
            .into_future();
        tokio::pin!(serve);

        tokio::select! {
            result = &mut serve => {
                result.map_err(ServerError::Serve)?;
                return Ok(ShutdownOutcome::Drained);
            }
            _ = self.shutdown.cancelled() => {}
        }

        tracing::info!(grace_secs = grace.as_secs(), "Draining connections");

        match tokio::time::timeout(grace, serve).await {
            Ok(result) => {
                result.map_err(ServerError::Serve)?;
                Ok(ShutdownOutcome::Drained)
            }
            Err(_) => {
                tracing::warn!(
                    grace = ?grace,
                    "Grace period elapsed, abandoning open connections"
                );
                Ok(ShutdownOutcome::GraceElapsed)
            }
        }
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}
