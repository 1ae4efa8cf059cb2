//! Process supervision.
//!
//! # Responsibilities
//! - Own the listener and the shutdown coordinator
//! - Serve until an external stop request arrives
//! - Trigger shutdown and wait for the bounded drain
//!
//! # Design Decisions
//! - The stop request is any future; the binary passes
//!   [`signals::interrupt`](crate::lifecycle::signals::interrupt)
//! - A server that exits before a stop request is logged as an error and
//!   reported to the caller
//! - An invalid config is refused before any request is served

use std::future::Future;
use std::pin::pin;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::http::{HttpServer, ServerError, ShutdownOutcome};
use crate::lifecycle::shutdown::Shutdown;
use crate::lifecycle::startup::{bind_listener, StartupError};

/// Errors that end supervision.
#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error(transparent)]
    Startup(#[from] StartupError),

    #[error(transparent)]
    Server(#[from] ServerError),
}

/// Owns one server from bind to shutdown.
pub struct Supervisor {
    config: ServerConfig,
    shutdown: Shutdown,
}

impl Supervisor {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            shutdown: Shutdown::new(),
        }
    }

    /// Bind the configured address, then [`serve`](Self::serve) on it.
    pub async fn run<F>(self, stop: F) -> Result<ShutdownOutcome, SupervisorError>
    where
        F: Future<Output = ()>,
    {
        let listener = match bind_listener(&self.config.listener).await {
            Ok(listener) => listener,
            Err(e) => {
                tracing::error!(error = %e, "Server failed to start");
                return Err(e.into());
            }
        };

        self.serve(listener, stop).await
    }

    /// Serve on `listener` until `stop` resolves, then drain.
    pub async fn serve<F>(
        self,
        listener: TcpListener,
        stop: F,
    ) -> Result<ShutdownOutcome, SupervisorError>
    where
        F: Future<Output = ()>,
    {
        let server = HttpServer::new(self.config, self.shutdown.subscribe()).inspect_err(|e| {
            tracing::error!(error = %e, "Server failed to start");
        })?;
        let mut serving = pin!(server.run(listener));

        tokio::select! {
            result = &mut serving => {
                return match result {
                    Ok(outcome) => Ok(outcome),
                    Err(e) => {
                        tracing::error!(error = %e, "Server unexpectedly closed");
                        Err(e.into())
                    }
                };
            }
            _ = stop => {}
        }

        self.shutdown.trigger();

        let outcome = serving.await.inspect_err(|e| {
            tracing::error!(error = %e, "Server failed while draining");
        })?;

        tracing::info!(outcome = ?outcome, "Server shutdown");
        Ok(outcome)
    }
}
