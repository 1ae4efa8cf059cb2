//! `sse-clock` server binary.
//!
//! Streams `data: Current time is <RFC3339>` once per second on `/sse`
//! and shuts down gracefully on SIGINT or SIGTERM.

use std::path::PathBuf;

use clap::Parser;

use sse_clock::config::{load_config, validate_config, ConfigError, ServerConfig};
use sse_clock::lifecycle::{signals, Supervisor};
use sse_clock::observability::init_logging;

#[derive(Parser)]
#[command(name = "sse-clock")]
#[command(about = "Streams the current time to clients over server-sent events", long_about = None)]
struct Cli {
    /// TOML configuration file; built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(long)]
    bind: Option<String>,

    /// Override `observability.log_level`.
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn into_config(self) -> Result<ServerConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => ServerConfig::default(),
        };

        if let Some(bind) = self.bind {
            config.listener.bind_address = bind;
        }
        if let Some(level) = self.log_level {
            config.observability.log_level = level;
        }

        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().into_config()?;

    init_logging(&config.observability)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        path = %config.stream.path,
        grace_period_secs = config.shutdown.grace_period_secs,
        "Configuration loaded"
    );

    // Startup failures are fatal: the error propagates to a non-zero exit.
    Supervisor::new(config).run(signals::interrupt()).await?;

    Ok(())
}
