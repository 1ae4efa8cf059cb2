//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Supervisor, server, sessions produce:
//!     → logging.rs (structured log events via `tracing`)
//!
//! Consumers:
//!     → stdout (fmt layer)
//! ```
//!
//! # Design Decisions
//! - Structured key/value fields on every event
//! - Request ID flows from the HTTP layer into session logs
//! - `RUST_LOG` overrides the configured level

pub mod logging;

pub use logging::init_logging;
