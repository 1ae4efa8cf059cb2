//! Server-sent clock events with graceful shutdown.
//!
//! # Architecture Overview
//!
//! ```text
//!   SIGINT / SIGTERM
//!         │
//!         ▼
//!  ┌──────────────┐  trigger   ┌────────────┐  ShutdownSignal (one per session)
//!  │  lifecycle   │───────────▶│  Shutdown  │──────────────────────┐
//!  │  supervisor  │            └────────────┘                      │
//!  └──────┬───────┘                                                ▼
//!         │ bind + serve   ┌─────────┐  GET /sse  ┌──────────────────────────┐
//!         └───────────────▶│  http   │───────────▶│ stream: session loop     │
//!                          │ server  │            │ tick → write → flush     │
//!                          └─────────┘            └──────────────────────────┘
//! ```

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod stream;

pub use config::ServerConfig;
pub use http::{HttpServer, ShutdownOutcome};
pub use lifecycle::{Shutdown, ShutdownSignal, Supervisor};
