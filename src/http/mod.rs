//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing)
//!     → stream handler (GET on the stream path)
//!     → Send events to client until the session closes
//! ```

pub mod server;

pub use server::{HttpServer, ServerError, ShutdownOutcome};
