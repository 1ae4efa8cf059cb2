//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ServerConfig (validated, immutable)
//!     → handed to the supervisor at startup
//! ```
//!
//! # Design Decisions
//! - Every field has a default; with no file the server listens on
//!   `127.0.0.1:8080` and streams on `/sse` once per second
//! - Config is read once at startup, never reloaded
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::ListenerConfig;
pub use schema::ObservabilityConfig;
pub use schema::ServerConfig;
pub use schema::ShutdownConfig;
pub use schema::StreamConfig;
pub use validation::{validate_config, ValidationError};
