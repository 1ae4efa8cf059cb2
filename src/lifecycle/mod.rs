//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Validated config → Bind listener → Start serving
//!
//! Supervision (supervisor.rs):
//!     Serve → Wait for stop request → Trigger shutdown → Drain → Exit
//!
//! Shutdown (shutdown.rs):
//!     Shutdown::trigger → every ShutdownSignal fires → sessions return
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → stop request for the supervisor
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then listener, then traffic
//! - Ordered shutdown: stop accept, drain, close
//! - Shutdown has timeout: forced exit after deadline

pub mod shutdown;
pub mod signals;
pub mod startup;
pub mod supervisor;

pub use shutdown::{Shutdown, ShutdownSignal};
pub use startup::{bind_listener, StartupError};
pub use supervisor::{Supervisor, SupervisorError};
