//! Clock event streaming subsystem.
//!
//! # Data Flow
//! ```text
//! GET /sse
//!     → handler.rs (headers, session setup, spawn)
//!     → session.rs (tick / cancel loop)
//!     → event.rs (tick instant → payload)
//!     → sink.rs (buffer, flush one `Event` into the `Sse` body)
//!     → Client
//! ```
//!
//! # Design Decisions
//! - One spawned task per session; sessions share nothing
//! - Sessions end only on cancellation: shutdown, client gone, or a
//!   failed write
//! - Transports must flush partial output or the request gets a 500

pub mod event;
pub mod handler;
pub mod session;
pub mod sink;

pub use event::{ClockEvent, TickClock};
pub use handler::{clock_stream, start_stream, StreamState};
pub use session::{CloseReason, SessionSummary, StreamError, StreamSession};
pub use sink::{ChannelSink, EventSink, EventStream, SinkError};
