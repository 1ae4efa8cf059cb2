//! Per-connection stream session.
//!
//! # State Machine
//! ```text
//! Initializing ──open()──▶ Streaming ──run()──▶ Closed
//!      │                                          ▲
//!      └── sink cannot flush: StreamError ────────┘
//! ```
//! A [`StreamSession`] value *is* the streaming state; `run` consumes it
//! and hands back a [`SessionSummary`], so a closed session cannot be
//! resumed.

use std::time::Duration;

use thiserror::Error;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::lifecycle::ShutdownSignal;
use crate::stream::event::TickClock;
use crate::stream::sink::EventSink;

/// Reasons a session can refuse to start.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StreamError {
    /// The transport cannot push partial responses.
    #[error("Streaming unsupported!")]
    FlushUnsupported,
}

/// Why a session stopped emitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// The server began shutting down.
    Shutdown,
    /// The client went away between ticks.
    ClientDisconnected,
    /// A flush failed mid-stream.
    WriteFailed,
}

/// Final report of a closed session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub id: String,
    pub reason: CloseReason,
    pub events: u64,
}

/// A clock stream bound to one client connection.
#[derive(Debug)]
pub struct StreamSession<S> {
    id: String,
    sink: S,
    shutdown: ShutdownSignal,
    interval: Duration,
}

impl<S: EventSink> StreamSession<S> {
    /// Start a session on `sink`, refusing transports that cannot flush.
    pub fn open(
        id: impl Into<String>,
        sink: S,
        shutdown: ShutdownSignal,
        interval: Duration,
    ) -> Result<Self, StreamError> {
        if !sink.supports_flush() {
            return Err(StreamError::FlushUnsupported);
        }

        Ok(Self {
            id: id.into(),
            sink,
            shutdown,
            interval,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Emit one event per interval until cancelled.
    ///
    /// The first event is written one full interval after entry and each
    /// event is stamped with the time its tick fired. The timer lives in
    /// this future and is dropped on every exit path.
    pub async fn run(mut self) -> SessionSummary {
        let clock = TickClock::start();
        let mut ticker = time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut events = 0;

        let reason = loop {
            let tick = tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => break CloseReason::Shutdown,
                _ = self.sink.closed() => break CloseReason::ClientDisconnected,
                tick = ticker.tick() => tick,
            };

            self.sink.write(&clock.stamp(tick).payload());

            // A slow client must not hold up shutdown.
            let flushed = tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => break CloseReason::Shutdown,
                result = self.sink.flush() => result,
            };

            if let Err(e) = flushed {
                tracing::debug!(request_id = %self.id, error = %e, "Stream write failed");
                break CloseReason::WriteFailed;
            }
            events += 1;
        };

        SessionSummary {
            id: self.id,
            reason,
            events,
        }
    }
}
