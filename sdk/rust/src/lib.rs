//! Client for the `sse-clock` event stream.

mod client;

pub use client::{ClientError, ClockClient, ClockMessage, ClockSubscription};
