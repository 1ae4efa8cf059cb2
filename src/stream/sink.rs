//! Output transports for event streams.
//!
//! A session writes into an [`EventSink`]. Writes are buffered; `flush`
//! pushes the buffered event to the client without ending the response.

use std::convert::Infallible;
use std::future::Future;

use axum::response::sse::Event;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

/// Events as consumed by [`axum::response::sse::Sse`].
pub type EventStream = ReceiverStream<Result<Event, Infallible>>;

/// Errors raised while pushing output to a client.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SinkError {
    /// The client side of the stream is gone.
    #[error("client disconnected")]
    Disconnected,
}

/// A response transport that a stream session writes into.
pub trait EventSink: Send {
    /// Whether partial output can reach the client before the response ends.
    fn supports_flush(&self) -> bool;

    /// Queue one event carrying `data`.
    fn write(&mut self, data: &str);

    /// Send queued output to the client now.
    fn flush(&mut self) -> impl Future<Output = Result<(), SinkError>> + Send;

    /// Resolve once the client has gone away.
    fn closed(&self) -> impl Future<Output = ()> + Send;
}

/// Sink feeding an [`EventStream`] through a bounded channel.
///
/// Each flush sends one [`Event`], which `Sse` renders as a single
/// `data:` frame.
#[derive(Debug)]
pub struct ChannelSink {
    tx: mpsc::Sender<Result<Event, Infallible>>,
    pending: Vec<Event>,
}

impl ChannelSink {
    /// Create a sink and the event stream it feeds.
    pub fn new(capacity: usize) -> (Self, EventStream) {
        let (tx, rx) = mpsc::channel(capacity);
        let sink = Self {
            tx,
            pending: Vec::new(),
        };
        (sink, ReceiverStream::new(rx))
    }
}

impl EventSink for ChannelSink {
    fn supports_flush(&self) -> bool {
        true
    }

    fn write(&mut self, data: &str) {
        self.pending.push(Event::default().data(data));
    }

    async fn flush(&mut self) -> Result<(), SinkError> {
        for event in self.pending.drain(..) {
            self.tx
                .send(Ok(event))
                .await
                .map_err(|_| SinkError::Disconnected)?;
        }
        Ok(())
    }

    async fn closed(&self) {
        self.tx.closed().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        response::{sse::Sse, IntoResponse},
    };
    use futures_util::StreamExt;

    fn body(events: EventStream) -> Body {
        Sse::new(events).into_response().into_body()
    }

    #[tokio::test]
    async fn test_one_frame_per_flush() {
        let (mut sink, events) = ChannelSink::new(4);
        let mut frames = body(events).into_data_stream();

        sink.write("Current time is 2024-01-01T00:00:00Z");
        sink.flush().await.unwrap();

        let frame = frames.next().await.unwrap().unwrap();
        assert_eq!(&frame[..], b"data: Current time is 2024-01-01T00:00:00Z\n\n");
    }

    #[tokio::test]
    async fn test_flush_without_write_sends_nothing() {
        let (mut sink, events) = ChannelSink::new(4);
        sink.flush().await.unwrap();
        drop(sink);

        let mut frames = body(events).into_data_stream();
        assert!(frames.next().await.is_none());
    }

    #[tokio::test]
    async fn test_dropped_stream_closes_sink() {
        let (mut sink, events) = ChannelSink::new(4);
        drop(events);

        sink.closed().await;
        sink.write("late");
        assert_eq!(sink.flush().await, Err(SinkError::Disconnected));
    }
}
