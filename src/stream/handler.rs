//! HTTP entry point for the clock stream.

use std::convert::Infallible;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
};
use tokio_stream::Stream;

use crate::config::StreamConfig;
use crate::lifecycle::ShutdownSignal;
use crate::stream::session::{StreamError, StreamSession};
use crate::stream::sink::{ChannelSink, EventSink};

const X_REQUEST_ID: &str = "x-request-id";

/// Shared, read-only settings handed to every stream request.
#[derive(Debug, Clone)]
pub struct StreamState {
    shutdown: ShutdownSignal,
    interval: Duration,
    channel_capacity: usize,
}

impl StreamState {
    pub fn new(config: &StreamConfig, shutdown: ShutdownSignal) -> Self {
        Self {
            shutdown,
            interval: config.interval(),
            channel_capacity: config.channel_capacity,
        }
    }
}

impl IntoResponse for StreamError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, format!("{self}\n")).into_response()
    }
}

/// GET handler: answers with an event stream of clock ticks.
pub async fn clock_stream(State(state): State<StreamState>, headers: HeaderMap) -> Response {
    let request_id = headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let (sink, events) = ChannelSink::new(state.channel_capacity);
    start_stream(&state, request_id, sink, events)
}

/// Open a session on `sink` and spawn it; `events` is what the client reads.
pub fn start_stream<S, E>(state: &StreamState, request_id: String, sink: S, events: E) -> Response
where
    S: EventSink + 'static,
    E: Stream<Item = Result<Event, Infallible>> + Send + 'static,
{
    let session = match StreamSession::open(
        request_id.clone(),
        sink,
        state.shutdown.clone(),
        state.interval,
    ) {
        Ok(session) => session,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Stream rejected");
            return e.into_response();
        }
    };

    tracing::debug!(request_id = %session.id(), "Stream opened");
    tokio::spawn(async move {
        let summary = session.run().await;
        tracing::debug!(
            request_id = %summary.id,
            reason = ?summary.reason,
            events = summary.events,
            "Stream closed"
        );
    });

    (
        [(header::CONNECTION, "keep-alive")],
        Sse::new(events).keep_alive(KeepAlive::default()),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::Shutdown;
    use crate::stream::sink::SinkError;
    use axum::{body::Body, http::Request, routing::get, Router};
    use futures_util::StreamExt;
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;

    fn app(shutdown: &Shutdown) -> Router {
        let state = StreamState::new(&StreamConfig::default(), shutdown.subscribe());
        Router::new()
            .route("/sse", get(clock_stream))
            .with_state(state)
    }

    #[tokio::test(start_paused = true)]
    async fn test_stream_headers_and_first_event() {
        let shutdown = Shutdown::new();
        let response = app(&shutdown)
            .oneshot(Request::get("/sse").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_TYPE], "text/event-stream");
        assert_eq!(headers[header::CACHE_CONTROL], "no-cache");
        assert_eq!(headers[header::CONNECTION], "keep-alive");

        let mut frames = response.into_body().into_data_stream();
        let first = frames.next().await.unwrap().unwrap();
        let line = std::str::from_utf8(&first).unwrap();
        let stamp = line
            .strip_prefix("data: Current time is ")
            .and_then(|rest| rest.strip_suffix("\n\n"))
            .expect("one data line per event");
        assert!(chrono::DateTime::parse_from_rfc3339(stamp).is_ok(), "{line:?}");

        shutdown.trigger();
        assert!(frames.next().await.is_none(), "stream must end on shutdown");
    }

    #[derive(Clone, Default)]
    struct BufferedSink {
        written: Arc<Mutex<Vec<String>>>,
    }

    impl EventSink for BufferedSink {
        fn supports_flush(&self) -> bool {
            false
        }

        fn write(&mut self, data: &str) {
            self.written.lock().unwrap().push(data.to_string());
        }

        async fn flush(&mut self) -> Result<(), SinkError> {
            Ok(())
        }

        async fn closed(&self) {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_unflushable_transport_gets_500() {
        let shutdown = Shutdown::new();
        let state = StreamState::new(&StreamConfig::default(), shutdown.subscribe());
        let sink = BufferedSink::default();
        let written = sink.written.clone();

        let events = tokio_stream::empty::<Result<Event, Infallible>>();
        let response = start_stream(&state, "req-1".into(), sink, events);

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/plain"));
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"Streaming unsupported!\n");
        assert!(written.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_post_not_allowed() {
        let shutdown = Shutdown::new();
        let response = app(&shutdown)
            .oneshot(Request::post("/sse").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
