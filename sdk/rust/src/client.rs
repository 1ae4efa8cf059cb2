use std::time::Instant;

use chrono::{DateTime, FixedOffset};
use eventsource_client::{self as es, Client};
use futures_util::stream::StreamExt;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

const TIME_PREFIX: &str = "Current time is ";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid stream url: {0}")]
    Url(#[source] es::Error),

    #[error("server returned error status {0}")]
    Status(u16),

    #[error("stream failed: {0}")]
    Stream(#[source] es::Error),
}

/// One event received from the stream.
#[derive(Debug, Clone)]
pub struct ClockMessage {
    pub data: String,
    pub received_at: Instant,
}

impl ClockMessage {
    /// The timestamp carried by a clock event, if the payload is one.
    pub fn timestamp(&self) -> Option<DateTime<FixedOffset>> {
        let stamp = self.data.strip_prefix(TIME_PREFIX)?;
        DateTime::parse_from_rfc3339(stamp).ok()
    }
}

pub struct ClockClient {
    server_url: String,
    path: String,
}

impl ClockClient {
    pub fn new(server_url: &str) -> Self {
        Self {
            server_url: server_url.trim_end_matches('/').to_string(),
            path: "/sse".to_string(),
        }
    }

    /// Use a stream path other than `/sse`.
    pub fn with_path(mut self, path: &str) -> Self {
        self.path = path.to_string();
        self
    }

    /// Open the event stream.
    ///
    /// The connection is made in a background task; a refused connection or
    /// an error status surfaces from the first [`ClockSubscription::next_event`].
    /// The stream is never reopened once the server ends it.
    pub fn subscribe(&self) -> Result<ClockSubscription, ClientError> {
        let url = format!("{}{}", self.server_url, self.path);
        let client = es::ClientBuilder::for_url(&url)
            .map_err(ClientError::Url)?
            .header("Accept", "text/event-stream")
            .map_err(ClientError::Url)?
            .reconnect(es::ReconnectOptions::reconnect(false).build())
            .build();

        let (tx, events) = mpsc::unbounded_channel();
        let handle = tokio::spawn(async move {
            let mut stream = client.stream();

            loop {
                let message = match stream.next().await {
                    Some(Ok(es::SSE::Event(event))) => Ok(ClockMessage {
                        data: event.data,
                        received_at: Instant::now(),
                    }),
                    // Keep-alive comments
                    Some(Ok(es::SSE::Comment(_))) => continue,
                    Some(Err(es::Error::Eof)) | None => break,
                    Some(Err(es::Error::UnexpectedResponse(status))) => {
                        Err(ClientError::Status(status.as_u16()))
                    }
                    Some(Err(e)) => Err(ClientError::Stream(e)),
                };

                let failed = message.is_err();
                if tx.send(message).is_err() || failed {
                    break;
                }
            }
        });

        Ok(ClockSubscription { events, handle })
    }
}

/// An open event stream. Dropping it closes the connection.
pub struct ClockSubscription {
    events: mpsc::UnboundedReceiver<Result<ClockMessage, ClientError>>,
    handle: JoinHandle<()>,
}

impl ClockSubscription {
    /// Wait for the next event; `None` once the server ends the stream.
    pub async fn next_event(&mut self) -> Result<Option<ClockMessage>, ClientError> {
        self.events.recv().await.transpose()
    }
}

impl Drop for ClockSubscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
