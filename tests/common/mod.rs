//! Shared utilities for integration testing.

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use sse_clock::config::ServerConfig;
use sse_clock::lifecycle::{Supervisor, SupervisorError};
use sse_clock::ShutdownOutcome;

/// A supervisor serving on an ephemeral loopback port.
pub struct TestServer {
    pub addr: SocketAddr,
    stop: oneshot::Sender<()>,
    handle: JoinHandle<Result<ShutdownOutcome, SupervisorError>>,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Deliver the stop request and wait for the supervisor to return.
    pub async fn stop(self) -> Result<ShutdownOutcome, SupervisorError> {
        let _ = self.stop.send(());
        self.handle.await.expect("supervisor task panicked")
    }
}

/// Start a supervisor with `config`, stopped by [`TestServer::stop`].
pub async fn start_server(config: ServerConfig) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop, stopped) = oneshot::channel::<()>();

    let supervisor = Supervisor::new(config);
    let handle = tokio::spawn(supervisor.serve(listener, async move {
        let _ = stopped.await;
    }));

    TestServer { addr, stop, handle }
}
