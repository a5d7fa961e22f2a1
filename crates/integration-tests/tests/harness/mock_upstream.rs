//! Mock completion API that records what the proxy sends

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use axum::{Router, routing};
use bytes::Bytes;
use tokio_util::sync::CancellationToken;

/// One request as the upstream saw it
#[derive(Debug, Clone)]
pub struct ReceivedRequest {
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl ReceivedRequest {
    /// Body decoded as JSON
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("upstream body is JSON")
    }
}

struct MockState {
    status: StatusCode,
    body: &'static str,
    received: Mutex<Vec<ReceivedRequest>>,
}

/// Mock upstream replying with a fixed status and body
pub struct MockUpstream {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

impl MockUpstream {
    /// Start a mock answering 200 with a canned completion
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_with(StatusCode::OK, r#"{"id":"cmpl-1","choices":[{"text":"pong"}]}"#).await
    }

    /// Start a mock answering every request with `status` and `body`
    pub async fn start_with(status: StatusCode, body: &'static str) -> anyhow::Result<Self> {
        let state = Arc::new(MockState {
            status,
            body,
            received: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/v1/completions", routing::post(handle_completion))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Completion endpoint URL
    pub fn url(&self) -> String {
        format!("http://{}/v1/completions", self.addr)
    }

    /// Requests received so far
    pub fn received(&self) -> Vec<ReceivedRequest> {
        self.state.received.lock().unwrap().clone()
    }
}

impl Drop for MockUpstream {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle_completion(State(state): State<Arc<MockState>>, headers: HeaderMap, body: Bytes) -> impl IntoResponse {
    state.received.lock().unwrap().push(ReceivedRequest { headers, body });

    (state.status, [(header::CONTENT_TYPE, "application/json")], state.body)
}
