//! Test server wrapper that starts Tollgate on a random port

use std::net::SocketAddr;
use std::sync::Arc;

use tollgate_config::Config;
use tollgate_server::Server;
use tollgate_store::{KeyValueStore, MemoryStore, SharedStore, keys};
use tokio_util::sync::CancellationToken;

/// A running test server backed by an in-memory store
pub struct TestServer {
    addr: SocketAddr,
    shutdown: CancellationToken,
    client: reqwest::Client,
    store: Arc<MemoryStore>,
}

impl TestServer {
    /// Start a test server with the given configuration
    pub async fn start(config: Config) -> anyhow::Result<Self> {
        let store = Arc::new(MemoryStore::new());
        let shared: SharedStore = store.clone();
        let server = Server::with_store(config, shared)?;

        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        tokio::spawn(async move {
            axum::serve(listener, server.into_router())
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self {
            addr,
            shutdown,
            client: reqwest::Client::new(),
            store,
        })
    }

    /// Base URL of the running test server
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Get a reference to the HTTP client
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Register a service key
    pub async fn add_service_key(&self, key: &str) {
        self.store.set(&keys::credential_key(key), "1").await.unwrap();
    }

    /// Write a raw balance value
    pub async fn seed_balance(&self, user_id: i64, raw: &str) {
        self.store.set(&keys::balance_key(user_id), raw).await.unwrap();
    }

    /// Read a raw balance value
    pub async fn stored_balance(&self, user_id: i64) -> Option<String> {
        self.store.get(&keys::balance_key(user_id)).await.unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
