#![allow(clippy::missing_errors_doc, clippy::must_use_candidate)]

mod balance;
mod error;
mod health;
mod relay;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{any, get};
use tollgate_auth::AccessGate;
use tollgate_config::Config;
use tollgate_ledger::BalanceLedger;
use tollgate_proxy::ProxyForwarder;
use tollgate_store::SharedStore;
use tower_http::trace::TraceLayer;

pub use error::{ErrorEnvelope, GatewayError};
pub use state::GatewayState;

/// Balance and proxy routes over shared gateway state
pub fn gateway_router(state: GatewayState) -> Router {
    Router::new()
        .route("/balance/{id}", get(balance::get_balance))
        .route("/balance-topup/{id}/{amount}", any(balance::top_up))
        .route("/balance-deduct/{id}/{amount}", any(balance::deduct))
        .route("/chatgpt", any(relay::relay_completion))
        .with_state(state)
}

/// Assembled server with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
}

impl Server {
    /// Connect to the configured store and build the server
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreachable or the upstream
    /// forwarder cannot be built
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = tollgate_store::connect(&config.store).await?;
        Self::with_store(config, store)
    }

    /// Build the server over an already connected store
    pub fn with_store(config: Config, store: SharedStore) -> anyhow::Result<Self> {
        let listen_address = config.server.listen_address();
        tracing::debug!(store = store.name(), upstream = %config.upstream.url, "building gateway");

        let state = GatewayState {
            ledger: BalanceLedger::new(Arc::clone(&store), &config.ledger),
            gate: AccessGate::new(store),
            forwarder: ProxyForwarder::new(&config.upstream)?,
            max_body_bytes: config.server.max_body_bytes,
        };

        let mut app = Router::new();

        if config.server.health.enabled {
            app = app.route(&config.server.health.path, get(health::health_handler));
        }

        app = app
            .merge(gateway_router(state))
            .fallback(error::route_not_found)
            .method_not_allowed_fallback(error::method_not_allowed);

        if config.server.uniform_error_status {
            app = app.layer(axum::middleware::from_fn(error::uniform_status_middleware));
        }

        app = app.layer(TraceLayer::new_for_http());

        Ok(Self {
            router: app,
            listen_address,
        })
    }

    /// Get the configured listen address
    pub const fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Consume the server and return the inner router
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Serve until `shutdown` is cancelled
    pub async fn serve(self, shutdown: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!("graceful shutdown initiated");
            })
            .await?;

        Ok(())
    }
}
