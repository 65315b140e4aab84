//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the `/api/*` handlers
//! - Mount the landing page and static assets
//! - Wire up middleware (tracing, body limit, request ID)
//! - Serve on a listener until shutdown

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::config::RelayConfig;
use crate::http::handlers;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::lifecycle::shutdown;
use crate::relay::{HttpTransport, Relay, UpstreamTransport};

/// Application state injected into handlers.
pub struct AppState<T> {
    pub relay: Arc<Relay<T>>,
    /// Budget for one `/api/*` call; `None` lets it run to completion.
    pub request_timeout: Option<Duration>,
}

impl<T> AppState<T> {
    pub fn new(relay: Arc<Relay<T>>, config: &RelayConfig) -> Self {
        let request_timeout = match config.timeouts.request_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };
        Self {
            relay,
            request_timeout,
        }
    }
}

impl<T> Clone for AppState<T> {
    fn clone(&self) -> Self {
        Self {
            relay: Arc::clone(&self.relay),
            request_timeout: self.request_timeout,
        }
    }
}

/// HTTP server for the relay.
pub struct HttpServer {
    router: Router,
    config: RelayConfig,
}

impl HttpServer {
    /// Create a server that talks to the configured upstream over HTTP.
    pub fn new(config: RelayConfig) -> Result<Self, reqwest::Error> {
        let transport = HttpTransport::new(&config.upstream, &config.timeouts)?;
        Ok(Self::with_transport(config, transport))
    }

    /// Create a server over an arbitrary transport.
    pub fn with_transport<T: UpstreamTransport>(config: RelayConfig, transport: T) -> Self {
        let relay = Arc::new(Relay::new(transport, config.upstream.clone()));
        let router = build_router(&config, AppState::new(relay, &config));
        Self { router, config }
    }

    /// Run the server until `shutdown_rx` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.base(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown_rx))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// The assembled router, for in-process testing.
    pub fn into_router(self) -> Router {
        self.router
    }
}

/// Build the Axum router with all middleware layers.
///
/// Body size and the request budget are enforced inside the handlers so the
/// caller always gets a JSON error.
pub fn build_router<T: UpstreamTransport>(config: &RelayConfig, state: AppState<T>) -> Router {
    let mut router = Router::new()
        .route("/api/config", post(handlers::api_config::<T>))
        .route("/api/hzkc", post(handlers::api_hzkc::<T>))
        .route("/api/kxkc", post(handlers::api_kxkc::<T>))
        .route("/api/search", post(handlers::api_search::<T>))
        .route("/api/add", post(handlers::api_add::<T>))
        .route("/healthz", get(handlers::healthz))
        .with_state(state);

    if config.static_files.enabled {
        let dir = PathBuf::from(&config.static_files.dir);
        router = router
            .route_service("/", ServeFile::new(dir.join("index.html")))
            .nest_service("/static", ServeDir::new(dir));
    }

    router
        .layer(DefaultBodyLimit::max(config.listener.max_body_size))
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(set_request_id_layer())
}
