//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    http::{HeaderMap, StatusCode, Uri},
    Router,
};
use tokio::net::TcpListener;
use xsxk_relay::{HttpServer, RelayConfig, Shutdown};

/// One request seen by the mock upstream.
#[derive(Debug, Clone)]
pub struct Captured {
    pub path: String,
    pub headers: HeaderMap,
    pub body: String,
}

#[allow(dead_code)]
impl Captured {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

pub struct MockUpstream {
    pub addr: SocketAddr,
    captured: Arc<Mutex<Vec<Captured>>>,
}

#[allow(dead_code)]
impl MockUpstream {
    pub fn captured(&self) -> Vec<Captured> {
        self.captured.lock().unwrap().clone()
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

/// Start a programmable upstream. `f` maps the request path to a status
/// and body; every request is recorded.
pub async fn start_mock_upstream<F>(f: F) -> MockUpstream
where
    F: Fn(&str) -> (u16, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let captured = Arc::new(Mutex::new(Vec::new()));
    let f = Arc::new(f);

    let record = captured.clone();
    let handler = move |uri: Uri, headers: HeaderMap, body: String| {
        let record = record.clone();
        let f = f.clone();
        async move {
            let path = uri.path().to_string();
            let (status, reply) = (*f)(&path);
            record.lock().unwrap().push(Captured { path, headers, body });
            (StatusCode::from_u16(status).unwrap(), reply)
        }
    };

    let app = Router::new().fallback(handler);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockUpstream { addr, captured }
}

/// Relay config pointed at `base_url`, serving the repo's static directory.
pub fn relay_config(base_url: &str) -> RelayConfig {
    let mut config = RelayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.upstream.base_url = base_url.to_string();
    config.static_files.dir = format!("{}/static", env!("CARGO_MANIFEST_DIR"));
    config
}

/// Start the relay on an ephemeral port.
pub async fn start_relay(config: RelayConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).unwrap();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    (addr, shutdown)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
