//! Course-selection relay (v1)
//!
//! A backend-for-frontend built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │                    RELAY                     │
//!   Browser            │  ┌─────────┐    ┌──────────┐    ┌─────────┐  │
//!   POST /api/* ───────┼─▶│  http   │───▶│  relay   │───▶│transport│──┼──▶ bkjx.nenu.edu.cn
//!                      │  │handlers │    │ service  │    │(reqwest)│  │    /new/student/xsxk/...
//!   JSON / text ◀──────┼──│response │◀───│  reply   │◀───│         │◀─┼───
//!                      │  └─────────┘    └──────────┘    └─────────┘  │
//!   GET /, /static ────┼─▶ static files                                │
//!                      └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use xsxk_relay::config::{load_config, validate_config, ConfigError, RelayConfig};
use xsxk_relay::lifecycle::{signals, Shutdown};
use xsxk_relay::observability::{logging, metrics};
use xsxk_relay::HttpServer;

#[derive(Parser)]
#[command(name = "xsxk-relay")]
#[command(about = "Course-selection relay for the bkjx upstream", long_about = None)]
struct Args {
    /// Path to a TOML config file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

fn load(args: &Args) -> Result<RelayConfig, ConfigError> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => RelayConfig::default(),
    };
    if let Some(bind) = &args.bind {
        config.listener.bind_address = bind.clone();
        validate_config(&config).map_err(ConfigError::Validation)?;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load(&args)?;

    logging::init_tracing(&config.observability.log_level);

    tracing::info!("xsxk-relay v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base(),
        request_timeout_secs = config.timeouts.request_secs,
        static_files = config.static_files.enabled,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(&shutdown);

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
