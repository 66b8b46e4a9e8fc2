//! CORS relay server.
//!
//! ```text
//!   Browser ──POST /tools/*──▶ ┌──────────────────────────────┐ ──GET/POST/PUT/──▶ Target
//!           ◀──── JSON ─────── │ request id → trace → cors    │    PATCH/DELETE     service
//!                              │ → routes → RouteProfile      │ ◀───────────────
//!                              │ → relay client → normalize   │
//!                              └──────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use cors_relay::config::{load_config, validation::validate_config, ConfigError, RelayConfig};
use cors_relay::observability::{logging, metrics};
use cors_relay::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "cors-relay", version)]
#[command(about = "Relay browser API calls server-side to work around CORS", long_about = None)]
struct Args {
    /// TOML configuration file. Built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address (e.g. 0.0.0.0:5000).
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => RelayConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
        validate_config(&config).map_err(ConfigError::Validation)?;
    }

    // Held until exit so buffered file logs are flushed.
    let _log_guard = logging::init(&config.logging)?;

    tracing::info!("cors-relay v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        config_file = ?args.config,
        bind_address = %config.listener.bind_address,
        upstream_timeout_secs = config.upstream.timeout_secs,
        request_timeout_secs = config.timeouts.request_secs,
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
    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
