//! RPT gateway
//!
//! ```text
//!     Client Request                ┌────────────────────────────────────────────┐
//!     ──────────────────────────────┼─▶ request id ─▶ timeout ─▶ exchange gate ──┼──▶ Backend
//!                                   │                               │            │
//!     Client Response               │                               ▼            │
//!     ◀─────────────────────────────┼── 401 / 403 / 500 ◀──── token endpoint     │
//!                                   └────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use rpt_gateway::config::load_config;
use rpt_gateway::lifecycle::signals::wait_for_shutdown;
use rpt_gateway::observability::{logging, metrics};
use rpt_gateway::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "rpt-gateway")]
#[command(
    about = "Upgrades bearer tokens into requesting party tokens in front of a backend",
    long_about = None
)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "gateway.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    logging::init(&config.observability.log_level);

    tracing::info!(
        path = %cli.config.display(),
        bind_address = %config.listener.bind_address,
        authorization_endpoint = %config.exchange.authorization_endpoint,
        audience = %config.exchange.audience,
        upstream = %config.upstream.address,
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
    let server = HttpServer::new(config)?;

    let shutdown = Shutdown::new();
    let server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    wait_for_shutdown().await;
    shutdown.trigger();
    server_task.await??;

    tracing::info!("Shutdown complete");
    Ok(())
}
