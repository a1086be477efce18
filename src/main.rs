//! IPv6 proxy reseller gateway.
//!
//! A thin relay between the reseller dashboard and the upstream reseller API,
//! built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                          ┌──────────────────────────────────────────────┐
//!                          │               RESELLER GATEWAY               │
//!                          │                                              │
//!     Dashboard Request    │  ┌─────────┐    ┌──────────┐    ┌─────────┐  │
//!     ─────────────────────┼─▶│  http   │───▶│ gateway  │───▶│upstream │──┼──▶ Reseller
//!                          │  │ server  │    │ dispatch │    │ client  │  │    API
//!                          │  └─────────┘    └────┬─────┘    └─────────┘  │
//!                          │                      │                       │
//!     Dashboard Response   │                ┌─────▼─────┐                 │
//!     ◀────────────────────┼────────────────│ response  │                 │
//!                          │                │ compose   │                 │
//!                          │                └───────────┘                 │
//!                          │  config · observability · lifecycle          │
//!                          └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use reseller_gateway::config::{loader, GatewayConfig};
use reseller_gateway::lifecycle::{signals, startup, Shutdown};
use reseller_gateway::observability::logging;

#[derive(Parser)]
#[command(name = "reseller-gateway")]
#[command(about = "Relay between the reseller dashboard and the upstream reseller API", long_about = None)]
struct Args {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => loader::load_config(path)?,
        None => loader::parse_config("")?,
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
        if let Err(errors) = reseller_gateway::config::validation::validate_config(&config) {
            return Err(loader::ConfigError::Validation(errors).into());
        }
    }

    logging::init_logging(&config.observability.log_level);

    tracing::info!("reseller-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    log_config(&config);

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(shutdown.clone());

    startup::serve(config, shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn log_config(config: &GatewayConfig) {
    tracing::info!(
        bind_address = %config.listener.bind_address,
        tls = config.listener.tls.is_some(),
        upstream = %config.upstream.base_url,
        product_family = %config.upstream.product_family,
        upstream_configured = config.upstream.is_configured(),
        upstream_timeout_secs = ?config.upstream.timeout_secs,
        "Configuration loaded"
    );
}
