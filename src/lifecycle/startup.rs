//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the server from a validated configuration
//! - Start the metrics exporter when enabled
//! - Bind the listener last, so traffic arrives only when ready
//!
//! Any startup error is fatal.

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::GatewayConfig;
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::upstream::ClientSetupError;

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid bind address '{0}'")]
    BindAddress(String),
    #[error(transparent)]
    Upstream(#[from] ClientSetupError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Start every subsystem and serve until `shutdown` is triggered.
pub async fn serve(config: GatewayConfig, shutdown: Shutdown) -> Result<(), StartupError> {
    let addr: SocketAddr = config
        .listener
        .bind_address
        .parse()
        .map_err(|_| StartupError::BindAddress(config.listener.bind_address.clone()))?;

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(metrics_addr) => metrics::init_metrics(metrics_addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let tls_enabled = config.listener.tls.is_some();
    let server = HttpServer::new(config)?;

    if tls_enabled {
        server.run_tls(addr, shutdown.signalled()).await?;
    } else {
        let listener = TcpListener::bind(addr).await?;
        tracing::info!(address = %listener.local_addr()?, "Listening for connections");
        server.run(listener, shutdown.signalled()).await?;
    }

    Ok(())
}
