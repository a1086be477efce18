//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, body limit)
//!
//! There is no inbound deadline. Upstream calls are bounded only by
//! `upstream.timeout_secs`, so a slow purchase is never cut off after the
//! upstream has accepted it.
//! - Bind server to listener, plain or TLS
//! - Hold the shared, read-only upstream client

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::Request,
    routing::{any, get},
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::gateway::{health, plan_handler};
use crate::http::request::{request_span, MakeRequestUuidV4};
use crate::http::tls::load_tls_config;
use crate::upstream::{ClientSetupError, ResellerClient};

/// Route the dashboard calls.
pub const PLAN_ROUTE: &str = "/api/getplan";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// `None` when no API key is configured.
    pub upstream: Option<Arc<ResellerClient>>,
}

impl AppState {
    /// The upstream client, or `Unavailable` when the gateway is unconfigured.
    pub fn upstream(&self) -> GatewayResult<&ResellerClient> {
        self.upstream.as_deref().ok_or(GatewayError::Unavailable)
    }
}

/// HTTP server for the reseller gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, ClientSetupError> {
        let upstream = if config.upstream.is_configured() {
            Some(Arc::new(ResellerClient::new(&config.upstream)?))
        } else {
            tracing::warn!("No upstream API key configured; plan requests will answer 503");
            None
        };

        let state = AppState { upstream };
        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        let request_ids = ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| request_span(request)))
            .layer(PropagateRequestIdLayer::x_request_id());

        Router::new()
            .route(PLAN_ROUTE, any(plan_handler))
            .route("/health", get(health))
            .with_state(state)
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(request_ids)
    }

    /// Run the server on a plain TCP listener until `shutdown` resolves.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Run the server with TLS from `listener.tls` until `shutdown` resolves.
    pub async fn run_tls<F>(self, addr: SocketAddr, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let Some(tls) = self.config.listener.tls.as_ref() else {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "TLS requested without listener.tls configuration",
            ));
        };
        let rustls = load_tls_config(tls).await?;

        let handle = axum_server::Handle::new();
        let shutdown_handle = handle.clone();
        tokio::spawn(async move {
            shutdown.await;
            shutdown_handle.graceful_shutdown(Some(Duration::from_secs(10)));
        });

        tracing::info!(address = %addr, "HTTPS server starting");
        axum_server::bind_rustls(addr, rustls)
            .handle(handle)
            .serve(self.router.into_make_service())
            .await?;

        tracing::info!("HTTPS server stopped");
        Ok(())
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}
