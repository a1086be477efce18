//! Reseller API client.
//!
//! # Responsibilities
//! - Attach the static API key to every outbound call
//! - Build plan-scoped URLs under the fixed product family
//! - Classify replies: 2xx → `UpstreamReply`, other status → `GatewayError::Upstream`,
//!   no response → `GatewayError::Transport`
//!
//! Single attempt per call. No retries, no backoff.

use std::time::{Duration, Instant};

use axum::http::{HeaderName, HeaderValue, StatusCode};
use reqwest::multipart::Form;
use reqwest::RequestBuilder;
use serde_json::{json, Value};
use thiserror::Error;
use url::Url;

use crate::config::UpstreamConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::observability::metrics;
use crate::upstream::endpoints::{Endpoint, WhitelistAction};

/// Errors building a client from configuration.
#[derive(Debug, Error)]
pub enum ClientSetupError {
    #[error("upstream API key is not configured")]
    MissingApiKey,
    #[error("invalid upstream base URL: {0}")]
    BaseUrl(#[from] url::ParseError),
    #[error("invalid API key header name: {0}")]
    HeaderName(#[from] axum::http::header::InvalidHeaderName),
    #[error("API key is not a valid header value")]
    HeaderValue(#[from] axum::http::header::InvalidHeaderValue),
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// A successful (2xx) upstream reply.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub body: Value,
}

/// Client for the reseller HTTP API.
#[derive(Clone)]
pub struct ResellerClient {
    http: reqwest::Client,
    base_url: Url,
    product_family: String,
    api_key_header: HeaderName,
    api_key: HeaderValue,
    bandwidth_increment_gb: u32,
}

impl ResellerClient {
    /// Create a client from upstream configuration.
    pub fn new(config: &UpstreamConfig) -> Result<Self, ClientSetupError> {
        if !config.is_configured() {
            return Err(ClientSetupError::MissingApiKey);
        }

        let base_url = Url::parse(&config.base_url)?;
        let api_key_header = HeaderName::from_bytes(config.api_key_header.trim().as_bytes())?;
        let mut api_key = HeaderValue::from_str(config.api_key.trim())?;
        api_key.set_sensitive(true);

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            http: builder.build()?,
            base_url,
            product_family: config.product_family.clone(),
            api_key_header,
            api_key,
            bandwidth_increment_gb: config.bandwidth_increment_gb,
        })
    }

    /// Gigabytes added by [`ResellerClient::add_bandwidth`].
    pub fn bandwidth_increment_gb(&self) -> u32 {
        self.bandwidth_increment_gb
    }

    /// Read proxy credentials and per-country proxy lists for a plan.
    pub async fn read_plan(&self, plan_id: &str) -> GatewayResult<UpstreamReply> {
        let endpoint = Endpoint::ReadPlan { plan_id };
        let req = self.http.get(self.url(&endpoint));
        self.send(endpoint, req).await
    }

    /// Read plan metadata (expiration, time left, whitelist).
    pub async fn plan_info(&self, plan_id: &str) -> GatewayResult<UpstreamReply> {
        let endpoint = Endpoint::PlanInfo { plan_id };
        let req = self.http.get(self.url(&endpoint));
        self.send(endpoint, req).await
    }

    /// Purchase a plan of `bandwidth_gb` gigabytes.
    pub async fn create_plan(&self, bandwidth_gb: u64) -> GatewayResult<UpstreamReply> {
        let endpoint = Endpoint::CreatePlan;
        let form = Form::new().text("bandwidth", bandwidth_gb.to_string());
        let req = self.http.post(self.url(&endpoint)).multipart(form);
        self.send(endpoint, req).await
    }

    /// Add the configured fixed increment to a plan.
    pub async fn add_bandwidth(&self, plan_id: &str) -> GatewayResult<UpstreamReply> {
        let endpoint = Endpoint::AddBandwidth {
            plan_id,
            gb: self.bandwidth_increment_gb,
        };
        let req = self.http.post(self.url(&endpoint));
        self.send(endpoint, req).await
    }

    /// Add or remove one whitelisted address. The address is not validated.
    pub async fn update_whitelist(
        &self,
        plan_id: &str,
        ip_address: &str,
        action: WhitelistAction,
    ) -> GatewayResult<UpstreamReply> {
        let endpoint = Endpoint::Whitelist { plan_id, action };
        let req = self
            .http
            .post(self.url(&endpoint))
            .json(&json!({ "ip": ip_address }));
        self.send(endpoint, req).await
    }

    fn url(&self, endpoint: &Endpoint<'_>) -> Url {
        endpoint.url(&self.base_url, &self.product_family)
    }

    async fn send(&self, endpoint: Endpoint<'_>, req: RequestBuilder) -> GatewayResult<UpstreamReply> {
        let start = Instant::now();
        let name = endpoint.name();

        let result = self.exchange(req).await;

        let outcome = match &result {
            Ok(_) => "ok",
            Err(GatewayError::Upstream { .. }) => "upstream_error",
            Err(_) => "transport_error",
        };
        metrics::record_upstream_call(name, outcome, start);

        match &result {
            Ok(reply) => {
                tracing::debug!(endpoint = name, status = %reply.status, "Upstream call succeeded");
            }
            Err(GatewayError::Upstream { status, .. }) => {
                tracing::warn!(endpoint = name, status = %status, "Upstream returned an error status");
            }
            Err(e) => {
                tracing::error!(endpoint = name, error = %e, "Upstream call failed");
            }
        }

        result
    }

    async fn exchange(&self, req: RequestBuilder) -> GatewayResult<UpstreamReply> {
        let response = req
            .header(self.api_key_header.clone(), self.api_key.clone())
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;
        let body = decode_body(&bytes);

        if status.is_success() {
            Ok(UpstreamReply { status, body })
        } else {
            Err(GatewayError::Upstream { status, body })
        }
    }
}

/// JSON bodies are parsed; anything else is carried as a JSON string.
pub fn decode_body(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}
