//! HTTP client for the gateway's `/api/getplan` surface.

use reqwest::{Client, Response};
use serde_json::{json, Value};
use thiserror::Error;

use crate::upstream::WhitelistAction;

/// Shown when a failed reply carries no `error` message.
pub const GENERIC_ERROR: &str = "An unexpected error occurred.";

/// Errors seen by the dashboard.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The gateway could not be reached.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway answered with a non-2xx status.
    #[error("{message}")]
    Gateway { status: u16, message: String },

    #[error("unexpected response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("purchase response did not include a plan ID")]
    MissingPlanId,

    #[error("no active plan")]
    NoActivePlan,

    #[error("{0}")]
    InvalidInput(String),
}

impl ClientError {
    /// Message suitable for inline display.
    pub fn display_message(&self) -> String {
        match self {
            ClientError::Gateway { message, .. } => message.clone(),
            ClientError::InvalidInput(msg) => msg.clone(),
            ClientError::NoActivePlan => "Purchase a plan to get started".to_string(),
            _ => GENERIC_ERROR.to_string(),
        }
    }
}

/// Result type for dashboard calls.
pub type ClientResult<T> = Result<T, ClientError>;

/// Client for a running gateway.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    client: Client,
    endpoint: String,
}

impl GatewayClient {
    /// `gateway_url` is the gateway origin, e.g. `http://localhost:8080`.
    pub fn new(gateway_url: &str) -> Self {
        Self::with_client(Client::new(), gateway_url)
    }

    pub fn with_client(client: Client, gateway_url: &str) -> Self {
        Self {
            client,
            endpoint: format!("{}/api/getplan", gateway_url.trim_end_matches('/')),
        }
    }

    /// Read proxy data merged with plan info.
    pub async fn read_plan(&self, plan_id: &str) -> ClientResult<Value> {
        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[("planId", plan_id)])
            .send()
            .await?;
        decode(resp).await
    }

    /// Buy a plan of `bandwidth_gb` gigabytes.
    pub async fn purchase(&self, bandwidth_gb: u64) -> ClientResult<Value> {
        self.post(json!({ "action": "purchase", "bandwidth": bandwidth_gb }))
            .await
    }

    /// Add the gateway's fixed bandwidth increment.
    pub async fn modify_bandwidth(&self, plan_id: &str) -> ClientResult<Value> {
        self.post(json!({ "action": "modifyBandwidth", "planId": plan_id }))
            .await
    }

    /// Add or remove one whitelisted address.
    pub async fn manage_whitelist(
        &self,
        plan_id: &str,
        ip_address: &str,
        action: WhitelistAction,
    ) -> ClientResult<Value> {
        // The add/remove choice rides in `bandwidth`; the gateway expects exactly that.
        self.post(json!({
            "action": "manageWhitelist",
            "planId": plan_id,
            "ipAddress": ip_address,
            "bandwidth": action.as_str(),
        }))
        .await
    }

    async fn post(&self, body: Value) -> ClientResult<Value> {
        let resp = self.client.post(&self.endpoint).json(&body).send().await?;
        decode(resp).await
    }
}

async fn decode(resp: Response) -> ClientResult<Value> {
    let status = resp.status();
    let text = resp.text().await?;

    if !status.is_success() {
        let message = serde_json::from_str::<Value>(&text)
            .ok()
            .and_then(|body| body.get("error").and_then(Value::as_str).map(str::to_string))
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| GENERIC_ERROR.to_string());
        return Err(ClientError::Gateway {
            status: status.as_u16(),
            message,
        });
    }

    Ok(serde_json::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_normalisation() {
        let client = GatewayClient::new("http://localhost:8080/");
        assert_eq!(client.endpoint, "http://localhost:8080/api/getplan");
    }

    #[test]
    fn test_display_messages() {
        let err = ClientError::Gateway {
            status: 400,
            message: "Bandwidth is required.".into(),
        };
        assert_eq!(err.display_message(), "Bandwidth is required.");
        assert_eq!(ClientError::MissingPlanId.display_message(), GENERIC_ERROR);
    }
}
