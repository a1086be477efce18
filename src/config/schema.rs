//! Gateway configuration types.
//!
//! Every section is optional in the TOML file; missing keys take the values
//! in the `Default` impls below.

use serde::{Deserialize, Serialize};

/// Root configuration for the reseller gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Where the gateway accepts dashboard traffic.
    pub listener: ListenerConfig,

    /// Upstream reseller API settings.
    pub upstream: UpstreamConfig,

    /// Log filter and Prometheus exporter.
    pub observability: ObservabilityConfig,

    /// Inbound request limits.
    pub security: SecurityConfig,
}

/// Inbound socket.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// `host:port` to bind.
    pub bind_address: String,

    /// Serve HTTPS when present.
    pub tls: Option<TlsConfig>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            tls: None,
        }
    }
}

/// PEM files for HTTPS.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    pub cert_path: String,
    pub key_path: String,
}

/// Upstream reseller API configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL every endpoint path is appended to.
    pub base_url: String,

    /// Product family path segment. Callers never choose it.
    pub product_family: String,

    /// Reseller API key. Overridden by the `API_KEY` environment variable.
    pub api_key: String,

    /// Header the API key travels in.
    pub api_key_header: String,

    /// Gigabytes added per `modifyBandwidth` call.
    pub bandwidth_increment_gb: u32,

    /// Outbound request timeout, the only deadline the gateway applies.
    /// Unset means the HTTP client's default. Expiry answers 500.
    pub timeout_secs: Option<u64>,
}

impl UpstreamConfig {
    /// Whether an API key is present.
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

// The key must never reach the logs, so Debug is written by hand.
impl std::fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("base_url", &self.base_url)
            .field("product_family", &self.product_family)
            .field("api_key", &if self.is_configured() { "<redacted>" } else { "<unset>" })
            .field("api_key_header", &self.api_key_header)
            .field("bandwidth_increment_gb", &self.bandwidth_increment_gb)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://resell.lightningproxies.net/api".to_string(),
            product_family: "ipv6".to_string(),
            api_key: String::new(),
            api_key_header: "x-api-key".to_string(),
            bandwidth_increment_gb: 5,
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default level for the gateway's own targets. `RUST_LOG` wins when set.
    pub log_level: String,

    /// Start the Prometheus exporter.
    pub metrics_enabled: bool,

    /// Exporter listen address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Largest accepted POST body; larger bodies get 413.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 64 * 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: GatewayConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.upstream.product_family, "ipv6");
        assert_eq!(config.upstream.bandwidth_increment_gb, 5);
        assert!(config.upstream.timeout_secs.is_none());
        assert!(!config.upstream.is_configured());
    }

    #[test]
    fn test_partial_section() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [upstream]
            api_key = "k-123"
            timeout_secs = 12
            "#,
        )
        .unwrap();
        assert!(config.upstream.is_configured());
        assert_eq!(config.upstream.timeout_secs, Some(12));
        assert_eq!(config.upstream.api_key_header, "x-api-key");
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let mut upstream = UpstreamConfig::default();
        upstream.api_key = "super-secret".into();
        let rendered = format!("{:?}", upstream);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
