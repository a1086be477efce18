//! Gateway error taxonomy and its HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

/// Everything that can stop a gateway request from producing a success reply.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Missing or malformed caller input.
    #[error("{0}")]
    Validation(String),

    /// The upstream answered with a non-2xx status. Relayed unchanged.
    #[error("upstream responded with {status}")]
    Upstream { status: StatusCode, body: Value },

    /// No response was received from the upstream.
    #[error("upstream transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// The gateway has no API key to talk to the upstream with.
    #[error("upstream API key is not configured")]
    Unavailable,

    #[error("method not allowed")]
    MethodNotAllowed,
}

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

impl GatewayError {
    pub fn validation(msg: impl Into<String>) -> Self {
        GatewayError::Validation(msg.into())
    }

    /// The status this error is answered with.
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::Validation(_) => StatusCode::BAD_REQUEST,
            GatewayError::Upstream { status, .. } => *status,
            GatewayError::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            GatewayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    fn body(self) -> Value {
        match self {
            GatewayError::Validation(msg) => json!({ "error": msg }),
            GatewayError::Upstream { body, .. } => body,
            GatewayError::Transport(_) => json!({ "error": "Internal server error." }),
            GatewayError::Unavailable => json!({ "error": "Service unavailable." }),
            GatewayError::MethodNotAllowed => json!({ "error": "Method not allowed" }),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(GatewayError::validation("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(GatewayError::Unavailable.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(GatewayError::MethodNotAllowed.status(), StatusCode::METHOD_NOT_ALLOWED);
        let upstream = GatewayError::Upstream {
            status: StatusCode::PAYMENT_REQUIRED,
            body: json!({ "error": "insufficient balance" }),
        };
        assert_eq!(upstream.status(), StatusCode::PAYMENT_REQUIRED);
    }

    #[test]
    fn test_upstream_body_is_relayed_verbatim() {
        let body = json!({ "error": "plan not found", "code": 17 });
        let err = GatewayError::Upstream {
            status: StatusCode::NOT_FOUND,
            body: body.clone(),
        };
        assert_eq!(err.body(), body);
    }

    #[test]
    fn test_validation_body() {
        let err = GatewayError::validation("Plan ID is required.");
        assert_eq!(err.to_string(), "Plan ID is required.");
        assert_eq!(err.body(), json!({ "error": "Plan ID is required." }));
    }
}
