//! Dispatch-by-action handler for `/api/getplan`.
//!
//! GET reads a plan (two upstream calls, merged). POST purchases, adds
//! bandwidth or edits the whitelist (one upstream call). Every other method
//! is answered 405.

use std::time::Instant;

use axum::{
    body::Bytes,
    extract::{RawQuery, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::error::{GatewayError, GatewayResult};
use crate::gateway::request::{PlanCommand, PlanQuery};
use crate::gateway::response::merge_plan_info;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::upstream::UpstreamReply;

pub async fn plan_handler(
    State(state): State<AppState>,
    method: Method,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> Response {
    let start = Instant::now();

    let (action, result) = match method {
        Method::GET => ("read", read_plan(&state, query.as_deref()).await),
        Method::POST => match PlanCommand::from_body(&body) {
            Ok(command) => (command.action(), execute(&state, command).await),
            Err(e) => ("invalid", Err(e)),
        },
        _ => ("unsupported", Err(GatewayError::MethodNotAllowed)),
    };

    let response = match result {
        Ok(reply) => (reply.status, Json(reply.body)).into_response(),
        Err(e) => {
            match &e {
                GatewayError::Validation(msg) => {
                    tracing::info!(action, reason = %msg, "Rejected request");
                }
                GatewayError::Unavailable => {
                    tracing::warn!(action, "Upstream API key not configured");
                }
                // Upstream and transport failures are logged by the client.
                _ => {}
            }
            e.into_response()
        }
    };

    metrics::record_request(action, response.status().as_u16(), start);
    response
}

/// Read proxy data, then plan info, and merge. Either failure short-circuits.
async fn read_plan(state: &AppState, query: Option<&str>) -> GatewayResult<UpstreamReply> {
    let PlanQuery { plan_id } = PlanQuery::from_query(query)?;
    let client = state.upstream()?;

    tracing::debug!(plan_id = %plan_id, "Reading plan");

    let proxies = client.read_plan(&plan_id).await?;
    let info = client.plan_info(&plan_id).await?;

    Ok(UpstreamReply {
        status: StatusCode::OK,
        body: merge_plan_info(proxies.body, info.body),
    })
}

async fn execute(state: &AppState, command: PlanCommand) -> GatewayResult<UpstreamReply> {
    let client = state.upstream()?;

    match command {
        PlanCommand::Purchase { bandwidth_gb } => {
            tracing::info!(bandwidth_gb, "Purchasing plan");
            client.create_plan(bandwidth_gb).await
        }
        PlanCommand::ModifyBandwidth { plan_id } => {
            tracing::info!(
                plan_id = %plan_id,
                increment_gb = client.bandwidth_increment_gb(),
                "Adding bandwidth"
            );
            client.add_bandwidth(&plan_id).await
        }
        PlanCommand::ManageWhitelist {
            plan_id,
            ip_address,
            action,
        } => {
            tracing::info!(
                plan_id = %plan_id,
                ip_address = %ip_address,
                whitelist_action = action.as_str(),
                "Updating whitelist"
            );
            client.update_whitelist(&plan_id, &ip_address, action).await
        }
    }
}

/// Liveness probe. Never touches the upstream.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "upstream_configured": state.upstream.is_some(),
    }))
}
