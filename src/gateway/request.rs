//! Inbound request parsing and validation.
//!
//! GET carries `planId` in the query string. POST carries a JSON object whose
//! `action` field selects the command; no `action` means purchase.
//! For `manageWhitelist`, the add/remove choice travels in `bandwidth`.

use serde_json::{Map, Value};

use crate::error::{GatewayError, GatewayResult};
use crate::upstream::WhitelistAction;

pub const MSG_PLAN_ID_REQUIRED: &str = "Plan ID is required.";
pub const MSG_BANDWIDTH_REQUIRED: &str = "Bandwidth is required.";
pub const MSG_BANDWIDTH_POSITIVE: &str = "Bandwidth must be a positive integer.";
pub const MSG_INVALID_ACTION: &str = "Invalid action";
pub const MSG_WHITELIST_FIELDS: &str = "Plan ID and IP address are required.";
pub const MSG_INVALID_BODY: &str = "Invalid request body.";

/// Query of a Read Plan request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanQuery {
    pub plan_id: String,
}

impl PlanQuery {
    /// Extract `planId` from a raw query string.
    pub fn from_query(query: Option<&str>) -> GatewayResult<Self> {
        let plan_id = query
            .and_then(|q| {
                url::form_urlencoded::parse(q.as_bytes())
                    .find(|(key, _)| key == "planId")
                    .map(|(_, value)| value.into_owned())
            })
            .filter(|id| !id.is_empty())
            .ok_or_else(|| GatewayError::validation(MSG_PLAN_ID_REQUIRED))?;

        Ok(Self { plan_id })
    }
}

/// A validated POST command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanCommand {
    Purchase {
        bandwidth_gb: u64,
    },
    ModifyBandwidth {
        plan_id: String,
    },
    ManageWhitelist {
        plan_id: String,
        ip_address: String,
        action: WhitelistAction,
    },
}

impl PlanCommand {
    /// Parse a raw POST body. An empty body is an empty object.
    pub fn from_body(body: &[u8]) -> GatewayResult<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Self::from_fields(&Map::new());
        }

        match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(fields)) => Self::from_fields(&fields),
            _ => Err(GatewayError::validation(MSG_INVALID_BODY)),
        }
    }

    /// Dispatch on `action` and validate the fields that action needs.
    pub fn from_fields(fields: &Map<String, Value>) -> GatewayResult<Self> {
        match fields.get("action") {
            None | Some(Value::Null) => Self::purchase(fields),
            Some(Value::String(action)) => match action.as_str() {
                "purchase" => Self::purchase(fields),
                "modifyBandwidth" => {
                    let plan_id = plan_id_field(fields)
                        .ok_or_else(|| GatewayError::validation(MSG_PLAN_ID_REQUIRED))?;
                    Ok(PlanCommand::ModifyBandwidth { plan_id })
                }
                "manageWhitelist" => {
                    let plan_id = plan_id_field(fields);
                    let ip_address = non_empty_str(fields.get("ipAddress"));
                    let (Some(plan_id), Some(ip_address)) = (plan_id, ip_address) else {
                        return Err(GatewayError::validation(MSG_WHITELIST_FIELDS));
                    };
                    let action =
                        WhitelistAction::from_wire(fields.get("bandwidth").and_then(Value::as_str));
                    Ok(PlanCommand::ManageWhitelist {
                        plan_id,
                        ip_address,
                        action,
                    })
                }
                _ => Err(GatewayError::validation(MSG_INVALID_ACTION)),
            },
            Some(_) => Err(GatewayError::validation(MSG_INVALID_ACTION)),
        }
    }

    fn purchase(fields: &Map<String, Value>) -> GatewayResult<Self> {
        let raw = match fields.get("bandwidth") {
            None | Some(Value::Null) => {
                return Err(GatewayError::validation(MSG_BANDWIDTH_REQUIRED))
            }
            Some(v) => v,
        };

        match parse_int_prefix(raw) {
            Some(n) if n > 0 => Ok(PlanCommand::Purchase {
                bandwidth_gb: n as u64,
            }),
            _ => Err(GatewayError::validation(MSG_BANDWIDTH_POSITIVE)),
        }
    }

    /// Label used in logs and metrics.
    pub fn action(&self) -> &'static str {
        match self {
            PlanCommand::Purchase { .. } => "purchase",
            PlanCommand::ModifyBandwidth { .. } => "modifyBandwidth",
            PlanCommand::ManageWhitelist { .. } => "manageWhitelist",
        }
    }
}

fn plan_id_field(fields: &Map<String, Value>) -> Option<String> {
    match fields.get("planId") {
        Some(Value::Number(n)) => Some(n.to_string()),
        other => non_empty_str(other),
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Leading-integer parse of a JSON value's string form.
///
/// Arrays read as their comma-joined elements, so `[5]` → 5. After optional
/// whitespace and sign, a `0x` prefix selects hex, otherwise decimal digits
/// are read up to the first non-digit: `"12abc"` → 12, `7.9` → 7. Values too
/// large for `i64` saturate. `"abc"`, `[]`, booleans and objects → `None`.
pub fn parse_int_prefix(value: &Value) -> Option<i64> {
    leading_integer(&string_form(value))
}

fn string_form(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => string_form(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

fn leading_integer(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let (radix, digits) = match rest.get(..2) {
        Some("0x" | "0X") => (16, &rest[2..]),
        _ => (10, rest),
    };

    let end = digits
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    // Only valid digits remain, so a parse failure is overflow.
    let magnitude = i64::from_str_radix(&digits[..end], radix).unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}
