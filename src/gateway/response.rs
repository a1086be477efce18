//! Response composition for Read Plan.

use serde_json::{Map, Value};

/// Key under which plan metadata is attached to the proxy payload.
pub const PLAN_INFO_KEY: &str = "planInfo";

/// Attach `plan_info` to the proxy payload under [`PLAN_INFO_KEY`].
///
/// Existing fields keep their order; a non-object payload contributes nothing.
pub fn merge_plan_info(proxies: Value, plan_info: Value) -> Value {
    let mut merged = match proxies {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    merged.insert(PLAN_INFO_KEY.to_string(), plan_info);
    Value::Object(merged)
}
