//! Plan and proxy data as the dashboard holds it.
//!
//! Decoding is lenient: a `null` or oddly typed field falls back to its
//! default instead of failing the whole Read Plan reply.

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// The plan purchased or resumed in this session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub plan_id: String,
    /// Known when the plan was bought in this session.
    pub bandwidth_gb: Option<u64>,
}

/// Proxy credentials and usage for a plan.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProxyCredentials {
    #[serde(default, deserialize_with = "text_or_empty")]
    pub username: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub password: String,
    #[serde(default)]
    pub bandwidth: Option<Value>,
    #[serde(default, rename = "bandwidthLeft")]
    pub bandwidth_left: Option<Value>,
}

/// Plan metadata merged in by the gateway.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PlanInfo {
    #[serde(default)]
    pub expiration_date: Option<Value>,
    #[serde(default, deserialize_with = "optional_text")]
    pub time_left: Option<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub whitelist: Vec<String>,
}

/// Per-country proxy endpoint lists, in the order the upstream returned them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Value")]
pub struct CountryProxies(Vec<(String, Vec<String>)>);

impl From<Value> for CountryProxies {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => map.into(),
            _ => CountryProxies::default(),
        }
    }
}

impl From<Map<String, Value>> for CountryProxies {
    fn from(map: Map<String, Value>) -> Self {
        let entries = map
            .into_iter()
            .map(|(country, list)| (country, strings_in(list)))
            .collect();
        CountryProxies(entries)
    }
}

impl CountryProxies {
    /// Country codes in upstream order.
    pub fn countries(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(country, _)| country.as_str())
    }

    pub fn first_country(&self) -> Option<&str> {
        self.countries().next()
    }

    /// Endpoints for one country.
    pub fn get(&self, country: &str) -> Option<&[String]> {
        self.0
            .iter()
            .find(|(c, _)| c == country)
            .map(|(_, list)| list.as_slice())
    }
}

/// Everything a Read Plan call returns.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProxyInfo {
    #[serde(default, deserialize_with = "object_or_default")]
    pub proxies: ProxyCredentials,
    #[serde(default)]
    pub whitelist_proxies: CountryProxies,
    #[serde(default, rename = "planInfo", deserialize_with = "object_or_default")]
    pub plan_info: Option<PlanInfo>,
}

impl ProxyInfo {
    /// Addresses currently whitelisted on the plan.
    pub fn whitelist(&self) -> &[String] {
        self.plan_info
            .as_ref()
            .map(|info| info.whitelist.as_slice())
            .unwrap_or_default()
    }
}

/// Strings kept, numbers rendered, anything else dropped.
fn text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn strings_in(value: Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.into_iter().filter_map(text).collect(),
        _ => Vec::new(),
    }
}

fn optional_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(text(Value::deserialize(deserializer)?))
}

fn text_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(optional_text(deserializer)?.unwrap_or_default())
}

fn string_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(strings_in(Value::deserialize(deserializer)?))
}

/// Decode a nested object; anything that is not an object is the default.
fn object_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        value @ Value::Object(_) => serde_json::from_value(value).map_err(D::Error::custom),
        _ => Ok(T::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "proxies": { "username": "u1", "password": "p1", "bandwidth": 5, "bandwidthLeft": "4.75" },
        "whitelist_proxies": {
            "us": ["us.gw.example.net:9000", "us.gw.example.net:9001"],
            "de": ["de.gw.example.net:9000"],
            "br": ["br.gw.example.net:9000"]
        },
        "planInfo": {
            "expiration_date": "2026-11-15T00:00:00Z",
            "time_left": "30 days",
            "whitelist": ["203.0.113.7"]
        }
    }"#;

    #[test]
    fn test_deserialize_read_plan_payload() {
        let info: ProxyInfo = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(info.proxies.username, "u1");
        assert_eq!(info.proxies.bandwidth_left, Some(Value::from("4.75")));
        assert_eq!(info.whitelist(), ["203.0.113.7".to_string()]);
        assert_eq!(
            info.whitelist_proxies.get("de").unwrap(),
            ["de.gw.example.net:9000".to_string()]
        );
    }

    #[test]
    fn test_country_order_is_preserved() {
        let info: ProxyInfo = serde_json::from_str(SAMPLE).unwrap();
        let countries: Vec<&str> = info.whitelist_proxies.countries().collect();
        assert_eq!(countries, ["us", "de", "br"]);
        assert_eq!(info.whitelist_proxies.first_country(), Some("us"));
    }

    #[test]
    fn test_sparse_payload() {
        let info: ProxyInfo = serde_json::from_str(r#"{"whitelist_proxies":{"us":"bogus"}}"#).unwrap();
        assert!(info.whitelist().is_empty());
        assert_eq!(info.whitelist_proxies.get("us"), Some(&[][..]));
        assert!(info.plan_info.is_none());
    }

    #[test]
    fn test_null_and_numeric_fields_fall_back() {
        let info: ProxyInfo = serde_json::from_str(
            r#"{
                "proxies": { "username": "u1", "password": null },
                "whitelist_proxies": null,
                "planInfo": { "whitelist": null, "time_left": 3600, "expiration_date": null }
            }"#,
        )
        .unwrap();
        assert_eq!(info.proxies.username, "u1");
        assert_eq!(info.proxies.password, "");
        assert_eq!(info.whitelist_proxies.first_country(), None);
        assert!(info.whitelist().is_empty());
        let plan_info = info.plan_info.unwrap();
        assert_eq!(plan_info.time_left.as_deref(), Some("3600"));
        assert!(plan_info.expiration_date.is_none());
    }

    #[test]
    fn test_non_object_sections_are_defaulted() {
        let info: ProxyInfo = serde_json::from_str(
            r#"{ "proxies": null, "whitelist_proxies": [], "planInfo": "n/a" }"#,
        )
        .unwrap();
        assert_eq!(info.proxies, ProxyCredentials::default());
        assert!(info.plan_info.is_none());

        let info: ProxyInfo =
            serde_json::from_str(r#"{ "planInfo": { "whitelist": ["203.0.113.7", 5, null] } }"#).unwrap();
        assert_eq!(info.whitelist(), ["203.0.113.7".to_string(), "5".to_string()]);
    }
}
