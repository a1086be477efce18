//! Reseller API endpoint paths.
//!
//! All plan-scoped paths carry the product family as their second segment.
//! Caller-supplied segments are percent-encoded by `url`.

use url::Url;

/// Whether a whitelist call adds or removes an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhitelistAction {
    Add,
    Remove,
}

impl WhitelistAction {
    /// Decode the wire value. Only the literal `"add"` selects [`WhitelistAction::Add`].
    pub fn from_wire(value: Option<&str>) -> Self {
        match value {
            Some("add") => WhitelistAction::Add,
            _ => WhitelistAction::Remove,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WhitelistAction::Add => "add",
            WhitelistAction::Remove => "remove",
        }
    }
}

/// One upstream call target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint<'a> {
    /// Proxy credentials and per-country proxy lists.
    ReadPlan { plan_id: &'a str },
    /// Expiration, time left and whitelist.
    PlanInfo { plan_id: &'a str },
    CreatePlan,
    AddBandwidth { plan_id: &'a str, gb: u32 },
    Whitelist { plan_id: &'a str, action: WhitelistAction },
}

impl Endpoint<'_> {
    /// Stable label used in logs and metrics.
    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::ReadPlan { .. } => "read_plan",
            Endpoint::PlanInfo { .. } => "plan_info",
            Endpoint::CreatePlan => "create_plan",
            Endpoint::AddBandwidth { .. } => "add_bandwidth",
            Endpoint::Whitelist { action: WhitelistAction::Add, .. } => "whitelist_add",
            Endpoint::Whitelist { action: WhitelistAction::Remove, .. } => "whitelist_remove",
        }
    }

    fn segments(&self, product_family: &str) -> Vec<String> {
        let pf = product_family.to_string();
        match *self {
            Endpoint::ReadPlan { plan_id } => vec!["plan".into(), pf, "read".into(), plan_id.into()],
            Endpoint::PlanInfo { plan_id } => vec!["plan".into(), pf, "info".into(), plan_id.into()],
            Endpoint::CreatePlan => vec!["getplan".into(), pf],
            Endpoint::AddBandwidth { plan_id, gb } => vec![
                "plan".into(),
                pf,
                "add-bandwidth".into(),
                plan_id.into(),
                gb.to_string(),
            ],
            Endpoint::Whitelist { plan_id, action } => vec![
                "plan".into(),
                pf,
                "whitelist".into(),
                action.as_str().into(),
                plan_id.into(),
            ],
        }
    }

    /// Absolute URL of this endpoint under `base`.
    pub fn url(&self, base: &Url, product_family: &str) -> Url {
        let mut url = base.clone();
        // Bases that cannot carry a path are rejected by config validation.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            path.extend(self.segments(product_family));
        }
        url
    }
}
