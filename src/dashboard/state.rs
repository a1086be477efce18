//! In-memory dashboard session.
//!
//! Holds the single active plan and the last fetched proxy data. Nothing is
//! persisted; dropping the session forgets the plan. Actions take `&mut self`,
//! so one session never has two calls in flight.

use serde_json::Value;

use crate::dashboard::catalog;
use crate::dashboard::client::{ClientError, ClientResult, GatewayClient};
use crate::dashboard::format::{format_proxy, format_whitelisted, ProxyOptions};
use crate::dashboard::types::{Plan, ProxyInfo};
use crate::upstream::WhitelistAction;

/// Top-level page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Dashboard,
    PurchasePlan,
}

/// Which proxy list the user is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    /// Username/password connection strings.
    #[default]
    Auth,
    /// IP-whitelisted endpoints and whitelist management.
    Whitelist,
}

/// Transient notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

pub struct Dashboard {
    client: GatewayClient,
    page: Page,
    active_plan: Option<Plan>,
    proxy_info: Option<ProxyInfo>,
    selected_country: Option<String>,
    view: View,
    revealed: bool,
    error: Option<String>,
    notices: Vec<Notice>,
}

impl Dashboard {
    pub fn new(client: GatewayClient) -> Self {
        Self {
            client,
            page: Page::Dashboard,
            active_plan: None,
            proxy_info: None,
            selected_country: None,
            view: View::default(),
            revealed: false,
            error: None,
            notices: Vec::new(),
        }
    }

    /// Start a session on an existing plan.
    pub fn with_plan(client: GatewayClient, plan: Plan) -> Self {
        let mut dashboard = Self::new(client);
        dashboard.active_plan = Some(plan);
        dashboard
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn set_page(&mut self, page: Page) {
        self.page = page;
    }

    pub fn active_plan(&self) -> Option<&Plan> {
        self.active_plan.as_ref()
    }

    pub fn proxy_info(&self) -> Option<&ProxyInfo> {
        self.proxy_info.as_ref()
    }

    pub fn selected_country(&self) -> Option<&str> {
        self.selected_country.as_deref()
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn set_view(&mut self, view: View) {
        self.view = view;
    }

    pub fn revealed(&self) -> bool {
        self.revealed
    }

    pub fn toggle_revealed(&mut self) -> bool {
        self.revealed = !self.revealed;
        self.revealed
    }

    /// Inline error from the last failed action, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Take pending notifications, oldest first.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Buy one of the catalog plans and make it the active one.
    ///
    /// Bandwidths not in [`catalog::PLAN_CATALOG`] are refused before any call.
    pub async fn purchase(&mut self, bandwidth_gb: u64) -> ClientResult<&Plan> {
        self.error = None;

        if catalog::offer(bandwidth_gb).is_none() {
            let e = ClientError::InvalidInput(format!("No {}GB plan is offered.", bandwidth_gb));
            self.fail("Failed to purchase plan", &e);
            return Err(e);
        }

        let result = self
            .client
            .purchase(bandwidth_gb)
            .await
            .and_then(|body| plan_id_from(&body).ok_or(ClientError::MissingPlanId));

        match result {
            Ok(plan_id) => {
                tracing::info!(plan_id = %plan_id, bandwidth_gb, "Plan purchased");
                self.proxy_info = None;
                self.selected_country = None;
                self.page = Page::Dashboard;
                self.notify(Notice::Success("Plan purchased successfully!".into()));
                Ok(self.active_plan.insert(Plan {
                    plan_id,
                    bandwidth_gb: Some(bandwidth_gb),
                }))
            }
            Err(e) => {
                self.fail("Failed to purchase plan", &e);
                Err(e)
            }
        }
    }

    /// Fetch proxy data for the active plan and select its first country.
    pub async fn generate_proxy(&mut self) -> ClientResult<&ProxyInfo> {
        let plan_id = self.require_plan()?;

        let result = match self.client.read_plan(&plan_id).await {
            Ok(body) => serde_json::from_value::<ProxyInfo>(body).map_err(ClientError::from),
            Err(e) => Err(e),
        };

        match result {
            Ok(info) => {
                self.selected_country = info.whitelist_proxies.first_country().map(str::to_string);
                self.error = None;
                self.notify(Notice::Success("Proxies generated successfully!".into()));
                Ok(self.proxy_info.insert(info))
            }
            Err(e) => {
                self.fail("Failed to generate proxies", &e);
                Err(e)
            }
        }
    }

    /// Add the fixed bandwidth increment, then refresh.
    pub async fn add_bandwidth(&mut self) -> ClientResult<&ProxyInfo> {
        let plan_id = self.require_plan()?;
        if let Err(e) = self.client.modify_bandwidth(&plan_id).await {
            self.fail("Failed to add bandwidth", &e);
            return Err(e);
        }
        self.notify(Notice::Success("Bandwidth added successfully!".into()));
        self.generate_proxy().await
    }

    /// Whitelist a typed-in address, then refresh.
    pub async fn add_whitelist_ip(&mut self, ip_address: &str) -> ClientResult<&ProxyInfo> {
        self.update_whitelist(ip_address, WhitelistAction::Add).await
    }

    /// Remove a listed address, then refresh.
    pub async fn remove_whitelist_ip(&mut self, ip_address: &str) -> ClientResult<&ProxyInfo> {
        self.update_whitelist(ip_address, WhitelistAction::Remove).await
    }

    async fn update_whitelist(
        &mut self,
        ip_address: &str,
        action: WhitelistAction,
    ) -> ClientResult<&ProxyInfo> {
        let plan_id = self.require_plan()?;
        let ip_address = ip_address.trim();
        if ip_address.is_empty() {
            let e = ClientError::InvalidInput("Enter an IP address.".into());
            self.fail("Failed to update whitelist", &e);
            return Err(e);
        }

        if let Err(e) = self.client.manage_whitelist(&plan_id, ip_address, action).await {
            self.fail("Failed to update whitelist", &e);
            return Err(e);
        }

        let done = match action {
            WhitelistAction::Add => "IP added to whitelist",
            WhitelistAction::Remove => "IP removed from whitelist",
        };
        self.notify(Notice::Success(done.into()));
        self.generate_proxy().await
    }

    /// Select a country present in the fetched data.
    pub fn select_country(&mut self, country: &str) -> bool {
        let known = self
            .proxy_info
            .as_ref()
            .is_some_and(|info| info.whitelist_proxies.get(country).is_some());
        if known {
            self.selected_country = Some(country.to_string());
        }
        known
    }

    /// Connection strings for the selected country under the current view.
    pub fn proxy_lines(&self, options: &ProxyOptions) -> Vec<String> {
        let (Some(info), Some(country)) = (self.proxy_info.as_ref(), self.selected_country.as_deref())
        else {
            return Vec::new();
        };
        let endpoints = info.whitelist_proxies.get(country).unwrap_or_default();

        endpoints
            .iter()
            .map(|endpoint| match self.view {
                View::Auth => format_proxy(
                    endpoint,
                    &info.proxies.username,
                    &info.proxies.password,
                    options,
                ),
                View::Whitelist => format_whitelisted(endpoint, options.scheme.as_deref()),
            })
            .collect()
    }

    fn require_plan(&mut self) -> ClientResult<String> {
        match &self.active_plan {
            Some(plan) => Ok(plan.plan_id.clone()),
            None => {
                let e = ClientError::NoActivePlan;
                self.error = Some(e.display_message());
                Err(e)
            }
        }
    }

    fn fail(&mut self, context: &str, e: &ClientError) {
        tracing::warn!(error = %e, "{}", context);
        let message = e.display_message();
        self.error = Some(message.clone());
        self.notify(Notice::Error(format!("{}: {}", context, message)));
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}

/// Plan ID from a purchase reply; the upstream names it `PlanID`.
fn plan_id_from(body: &Value) -> Option<String> {
    match body.get("PlanID")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::format::{ProxyFormat, SessionMode};

    fn session_with(info_json: &str) -> Dashboard {
        let mut dashboard = Dashboard::with_plan(
            GatewayClient::new("http://127.0.0.1:9"),
            Plan {
                plan_id: "p1".into(),
                bandwidth_gb: Some(5),
            },
        );
        let info: ProxyInfo = serde_json::from_str(info_json).unwrap();
        dashboard.selected_country = info.whitelist_proxies.first_country().map(str::to_string);
        dashboard.proxy_info = Some(info);
        dashboard
    }

    const INFO: &str = r#"{
        "proxies": { "username": "u1", "password": "p1" },
        "whitelist_proxies": { "us": ["us.gw:9000", "us.gw:9001"], "de": ["de.gw:9000"] }
    }"#;

    #[test]
    fn test_plan_id_from_purchase_reply() {
        assert_eq!(plan_id_from(&serde_json::json!({ "PlanID": "abc" })), Some("abc".into()));
        assert_eq!(plan_id_from(&serde_json::json!({ "PlanID": 77 })), Some("77".into()));
        assert_eq!(plan_id_from(&serde_json::json!({ "PlanID": "" })), None);
        assert_eq!(plan_id_from(&serde_json::json!({ "planId": "abc" })), None);
    }

    #[test]
    fn test_auth_view_lines() {
        let dashboard = session_with(INFO);
        assert_eq!(dashboard.selected_country(), Some("us"));
        assert_eq!(
            dashboard.proxy_lines(&ProxyOptions::default()),
            ["us.gw:9000:u1:p1", "us.gw:9001:u1:p1"]
        );
    }

    #[test]
    fn test_whitelist_view_lines() {
        let mut dashboard = session_with(INFO);
        dashboard.set_view(View::Whitelist);
        assert!(dashboard.select_country("de"));
        let options = ProxyOptions {
            format: ProxyFormat::UserPassAtHostPort,
            scheme: Some("http".into()),
            session: SessionMode::Rotating,
        };
        assert_eq!(dashboard.proxy_lines(&options), ["http://de.gw:9000"]);
    }

    #[test]
    fn test_select_unknown_country_keeps_selection() {
        let mut dashboard = session_with(INFO);
        assert!(!dashboard.select_country("fr"));
        assert_eq!(dashboard.selected_country(), Some("us"));
    }

    #[test]
    fn test_toggle_revealed() {
        let mut dashboard = session_with(INFO);
        assert!(!dashboard.revealed());
        assert!(dashboard.toggle_revealed());
        assert!(!dashboard.toggle_revealed());
    }

    #[tokio::test]
    async fn test_actions_need_active_plan() {
        let mut dashboard = Dashboard::new(GatewayClient::new("http://127.0.0.1:9"));
        assert!(matches!(
            dashboard.generate_proxy().await,
            Err(ClientError::NoActivePlan)
        ));
        assert!(matches!(
            dashboard.add_whitelist_ip("203.0.113.7").await,
            Err(ClientError::NoActivePlan)
        ));
        assert_eq!(dashboard.error(), Some("Purchase a plan to get started"));
        assert!(dashboard.proxy_lines(&ProxyOptions::default()).is_empty());
    }

    #[tokio::test]
    async fn test_purchase_outside_catalog_is_refused() {
        let mut dashboard = Dashboard::new(GatewayClient::new("http://127.0.0.1:9"));
        dashboard.set_page(Page::PurchasePlan);

        // An unreachable gateway would yield `Http`; `InvalidInput` means no call was made.
        assert!(matches!(
            dashboard.purchase(7).await,
            Err(ClientError::InvalidInput(_))
        ));
        assert_eq!(dashboard.error(), Some("No 7GB plan is offered."));
        assert_eq!(dashboard.page(), Page::PurchasePlan);
        assert!(dashboard.active_plan().is_none());
        assert_eq!(
            dashboard.drain_notices(),
            [Notice::Error("Failed to purchase plan: No 7GB plan is offered.".into())]
        );
    }

    #[tokio::test]
    async fn test_blank_ip_is_rejected_locally() {
        let mut dashboard = session_with(INFO);
        assert!(matches!(
            dashboard.add_whitelist_ip("   ").await,
            Err(ClientError::InvalidInput(_))
        ));
        assert_eq!(dashboard.error(), Some("Enter an IP address."));
    }
}
