//! Dashboard Client subsystem.
//!
//! # Data Flow
//! ```text
//! user action
//!     → state.rs (Dashboard session: active plan, fetched proxy data, UI flags)
//!     → client.rs (GatewayClient → /api/getplan)
//!     → types.rs (ProxyInfo decoded in upstream order)
//!     → format.rs (connection strings, session tokens; no network)
//! ```
//!
//! # Design Decisions
//! - State lives only as long as the session value
//! - Every mutation re-fetches plan data instead of patching it locally
//! - Error kinds collapse to one display message for the user

pub mod catalog;
pub mod client;
pub mod format;
pub mod state;
pub mod types;

pub use catalog::{PlanOffer, PLAN_CATALOG, PLAN_FEATURES};
pub use client::{ClientError, ClientResult, GatewayClient};
pub use format::{ProxyFormat, ProxyOptions, SessionMode, SessionUnit};
pub use state::{Dashboard, Notice, Page, View};
pub use types::{CountryProxies, Plan, PlanInfo, ProxyCredentials, ProxyInfo};
