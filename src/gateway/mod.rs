//! Gateway subsystem: the dashboard-facing request translator.
//!
//! # Data Flow
//! ```text
//! /api/getplan request
//!     → request.rs (GET: planId query; POST: action dispatch + validation)
//!     → handler.rs (one or two upstream calls)
//!     → response.rs (merge plan info into proxy data for reads)
//!     → JSON reply, or GatewayError mapped to a status
//! ```
//!
//! # Design Decisions
//! - Stateless: nothing survives a request
//! - Validation runs before any upstream call
//! - Upstream error bodies pass through unchanged
//! - No deduplication; a repeated POST is a repeated upstream call

pub mod handler;
pub mod request;
pub mod response;

pub use handler::{health, plan_handler};
pub use request::{PlanCommand, PlanQuery};
pub use response::merge_plan_info;
