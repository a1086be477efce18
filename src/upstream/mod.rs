//! Upstream reseller API subsystem.
//!
//! # Data Flow
//! ```text
//! gateway handler
//!     → client.rs (attach API key, send, classify reply)
//!     → endpoints.rs (product-family scoped paths)
//!     → reseller HTTP API
//! ```
//!
//! # Design Decisions
//! - One attempt per call; failures surface immediately
//! - Upstream bodies are never reshaped here, only classified
//! - The client is immutable and shared by Arc across requests

pub mod client;
pub mod endpoints;

pub use client::{ClientSetupError, ResellerClient, UpstreamReply};
pub use endpoints::{Endpoint, WhitelistAction};
