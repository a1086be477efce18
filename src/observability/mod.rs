//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! gateway handler, upstream client
//!     → logging.rs (structured log events, request id in the trace span)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (log aggregation by the platform)
//!     → Metrics endpoint (Prometheus scrape), optional
//! ```
//!
//! # Design Decisions
//! - The API key never appears in a log field
//! - Request ID flows from the inbound request into every event of its span
//! - Metrics are no-ops unless the exporter is installed

pub mod logging;
pub mod metrics;
