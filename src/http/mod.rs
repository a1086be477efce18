//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (assign request ID, open trace span)
//!     → gateway handler (validate, forward, compose)
//!     → Send to client with x-request-id echoed
//! ```

pub mod request;
pub mod server;
pub mod tls;

pub use request::{MakeRequestUuidV4, X_REQUEST_ID};
pub use server::{AppState, HttpServer, PLAN_ROUTE};
