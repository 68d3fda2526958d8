//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, layers)
//!     → request.rs (assign x-request-id)
//!     → middleware/exchange_gate.rs (bypass, or exchange then forward / reject)
//!     → server.rs proxy_handler (forward to upstream)
//!     → response.rs (rejections written by the gate)
//! ```

pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use middleware::{ExchangeGate, ExchangeGateLayer};
pub use request::X_REQUEST_ID;
pub use server::HttpServer;
