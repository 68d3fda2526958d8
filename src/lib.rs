//! Requesting party token gateway.
//!
//! Sits in front of a protected backend and upgrades each inbound bearer
//! token into a requesting party token (RPT) issued by an authorization
//! server before forwarding the request.

pub mod config;
pub mod error;
pub mod exchange;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::schema::GatewayConfig;
pub use error::ConfigurationError;
pub use exchange::{ExchangeError, ExchangeOutcome, TokenExchanger};
pub use http::{ExchangeGate, ExchangeGateLayer, HttpServer};
pub use lifecycle::Shutdown;
