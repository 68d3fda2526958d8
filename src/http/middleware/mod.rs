//! Middleware applied in front of the upstream handler.

pub mod exchange_gate;

pub use exchange_gate::{ExchangeGate, ExchangeGateLayer};
