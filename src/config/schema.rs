//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive `Deserialize` so they can be read from config files.

use serde::Deserialize;
use std::time::Duration;

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Instance name, attached to every log line the gate emits.
    pub name: String,

    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Token exchange settings.
    pub exchange: ExchangeConfig,

    /// The protected backend requests are forwarded to.
    pub upstream: UpstreamConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            name: "rpt-gateway".to_string(),
            listener: ListenerConfig::default(),
            exchange: ExchangeConfig::default(),
            upstream: UpstreamConfig::default(),
            timeouts: TimeoutConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Token exchange configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExchangeConfig {
    /// Token endpoint of the authorization server. Required.
    pub authorization_endpoint: String,

    /// Resource the requested token is scoped to. Sent even when empty.
    pub audience: String,

    /// Upper bound on a single exchange call in seconds. Must be non-zero and
    /// below `timeouts.request_secs`; 0 would leave only the transport default.
    pub timeout_secs: u64,
}

impl ExchangeConfig {
    /// Bound applied to the exchange call, if any.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            authorization_endpoint: String::new(),
            audience: String::new(),
            timeout_secs: 30,
        }
    }
}

/// Upstream backend configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Backend address (e.g., "127.0.0.1:3000").
    pub address: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:3000".to_string(),
        }
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for exchange, forwarding and response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 60 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
