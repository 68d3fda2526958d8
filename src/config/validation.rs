//! Configuration validation.
//!
//! Serde handles syntax; this pass checks values the gateway cannot start
//! with. Every problem is reported, not just the first.

use std::fmt;
use std::net::SocketAddr;

use axum::http::uri::Authority;

use crate::config::schema::GatewayConfig;

/// A single semantic problem in a loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyAuthorizationEndpoint,
    InvalidBindAddress(String),
    InvalidUpstreamAddress(String),
    ZeroRequestTimeout,
    ZeroExchangeTimeout,
    ExchangeTimeoutNotBelowRequest { exchange_secs: u64, request_secs: u64 },
    InvalidMetricsAddress(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyAuthorizationEndpoint => {
                write!(f, "exchange.authorization_endpoint cannot be empty")
            }
            ValidationError::InvalidBindAddress(addr) => {
                write!(f, "listener.bind_address {:?} is not a socket address", addr)
            }
            ValidationError::InvalidUpstreamAddress(addr) => {
                write!(f, "upstream.address {:?} is not a host:port authority", addr)
            }
            ValidationError::ZeroRequestTimeout => {
                write!(f, "timeouts.request_secs must be greater than zero")
            }
            ValidationError::ZeroExchangeTimeout => {
                write!(f, "exchange.timeout_secs must be greater than zero")
            }
            ValidationError::ExchangeTimeoutNotBelowRequest {
                exchange_secs,
                request_secs,
            } => write!(
                f,
                "exchange.timeout_secs ({}) must be below timeouts.request_secs ({})",
                exchange_secs, request_secs
            ),
            ValidationError::InvalidMetricsAddress(addr) => {
                write!(f, "observability.metrics_address {:?} is not a socket address", addr)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Check a parsed configuration, collecting every error.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.exchange.authorization_endpoint.is_empty() {
        errors.push(ValidationError::EmptyAuthorizationEndpoint);
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.upstream.address.is_empty() || config.upstream.address.parse::<Authority>().is_err() {
        errors.push(ValidationError::InvalidUpstreamAddress(
            config.upstream.address.clone(),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    // A failed exchange must answer before the request deadline does; the
    // deadline's 408 carries no Access-Control-Allow-Origin.
    if config.exchange.timeout_secs == 0 {
        errors.push(ValidationError::ZeroExchangeTimeout);
    } else if config.timeouts.request_secs > 0
        && config.exchange.timeout_secs >= config.timeouts.request_secs
    {
        errors.push(ValidationError::ExchangeTimeoutNotBelowRequest {
            exchange_secs: config.exchange.timeout_secs,
            request_secs: config.timeouts.request_secs,
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> GatewayConfig {
        let mut config = GatewayConfig::default();
        config.exchange.authorization_endpoint = "http://idp.local/token".into();
        config
    }

    #[test]
    fn test_valid_config_passes() {
        assert_eq!(validate_config(&valid()), Ok(()));
    }

    #[test]
    fn test_reports_every_error() {
        let mut config = GatewayConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.upstream.address = String::new();
        config.timeouts.request_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::EmptyAuthorizationEndpoint,
                ValidationError::InvalidBindAddress("not-an-address".into()),
                ValidationError::InvalidUpstreamAddress(String::new()),
                ValidationError::ZeroRequestTimeout,
            ]
        );
    }

    #[test]
    fn test_exchange_timeout_must_be_set() {
        let mut config = valid();
        config.exchange.timeout_secs = 0;
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::ZeroExchangeTimeout])
        );
    }

    #[test]
    fn test_exchange_timeout_must_end_before_request_timeout() {
        let mut config = valid();
        config.exchange.timeout_secs = 60;
        config.timeouts.request_secs = 60;
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::ExchangeTimeoutNotBelowRequest {
                exchange_secs: 60,
                request_secs: 60,
            }])
        );

        config.exchange.timeout_secs = 59;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = valid();
        config.observability.metrics_address = "nope".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::InvalidMetricsAddress("nope".into())])
        );
    }
}
