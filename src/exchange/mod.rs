//! Token exchange subsystem.
//!
//! # Data Flow
//! ```text
//! inbound Authorization header
//!     → TokenExchanger::exchange (form body: audience + UMA ticket grant)
//!     → transport.rs (POST to the token endpoint, read body)
//!     → response.rs (decode JSON, classify)
//!     → ExchangeOutcome { Granted | ExpiredGrant | Denied } or ExchangeError
//! ```
//!
//! # Design Decisions
//! - No caching, refreshing or retrying; every call is independent
//! - The reply's HTTP status is ignored, only the body decides
//! - Transport is a trait so the gate can run against a scripted endpoint

pub mod error;
pub mod response;
pub mod transport;

use axum::http::HeaderValue;
use url::form_urlencoded;

use crate::config::ExchangeConfig;
use crate::error::ConfigurationError;

pub use error::ExchangeError;
pub use response::{decode, ExchangeOutcome, ExchangeResponse, INVALID_GRANT};
pub use transport::{ExchangeTransport, HttpTransport, FORM_URLENCODED};

/// Grant type asking the server for a requesting party token.
pub const UMA_TICKET_GRANT: &str = "urn:ietf:params:oauth:grant-type:uma-ticket";

/// Upgrades a caller's bearer credential into a requesting party token.
#[derive(Debug, Clone)]
pub struct TokenExchanger<T = HttpTransport> {
    transport: T,
    audience: String,
}

impl TokenExchanger<HttpTransport> {
    /// Build an exchanger talking to the configured token endpoint.
    pub fn from_config(config: &ExchangeConfig) -> Result<Self, ConfigurationError> {
        let transport =
            HttpTransport::new(config.authorization_endpoint.clone(), config.timeout())?;
        Ok(Self::new(transport, config.audience.clone()))
    }
}

impl<T: ExchangeTransport> TokenExchanger<T> {
    pub fn new(transport: T, audience: impl Into<String>) -> Self {
        Self {
            transport,
            audience: audience.into(),
        }
    }

    /// Audience every exchange is scoped to.
    pub fn audience(&self) -> &str {
        &self.audience
    }

    /// Form-encoded exchange body.
    pub fn form_body(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .append_pair("audience", &self.audience)
            .append_pair("grant_type", UMA_TICKET_GRANT)
            .finish()
    }

    /// Run one exchange for `credential`, forwarded verbatim.
    pub async fn exchange(
        &self,
        credential: &HeaderValue,
    ) -> Result<ExchangeOutcome, ExchangeError> {
        let body = self
            .transport
            .post_form(credential.clone(), self.form_body())
            .await?;
        decode(&body)
    }
}
