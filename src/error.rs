//! Errors raised while assembling the gateway.

use axum::http::uri::InvalidUri;
use thiserror::Error;

/// A handler could not be installed from the supplied configuration.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("authorization endpoint cannot be empty")]
    EmptyEndpoint,

    #[error("could not build token endpoint client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("invalid upstream address {address:?}: {source}")]
    InvalidUpstream {
        address: String,
        #[source]
        source: InvalidUri,
    },
}
