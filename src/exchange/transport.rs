//! Outbound call to the token endpoint.

use std::future::Future;
use std::time::Duration;

use axum::body::Bytes;
use axum::http::{
    header::{AUTHORIZATION, CONTENT_TYPE},
    HeaderValue,
};

use super::error::ExchangeError;
use crate::error::ConfigurationError;

/// Media type of the exchange request body.
pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Something that can POST an exchange form and hand back the raw reply body.
///
/// Implementations must be safe to call from many requests at once.
pub trait ExchangeTransport: Send + Sync + 'static {
    /// Send `form` with `credential` as the `Authorization` header.
    fn post_form(
        &self,
        credential: HeaderValue,
        form: String,
    ) -> impl Future<Output = Result<Bytes, ExchangeError>> + Send;
}

/// reqwest-backed transport bound to one token endpoint.
///
/// The client's connection pool is shared by every request through the
/// owning gate.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    /// Build a transport. No connection is made here.
    pub fn new(
        endpoint: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, ConfigurationError> {
        let endpoint = endpoint.into();
        if endpoint.is_empty() {
            return Err(ConfigurationError::EmptyEndpoint);
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint,
        })
    }

    /// Token endpoint every exchange is posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ExchangeTransport for HttpTransport {
    async fn post_form(
        &self,
        credential: HeaderValue,
        form: String,
    ) -> Result<Bytes, ExchangeError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(AUTHORIZATION, credential)
            .header(CONTENT_TYPE, FORM_URLENCODED)
            .body(form)
            .send()
            .await
            .map_err(|e| ExchangeError::Transport(e.into()))?;

        tracing::trace!(status = %response.status(), "Token endpoint replied");

        response
            .bytes()
            .await
            .map_err(|e| ExchangeError::Read(e.into()))
    }
}
