//! Exchange gate middleware.
//!
//! Upgrades the caller's bearer token into a requesting party token before the
//! request reaches the next service.
//!
//! # Per-request flow
//! ```text
//! no Authorization header, or OPTIONS  → next service, untouched
//! exchange → Granted(rpt)              → Authorization = "Bearer <rpt>", next service
//!          → ExpiredGrant              → 401
//!          → Denied                    → 403
//!          → Decode/EmptyToken/Invalid → 403
//!          → Transport/Read            → 500
//! ```
//! Every rejection has an empty body and echoes `Origin` into
//! `Access-Control-Allow-Origin`.

use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;

use axum::{
    body::Body,
    http::{
        header::{AUTHORIZATION, ORIGIN},
        HeaderValue, Method, Request, StatusCode,
    },
    response::Response,
};
use futures_util::future::BoxFuture;
use tower::{Layer, Service};

use crate::config::ExchangeConfig;
use crate::error::ConfigurationError;
use crate::exchange::{ExchangeOutcome, ExchangeTransport, HttpTransport, TokenExchanger};
use crate::http::request::request_id_of;
use crate::http::response::rejection;
use crate::observability::metrics;

/// Layer producing [`ExchangeGate`] services that share one exchanger.
pub struct ExchangeGateLayer<T = HttpTransport> {
    exchanger: Arc<TokenExchanger<T>>,
    name: Arc<str>,
}

impl ExchangeGateLayer<HttpTransport> {
    /// Fails if the authorization endpoint is empty. Performs no I/O.
    pub fn from_config(
        config: &ExchangeConfig,
        name: impl Into<Arc<str>>,
    ) -> Result<Self, ConfigurationError> {
        Ok(Self::new(TokenExchanger::from_config(config)?, name))
    }
}

impl<T: ExchangeTransport> ExchangeGateLayer<T> {
    pub fn new(exchanger: TokenExchanger<T>, name: impl Into<Arc<str>>) -> Self {
        Self {
            exchanger: Arc::new(exchanger),
            name: name.into(),
        }
    }
}

impl<T> Clone for ExchangeGateLayer<T> {
    fn clone(&self) -> Self {
        Self {
            exchanger: Arc::clone(&self.exchanger),
            name: Arc::clone(&self.name),
        }
    }
}

impl<S, T> Layer<S> for ExchangeGateLayer<T> {
    type Service = ExchangeGate<S, T>;

    fn layer(&self, inner: S) -> Self::Service {
        ExchangeGate {
            inner,
            exchanger: Arc::clone(&self.exchanger),
            name: Arc::clone(&self.name),
        }
    }
}

/// Middleware service gating `inner` behind a token exchange.
///
/// Holds no per-request state; clones share the exchanger.
pub struct ExchangeGate<S, T = HttpTransport> {
    inner: S,
    exchanger: Arc<TokenExchanger<T>>,
    name: Arc<str>,
}

impl<S> ExchangeGate<S, HttpTransport> {
    /// Wrap `next`, exchanging against the configured endpoint.
    pub fn new(
        next: S,
        config: &ExchangeConfig,
        name: impl Into<Arc<str>>,
    ) -> Result<Self, ConfigurationError> {
        Ok(ExchangeGateLayer::from_config(config, name)?.layer(next))
    }
}

impl<S, T> ExchangeGate<S, T> {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<S: Clone, T> Clone for ExchangeGate<S, T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            exchanger: Arc::clone(&self.exchanger),
            name: Arc::clone(&self.name),
        }
    }
}

/// The credential to exchange, or the reason the request bypasses the gate.
fn admission(request: &Request<Body>) -> Result<HeaderValue, &'static str> {
    if request.method() == Method::OPTIONS {
        return Err("preflight");
    }
    match request.headers().get(AUTHORIZATION) {
        Some(value) if !value.is_empty() => Ok(value.clone()),
        _ => Err("no_credential"),
    }
}

impl<S, T> Service<Request<Body>> for ExchangeGate<S, T>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
    T: ExchangeTransport,
{
    type Response = Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Response, S::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<Body>) -> Self::Future {
        // Use the service that was driven to readiness.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let exchanger = Arc::clone(&self.exchanger);
        let name = Arc::clone(&self.name);

        Box::pin(async move {
            let credential = match admission(&request) {
                Ok(credential) => credential,
                Err(reason) => {
                    tracing::debug!(
                        gate = %name,
                        request_id = %request_id_of(&request),
                        reason,
                        "Skipping token exchange"
                    );
                    metrics::record_bypass(reason);
                    return inner.call(request).await;
                }
            };

            let request_id = request_id_of(&request).to_owned();
            let origin = request
                .headers()
                .get(ORIGIN)
                .cloned()
                .unwrap_or_else(|| HeaderValue::from_static(""));
            let start = Instant::now();

            let status = match exchanger.exchange(&credential).await {
                Ok(ExchangeOutcome::Granted(authorization)) => {
                    metrics::record_exchange("granted", start);
                    request.headers_mut().insert(AUTHORIZATION, authorization);
                    return inner.call(request).await;
                }
                Ok(ExchangeOutcome::ExpiredGrant) => {
                    tracing::warn!(
                        gate = %name,
                        request_id = %request_id,
                        "Invalid grant, credential expired"
                    );
                    metrics::record_exchange("expired_grant", start);
                    StatusCode::UNAUTHORIZED
                }
                Ok(ExchangeOutcome::Denied { code, description }) => {
                    tracing::warn!(
                        gate = %name,
                        request_id = %request_id,
                        code = %code,
                        description = %description,
                        "Token exchange refused"
                    );
                    metrics::record_exchange("denied", start);
                    StatusCode::FORBIDDEN
                }
                Err(e) => {
                    let status = e.status();
                    if status.is_server_error() {
                        tracing::error!(
                            gate = %name,
                            request_id = %request_id,
                            error = %e,
                            "Token exchange failed"
                        );
                    } else {
                        tracing::warn!(
                            gate = %name,
                            request_id = %request_id,
                            error = %e,
                            "Token exchange failed"
                        );
                    }
                    metrics::record_exchange(e.kind(), start);
                    status
                }
            };

            Ok(rejection(status, origin))
        })
    }
}
