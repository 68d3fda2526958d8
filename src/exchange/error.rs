//! Failures of a single token exchange.

use axum::http::{header::InvalidHeaderValue, StatusCode};
use thiserror::Error;
use tower::BoxError;

/// Why an exchange did not produce an outcome.
///
/// Authorization server verdicts (`invalid_grant`, any other error code) are
/// not errors here; they are [`ExchangeOutcome`](super::ExchangeOutcome)s.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// The request could not be built or executed (refused, DNS, bad URL, timeout).
    #[error("could not execute exchange request: {0}")]
    Transport(#[source] BoxError),

    #[error("could not read exchange response body: {0}")]
    Read(#[source] BoxError),

    #[error("exchange response is malformed: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("exchange response carried neither an error nor an access token")]
    EmptyToken,

    #[error("access token cannot be sent as a header value")]
    InvalidToken(#[from] InvalidHeaderValue),
}

impl ExchangeError {
    /// Status returned to the original caller.
    pub fn status(&self) -> StatusCode {
        match self {
            ExchangeError::Transport(_) | ExchangeError::Read(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ExchangeError::Decode(_)
            | ExchangeError::EmptyToken
            | ExchangeError::InvalidToken(_) => StatusCode::FORBIDDEN,
        }
    }

    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ExchangeError::Transport(_) => "transport",
            ExchangeError::Read(_) => "read",
            ExchangeError::Decode(_) => "decode",
            ExchangeError::EmptyToken => "empty_token",
            ExchangeError::InvalidToken(_) => "invalid_token",
        }
    }
}
