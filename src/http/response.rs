//! Responses the gateway writes itself.

use axum::{
    body::Body,
    http::{header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue, StatusCode},
    response::Response,
};

/// Empty-bodied rejection echoing the caller's `Origin`.
///
/// The origin is copied verbatim, including when it is empty.
pub fn rejection(status: StatusCode, origin: HeaderValue) -> Response {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    response
}
