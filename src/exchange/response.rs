//! Decoding the token endpoint reply.

use axum::http::HeaderValue;
use serde::{Deserialize, Deserializer};

use super::error::ExchangeError;

/// Error code meaning the caller's credential is no longer accepted.
pub const INVALID_GRANT: &str = "invalid_grant";

/// Body of the authorization server's reply.
///
/// Only `access_token` and `error` drive behavior; the rest is kept for logs.
/// Absent fields and JSON `null` both decode to the field's default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExchangeResponse {
    #[serde(deserialize_with = "null_as_default")]
    pub upgraded: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub access_token: String,
    #[serde(deserialize_with = "null_as_default")]
    pub expires_in: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub refresh_expires_in: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub refresh_token: String,
    #[serde(deserialize_with = "null_as_default")]
    pub token_type: String,
    #[serde(rename = "not-before-policy", deserialize_with = "null_as_default")]
    pub not_before_policy: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub error: String,
    #[serde(deserialize_with = "null_as_default")]
    pub error_description: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// What the authorization server decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeOutcome {
    /// Exchange succeeded; holds the ready `Authorization` value (`Bearer <rpt>`).
    Granted(HeaderValue),
    /// The original credential has expired or was revoked.
    ExpiredGrant,
    /// Any other error code.
    Denied { code: String, description: String },
}

impl ExchangeResponse {
    /// Classify the reply.
    pub fn into_outcome(self) -> Result<ExchangeOutcome, ExchangeError> {
        if !self.error.is_empty() {
            if self.error.trim_matches(' ') == INVALID_GRANT {
                return Ok(ExchangeOutcome::ExpiredGrant);
            }
            return Ok(ExchangeOutcome::Denied {
                code: self.error,
                description: self.error_description,
            });
        }

        if self.access_token.is_empty() {
            return Err(ExchangeError::EmptyToken);
        }

        let mut authorization = HeaderValue::from_str(&format!("Bearer {}", self.access_token))?;
        authorization.set_sensitive(true);
        Ok(ExchangeOutcome::Granted(authorization))
    }
}

/// Decode a raw reply body into an outcome.
pub fn decode(body: &[u8]) -> Result<ExchangeOutcome, ExchangeError> {
    let response: ExchangeResponse = serde_json::from_slice(body)?;
    response.into_outcome()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keycloak_success_body() {
        let body = br#"{
            "upgraded": false,
            "access_token": "eyJhbGciOi.rpt",
            "expires_in": 300,
            "refresh_expires_in": 1800,
            "refresh_token": "eyJhbGciOi.refresh",
            "token_type": "Bearer",
            "not-before-policy": 0
        }"#;

        match decode(body).unwrap() {
            ExchangeOutcome::Granted(value) => {
                assert_eq!(value, "Bearer eyJhbGciOi.rpt");
                assert!(value.is_sensitive());
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_full_response_fields() {
        let response: ExchangeResponse = serde_json::from_str(
            r#"{"upgraded":true,"access_token":"a","expires_in":60,"refresh_expires_in":0,
                "refresh_token":null,"token_type":"Bearer","not-before-policy":17,"error":""}"#,
        )
        .unwrap();

        assert!(response.upgraded);
        assert_eq!(response.expires_in, 60);
        assert_eq!(response.not_before_policy, 17);
        assert_eq!(response.refresh_token, "");
    }

    #[test]
    fn test_invalid_grant_tolerates_surrounding_spaces() {
        assert_eq!(
            decode(br#"{"error":"invalid_grant"}"#).unwrap(),
            ExchangeOutcome::ExpiredGrant
        );
        assert_eq!(
            decode(br#"{"error":"  invalid_grant "}"#).unwrap(),
            ExchangeOutcome::ExpiredGrant
        );
    }

    #[test]
    fn test_other_error_is_denied_even_with_token() {
        let outcome = decode(
            br#"{"error":"access_denied","error_description":"not_authorized","access_token":"x"}"#,
        )
        .unwrap();
        assert_eq!(
            outcome,
            ExchangeOutcome::Denied {
                code: "access_denied".into(),
                description: "not_authorized".into(),
            }
        );
    }

    #[test]
    fn test_whitespace_error_is_denied() {
        assert!(matches!(
            decode(br#"{"error":" "}"#).unwrap(),
            ExchangeOutcome::Denied { .. }
        ));
    }

    #[test]
    fn test_missing_token_and_error_is_rejected() {
        assert!(matches!(decode(b"{}"), Err(ExchangeError::EmptyToken)));
        assert!(matches!(
            decode(br#"{"access_token":"","error":""}"#),
            Err(ExchangeError::EmptyToken)
        ));
    }

    #[test]
    fn test_malformed_bodies_fail_to_decode() {
        assert!(matches!(decode(b"<html>bad gateway</html>"), Err(ExchangeError::Decode(_))));
        assert!(matches!(decode(b""), Err(ExchangeError::Decode(_))));
        assert!(matches!(
            decode(br#"{"access_token":"a","expires_in":"soon"}"#),
            Err(ExchangeError::Decode(_))
        ));
    }

    #[test]
    fn test_token_with_control_characters_is_rejected() {
        assert!(matches!(
            decode(br#"{"access_token":"abc\ndef"}"#),
            Err(ExchangeError::InvalidToken(_))
        ));
    }
}
