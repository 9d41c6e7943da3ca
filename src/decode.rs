//! Gerrit response envelope decoding.
//!
//! Gerrit prefixes every JSON body with `)]}'` and a newline to defeat
//! cross-site script inclusion. The prefix must be stripped before the body
//! can be parsed.

use serde_json::Value;

use crate::error::{GerritError, Result};
use crate::transport::Body;

/// Prefix that comes with every Gerrit JSON response.
pub const MAGIC_PREFIX: &str = ")]}'\n";

/// Outcome of decoding one response.
///
/// Decoding never fails outright; instead the result says what kind of
/// content came back so each consumer can match on it.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// Envelope stripped and JSON parsed.
    Json(Value),
    /// Envelope stripped but the remainder was not valid JSON.
    InvalidJson { text: String, message: String },
    /// Successful text response without the envelope, unchanged.
    Text(String),
    /// Successful response with an empty or non-text body, unchanged.
    Raw(Body),
    /// Non-success status; body unchanged.
    ErrorBody { status: u16, body: Body },
    /// No response was obtained.
    Unreachable(String),
}

impl Decoded {
    /// Returns the parsed JSON, or an error describing why there is none.
    pub fn into_json(self) -> Result<Value> {
        match self {
            Decoded::Json(value) => Ok(value),
            Decoded::InvalidJson { text, message } => {
                Err(GerritError::InvalidJson { text, message })
            }
            Decoded::Text(text) => Err(GerritError::UnexpectedBody(text)),
            Decoded::Raw(body) => Err(GerritError::UnexpectedBody(body.to_string())),
            Decoded::ErrorBody { status, body } => Err(GerritError::ApiError {
                message: body.to_string(),
                status: Some(status),
            }),
            Decoded::Unreachable(message) => Err(GerritError::Transport(message)),
        }
    }
}

/// Decode a raw response.
///
/// * non-2xx status: logged, body returned unchanged as [`Decoded::ErrorBody`]
/// * text starting with [`MAGIC_PREFIX`]: prefix stripped and parsed
/// * anything else: returned unchanged
pub fn decode_response(status: u16, body: Body) -> Decoded {
    if !(200..300).contains(&status) {
        tracing::error!("Rest call failed with the status code {status} and response {body}");
        return Decoded::ErrorBody { status, body };
    }

    let text = match body {
        Body::Text(text) => text,
        other => return Decoded::Raw(other),
    };

    let Some(stripped) = text.strip_prefix(MAGIC_PREFIX) else {
        return Decoded::Text(text);
    };

    match serde_json::from_str(stripped) {
        Ok(value) => Decoded::Json(value),
        Err(err) => {
            tracing::error!("Invalid JSON in response {stripped}: {err}");
            Decoded::InvalidJson {
                text: stripped.to_string(),
                message: err.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_is_stripped_and_parsed() {
        let decoded = decode_response(200, Body::from(")]}'\n[{\"id\":\"a\"},{\"id\":\"b\"}]"));
        assert_eq!(decoded, Decoded::Json(json!([{"id": "a"}, {"id": "b"}])));

        let decoded = decode_response(200, Body::from(")]}'\n{\"name\":\"Jane\"}"));
        assert_eq!(decoded, Decoded::Json(json!({"name": "Jane"})));
    }

    #[test]
    fn test_body_without_prefix_is_unchanged() {
        let decoded = decode_response(200, Body::from("[1, 2, 3]"));
        assert_eq!(decoded, Decoded::Text("[1, 2, 3]".to_string()));

        let decoded = decode_response(200, Body::from("plain text"));
        assert_eq!(decoded, Decoded::Text("plain text".to_string()));
    }

    #[test]
    fn test_prefix_must_include_newline() {
        let decoded = decode_response(200, Body::from(")]}'[]"));
        assert_eq!(decoded, Decoded::Text(")]}'[]".to_string()));
    }

    #[test]
    fn test_invalid_json_returns_stripped_text() {
        let decoded = decode_response(200, Body::from(")]}'\n{not json"));
        match decoded {
            Decoded::InvalidJson { text, .. } => assert_eq!(text, "{not json"),
            other => panic!("Expected InvalidJson, got {:?}", other),
        }
    }

    #[test]
    fn test_error_status_keeps_raw_body() {
        let decoded = decode_response(404, Body::from("Not found: 42"));
        assert_eq!(
            decoded,
            Decoded::ErrorBody {
                status: 404,
                body: Body::from("Not found: 42")
            }
        );
    }

    #[test]
    fn test_error_status_ignores_envelope() {
        let decoded = decode_response(500, Body::from(")]}'\n{}"));
        assert!(matches!(decoded, Decoded::ErrorBody { status: 500, .. }));
    }

    #[test]
    fn test_non_text_body_is_unchanged() {
        assert_eq!(decode_response(200, Body::Empty), Decoded::Raw(Body::Empty));
        assert_eq!(
            decode_response(200, Body::Binary(vec![0xff])),
            Decoded::Raw(Body::Binary(vec![0xff]))
        );
    }

    #[test]
    fn test_into_json_maps_variants_to_errors() {
        assert!(Decoded::Json(json!(1)).into_json().is_ok());
        assert!(matches!(
            Decoded::Text("x".into()).into_json(),
            Err(GerritError::UnexpectedBody(_))
        ));
        assert!(matches!(
            Decoded::ErrorBody { status: 401, body: Body::Empty }.into_json(),
            Err(GerritError::ApiError { status: Some(401), .. })
        ));
        assert!(matches!(
            Decoded::Unreachable("down".into()).into_json(),
            Err(GerritError::Transport(_))
        ));
    }
}
