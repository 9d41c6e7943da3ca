//! HTTP request handlers for the mock server.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::decode::MAGIC_PREFIX;

pub mod accounts;
pub mod changes;
pub mod projects;

pub use accounts::*;
pub use changes::*;
pub use projects::*;

/// Query parameters shared by the list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub q: Option<String>,
    #[serde(rename = "S")]
    pub start: Option<usize>,
    pub n: Option<usize>,
}

/// A 200 response with the JSON body wrapped in Gerrit's envelope.
pub(crate) fn gerrit_json<T: Serialize>(value: &T) -> Response {
    match serde_json::to_string(value) {
        Ok(json) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json; charset=utf-8")],
            format!("{MAGIC_PREFIX}{json}"),
        )
            .into_response(),
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response(),
    }
}

/// A plain-text 404, as Gerrit sends them.
pub(crate) fn not_found(what: &str) -> Response {
    (StatusCode::NOT_FOUND, format!("Not found: {what}")).into_response()
}
