//! Error types for Gerrit API operations.

use thiserror::Error;

/// Errors that can occur during Gerrit API operations.
#[derive(Debug, Error)]
pub enum GerritError {
    /// Configuration is missing or incomplete.
    #[error("Gerrit configuration required: {0}")]
    ConfigMissing(String),

    /// Duration string could not be turned into a time window.
    #[error("Invalid duration '{input}': {reason}")]
    InvalidDuration { input: String, reason: String },

    /// The server answered with a non-success status.
    #[error("Gerrit API error (status {status:?}): {message}")]
    ApiError {
        message: String,
        status: Option<u16>,
    },

    /// No response was received at all.
    #[error("Request failed: {0}")]
    Transport(String),

    /// The body was not wrapped in the JSON envelope.
    #[error("Unexpected response body: {0}")]
    UnexpectedBody(String),

    /// The body carried the envelope but the JSON inside was malformed.
    #[error("Invalid JSON in response ({message}): {text}")]
    InvalidJson { text: String, message: String },

    /// JSON was valid but not the shape the caller needed.
    #[error("Unexpected response shape: expected {expected}")]
    UnexpectedShape { expected: &'static str },

    /// Pagination stopped before the server stopped signalling more results.
    #[error("Stopped after {max_pages} pages while the server still reported more results")]
    PageLimit { max_pages: u32 },

    /// A page signalled more results but held fewer records than requested,
    /// so the next offset skips records the server never returned.
    #[error("Server returned {received} of {page_size} records on a page that reported more results")]
    ShortPage { received: usize, page_size: u32 },

    /// A record or account detail lacked a field that was required.
    #[error("Missing field '{field}'")]
    MissingField { field: &'static str },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("Failed to parse response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    /// CSV export error.
    #[error("CSV export failed: {0}")]
    CsvError(#[from] csv::Error),

    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Gerrit operations.
pub type Result<T> = core::result::Result<T, GerritError>;

/// A sub-request that failed without aborting the surrounding operation.
///
/// Fetch operations keep going when one page or one account lookup fails;
/// each such failure is recorded here so callers can tell a partial result
/// from a complete one.
#[derive(Debug, Error)]
#[error("{url}: {error}")]
pub struct FetchWarning {
    /// The URL of the request that degraded.
    pub url: String,
    /// What went wrong.
    #[source]
    pub error: GerritError,
}

impl FetchWarning {
    /// Create a warning and log it.
    pub fn new(url: impl Into<String>, error: GerritError) -> Self {
        let warning = Self {
            url: url.into(),
            error,
        };
        tracing::warn!("{}", warning);
        warning
    }
}
