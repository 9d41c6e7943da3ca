//! HTTP transport.
//!
//! The core never looks at connection-level details: it hands a method, a
//! URL and per-call options to an [`HttpTransport`] and consumes the status,
//! body and headers that come back. [`ReqwestTransport`] is the production
//! implementation; tests substitute their own.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, Method};

use crate::error::{GerritError, Result};

const USER_AGENT: &str = concat!("gerritapi/", env!("CARGO_PKG_VERSION"));

/// Username/password pair for HTTP basic authentication.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Per-call overrides of the transport's session defaults.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Replaces the session credentials for this request.
    pub auth: Option<Credentials>,
    /// Added on top of the session headers.
    pub headers: HeaderMap,
    /// Replaces the session timeout for this request.
    pub timeout: Option<Duration>,
}

/// A response body as it came off the wire.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Body {
    /// No content.
    #[default]
    Empty,
    /// UTF-8 content.
    Text(String),
    /// Content that is not valid UTF-8.
    Binary(Vec<u8>),
}

impl Body {
    /// Classify raw bytes as empty, text or binary.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        if bytes.is_empty() {
            return Body::Empty;
        }
        match String::from_utf8(bytes) {
            Ok(text) => Body::Text(text),
            Err(err) => Body::Binary(err.into_bytes()),
        }
    }

    /// The body as text, if it is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Body::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Body::Text(text.to_string())
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Body::Text(text)
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Empty => f.write_str("<empty>"),
            Body::Text(text) => f.write_str(text),
            Body::Binary(bytes) => write!(f, "<{} bytes of binary content>", bytes.len()),
        }
    }
}

/// Status, body and headers of a completed request.
#[derive(Debug, Clone, Default)]
pub struct RawResponse {
    pub status: u16,
    pub body: Body,
    pub headers: HeaderMap,
}

impl RawResponse {
    /// Shorthand for a text response without headers.
    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: Body::Text(body.into()),
            headers: HeaderMap::new(),
        }
    }
}

/// Capability to issue HTTP requests.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Perform a request and return whatever the server answered.
    ///
    /// # Errors
    ///
    /// Returns an error only when no response was obtained (invalid URL,
    /// TLS failure, connection refused, timeout, too many redirects).
    async fn request(
        &self,
        method: Method,
        url: &str,
        options: &RequestOptions,
    ) -> Result<RawResponse>;
}

/// Session-level defaults for [`ReqwestTransport`].
#[derive(Debug, Clone)]
pub struct TransportSettings {
    pub auth: Option<Credentials>,
    pub headers: HeaderMap,
    pub verify_tls: bool,
    pub proxy: Option<String>,
    pub timeout: Duration,
    pub connect_retries: u32,
}

impl Default for TransportSettings {
    fn default() -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        Self {
            auth: None,
            headers,
            verify_tls: false,
            proxy: None,
            timeout: Duration::from_secs(300),
            connect_retries: 3,
        }
    }
}

/// [`HttpTransport`] backed by a pooled `reqwest` client.
///
/// This struct is cheaply cloneable; clones reference the same underlying
/// connection pool.
#[derive(Clone)]
pub struct ReqwestTransport {
    http: Client,
    auth: Option<Credentials>,
    connect_retries: u32,
}

impl fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("auth", &self.auth)
            .field("connect_retries", &self.connect_retries)
            .finish_non_exhaustive()
    }
}

impl ReqwestTransport {
    /// Build a transport from session settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the proxy URL is invalid or the TLS backend
    /// cannot be initialised.
    pub fn new(settings: TransportSettings) -> Result<Self> {
        let mut builder = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(settings.headers)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .danger_accept_invalid_certs(!settings.verify_tls)
            .timeout(settings.timeout);

        if let Some(proxy) = settings.proxy.as_deref() {
            builder = builder.proxy(reqwest::Proxy::all(proxy).map_err(GerritError::HttpError)?);
        }

        let http = builder.build().map_err(GerritError::HttpError)?;

        Ok(Self {
            http,
            auth: settings.auth,
            connect_retries: settings.connect_retries,
        })
    }

    async fn send_once(
        &self,
        method: Method,
        url: &str,
        options: &RequestOptions,
    ) -> reqwest::Result<reqwest::Response> {
        let mut request = self
            .http
            .request(method, url)
            .headers(options.headers.clone());

        if let Some(auth) = options.auth.as_ref().or(self.auth.as_ref()) {
            request = request.basic_auth(&auth.username, Some(&auth.password));
        }
        if let Some(timeout) = options.timeout {
            request = request.timeout(timeout);
        }

        request.send().await
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    #[tracing::instrument(skip(self, options))]
    async fn request(
        &self,
        method: Method,
        url: &str,
        options: &RequestOptions,
    ) -> Result<RawResponse> {
        let mut attempt = 0;
        let response = loop {
            match self.send_once(method.clone(), url, options).await {
                Ok(response) => break response,
                Err(err) if err.is_connect() && attempt < self.connect_retries => {
                    attempt += 1;
                    tracing::debug!("Connection to {url} failed, retry {attempt}: {err}");
                }
                Err(err) => return Err(describe_failure(url, &method, err)),
            }
        };

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let bytes = response.bytes().await.map_err(GerritError::HttpError)?;
        let body = Body::from_bytes(bytes.to_vec());

        tracing::debug!(status, headers = ?headers, "Rest response: {body}");

        Ok(RawResponse {
            status,
            body,
            headers,
        })
    }
}

fn describe_failure(url: &str, method: &Method, err: reqwest::Error) -> GerritError {
    let message = if err.is_builder() {
        format!("The uri {url} passed for this {method} method is invalid")
    } else if err.is_timeout() {
        format!("{method} request to {url} timed out")
    } else if err.is_redirect() {
        format!("Too many redirects for {url}")
    } else if err.is_connect() {
        format!("Failed to establish a connection with {url}")
    } else {
        format!("{method} request to {url} failed: {err}")
    };
    GerritError::Transport(message)
}
