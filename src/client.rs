//! Gerrit API client.
//!
//! Joins paths onto the server URL, decodes responses, and drives
//! pagination. Entity-specific operations live with the model types.

use std::env;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use url::Url;

use crate::decode::{decode_response, Decoded};
use crate::error::{FetchWarning, GerritError, Result};
use crate::pagination::{
    page_url, Collected, Page, Record, DEFAULT_MAX_PAGES, DEFAULT_PAGE_SIZE,
};
use crate::transport::{
    Credentials, HttpTransport, RequestOptions, ReqwestTransport, TransportSettings,
};

/// Connection settings for a Gerrit server.
#[derive(Debug, Clone)]
pub struct GerritConfig {
    /// Host name (`gerrit.example.com`) or full base URL.
    pub server: String,
    pub credentials: Option<Credentials>,
    /// Defaults to `false`: certificates are not checked.
    pub verify_tls: bool,
    pub proxy: Option<String>,
    pub timeout: Duration,
    pub connect_retries: u32,
    pub page_size: u32,
    pub max_pages: u32,
}

impl GerritConfig {
    /// Settings for `server` with every other value at its default.
    pub fn new(server: impl Into<String>) -> Self {
        let transport = TransportSettings::default();
        Self {
            server: server.into(),
            credentials: None,
            verify_tls: transport.verify_tls,
            proxy: None,
            timeout: transport.timeout,
            connect_retries: transport.connect_retries,
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    /// Read settings from environment variables.
    ///
    /// Uses `GERRIT_SERVER` (required), `GERRIT_USERNAME` and
    /// `GERRIT_PASSWORD` (basic auth, only when both are set) and
    /// `GERRIT_PROXY`.
    ///
    /// # Errors
    ///
    /// Returns an error if `GERRIT_SERVER` is not set.
    pub fn from_env() -> Result<Self> {
        let server = env::var("GERRIT_SERVER").map_err(|_| {
            GerritError::ConfigMissing("GERRIT_SERVER environment variable not set".to_string())
        })?;

        let mut config = Self::new(server);
        if let (Ok(username), Ok(password)) =
            (env::var("GERRIT_USERNAME"), env::var("GERRIT_PASSWORD"))
        {
            config.credentials = Some(Credentials::new(username, password));
        }
        config.proxy = env::var("GERRIT_PROXY").ok();
        Ok(config)
    }

    /// Set basic-auth credentials.
    #[must_use]
    pub fn with_credentials(mut self, username: &str, password: &str) -> Self {
        self.credentials = Some(Credentials::new(username, password));
        self
    }

    /// Enable or disable TLS certificate verification.
    #[must_use]
    pub fn with_verify_tls(mut self, verify_tls: bool) -> Self {
        self.verify_tls = verify_tls;
        self
    }

    /// Set the safety limit on pages per query.
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// The base URL; bare host names get `https://`.
    ///
    /// # Errors
    ///
    /// Returns an error if the server string is not a valid URL.
    pub fn base_url(&self) -> Result<Url> {
        let server = self.server.trim();
        if server.is_empty() {
            return Err(GerritError::ConfigMissing("server name is empty".to_string()));
        }
        if server.contains("://") {
            Ok(Url::parse(server)?)
        } else {
            Ok(Url::parse(&format!("https://{server}"))?)
        }
    }

    fn transport_settings(&self) -> TransportSettings {
        TransportSettings {
            auth: self.credentials.clone(),
            verify_tls: self.verify_tls,
            proxy: self.proxy.clone(),
            timeout: self.timeout,
            connect_retries: self.connect_retries,
            ..Default::default()
        }
    }
}

/// Gerrit API client.
///
/// This struct is cheaply cloneable; clones share the same transport.
///
/// # Example
///
/// ```no_run
/// use gerritapi::{GerritClient, GerritConfig};
///
/// # fn example() -> gerritapi::Result<()> {
/// // Create from environment variables
/// let client = GerritClient::from_env()?;
///
/// // Or configure manually
/// let config = GerritConfig::new("gerrit.example.com").with_credentials("jane", "secret");
/// let client = GerritClient::new(&config)?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct GerritClient {
    transport: Arc<dyn HttpTransport>,
    base_url: Arc<Url>,
    page_size: u32,
    max_pages: u32,
}

impl fmt::Debug for GerritClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GerritClient")
            .field("base_url", &self.base_url.as_str())
            .field("page_size", &self.page_size)
            .field("max_pages", &self.max_pages)
            .finish_non_exhaustive()
    }
}

impl GerritClient {
    /// Create a client from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `GERRIT_SERVER` is not set or invalid.
    pub fn from_env() -> Result<Self> {
        Self::new(&GerritConfig::from_env()?)
    }

    /// Create a client backed by [`ReqwestTransport`].
    ///
    /// # Errors
    ///
    /// Returns an error if the server URL or proxy is invalid.
    pub fn new(config: &GerritConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(config.transport_settings())?;
        let mut client = Self::with_transport(config.base_url()?, Arc::new(transport));
        client.page_size = config.page_size.max(1);
        client.max_pages = config.max_pages.max(1);
        Ok(client)
    }

    /// Create a client on top of any transport.
    pub fn with_transport(base_url: Url, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            base_url: Arc::new(base_url),
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    /// Override the page size.
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Override the safety limit on pages per query.
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn max_pages(&self) -> u32 {
        self.max_pages
    }

    /// Absolute URL for an API path such as `/changes/?q=...`.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
    }

    /// GET an API path and decode the response.
    pub async fn fetch(&self, path: &str) -> Decoded {
        self.fetch_url(&self.url_for(path)).await
    }

    /// GET an absolute URL and decode the response.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_url(&self, url: &str) -> Decoded {
        match self
            .transport
            .request(Method::GET, url, &RequestOptions::default())
            .await
        {
            Ok(response) => decode_response(response.status, response.body),
            Err(err) => {
                tracing::error!("{err}");
                Decoded::Unreachable(err.to_string())
            }
        }
    }

    /// Fetch every record of a paginated query.
    ///
    /// `path` is the query without pagination parameters. The first page is
    /// requested at offset 0, then [`collect_pages`](Self::collect_pages)
    /// follows the continuation markers.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_all(&self, path: &str) -> Collected<Vec<Record>> {
        let base = self.url_for(path);
        let first_url = page_url(&base, 0, self.page_size);

        match Page::from_decoded(self.fetch_url(&first_url).await) {
            Ok(first) => self.collect_pages(&base, first).await,
            Err(err) => Collected::with_warnings(Vec::new(), vec![FetchWarning::new(first_url, err)]),
        }
    }

    /// Merge `first` with every following page of `base_url`.
    ///
    /// Each iteration advances the offset by the page size and appends the
    /// fetched records. Iteration ends when a page no longer signals
    /// continuation, when a page fails (recorded as a warning), or when the
    /// total number of pages reaches the configured maximum (recorded as a
    /// [`GerritError::PageLimit`] warning).
    ///
    /// A page that signals more results while holding fewer records than the
    /// page size means the server capped it; the records between the cap and
    /// the next offset are never seen, so a [`GerritError::ShortPage`]
    /// warning is recorded for it.
    pub async fn collect_pages(&self, base_url: &str, first: Page) -> Collected<Vec<Record>> {
        let mut warnings = Vec::new();
        self.check_page_fill(&page_url(base_url, 0, self.page_size), &first, &mut warnings);
        let mut has_more = first.has_more;
        let mut records = first.records;
        let mut offset: u32 = 0;
        let mut pages: u32 = 1;

        while has_more {
            if pages >= self.max_pages {
                warnings.push(FetchWarning::new(
                    base_url,
                    GerritError::PageLimit {
                        max_pages: self.max_pages,
                    },
                ));
                break;
            }

            offset = offset.saturating_add(self.page_size);
            let url = page_url(base_url, offset, self.page_size);
            tracing::info!(
                "Fetching {} - {} records. Please wait...",
                offset.saturating_add(1),
                offset.saturating_add(self.page_size)
            );

            match Page::from_decoded(self.fetch_url(&url).await) {
                Ok(page) => {
                    self.check_page_fill(&url, &page, &mut warnings);
                    has_more = page.has_more;
                    records.extend(page.records);
                }
                Err(err) => {
                    warnings.push(FetchWarning::new(url, err));
                    break;
                }
            }
            pages += 1;
        }

        Collected::with_warnings(records, warnings)
    }

    fn check_page_fill(&self, url: &str, page: &Page, warnings: &mut Vec<FetchWarning>) {
        if page.has_more && page.len() < self.page_size as usize {
            warnings.push(FetchWarning::new(
                url,
                GerritError::ShortPage {
                    received: page.len(),
                    page_size: self.page_size,
                },
            ));
        }
    }
}

/// Query part of a URL built with [`api_url`].
#[derive(Debug, Clone)]
pub enum UrlQuery<'a> {
    /// Used as-is.
    Raw(&'a str),
    /// Form-encoded and joined with `&`.
    Pairs(&'a [(&'a str, &'a str)]),
}

/// Build `scheme://netloc/path?query#fragment` from its parts.
///
/// # Errors
///
/// Returns an error if the parts do not form a valid URL.
pub fn api_url(
    netloc: &str,
    scheme: &str,
    path: &str,
    query: UrlQuery<'_>,
    fragment: &str,
) -> Result<Url> {
    let mut url = Url::parse(&format!("{scheme}://{netloc}"))?;
    url.set_path(path);
    match query {
        UrlQuery::Raw("") => {}
        UrlQuery::Raw(raw) => url.set_query(Some(raw)),
        UrlQuery::Pairs(pairs) => {
            url.query_pairs_mut().extend_pairs(pairs.iter());
        }
    }
    if !fragment.is_empty() {
        url.set_fragment(Some(fragment));
    }
    tracing::debug!("Api url formed --> {url}");
    Ok(url)
}
