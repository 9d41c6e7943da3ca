//! Gerrit API client library.
//!
//! A Rust library for reading projects, accounts and changes from a Gerrit
//! code-review server. List endpoints are paginated transparently and
//! account references inside changes can be resolved to names.
//!
//! # Quick Start
//!
//! ```no_run
//! use chrono::Utc;
//! use gerritapi::{get_active_projects, get_changes_in_period, GerritClient};
//!
//! #[tokio::main]
//! async fn main() -> gerritapi::Result<()> {
//!     // Create client from environment variables
//!     let client = GerritClient::from_env()?;
//!
//!     // Active repositories
//!     let projects = get_active_projects(&client).await;
//!     println!("Found {} active projects", projects.items.len());
//!
//!     // Changes of the last two days, owner/submitter resolved to names
//!     let changes = get_changes_in_period(&client, "2Days", Utc::now()).await?;
//!     println!("Found {} changes", changes.items.len());
//!     for warning in &changes.warnings {
//!         eprintln!("warning: {warning}");
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Partial results
//!
//! Fetch operations never fail as a whole. A page or account lookup that
//! goes wrong is recorded as a [`FetchWarning`] in the returned
//! [`Collected`] and the operation carries on with what succeeded. Check
//! [`Collected::is_complete`] before trusting a result to be exhaustive.
//!
//! # Configuration
//!
//! The client reads configuration from environment variables:
//!
//! - `GERRIT_SERVER` (required) - Host name or base URL
//! - `GERRIT_USERNAME` / `GERRIT_PASSWORD` (optional) - HTTP basic auth
//! - `GERRIT_PROXY` (optional) - Proxy URL for all requests

mod client;
mod decode;
mod error;
mod models;
mod pagination;
mod resolve;
mod traits;
mod transport;
mod window;

pub mod cli;
pub mod output;

#[cfg(feature = "test-server")]
pub mod mock_server;

// Re-export core types
pub use client::{api_url, GerritClient, GerritConfig, UrlQuery};
pub use decode::{decode_response, Decoded, MAGIC_PREFIX};
pub use error::{FetchWarning, GerritError, Result};
pub use pagination::{
    page_url, signals_more, Collected, Page, Record, DEFAULT_MAX_PAGES, DEFAULT_PAGE_SIZE,
};
pub use resolve::ACCOUNT_REFERENCE_FIELDS;
pub use transport::{
    Body, Credentials, HttpTransport, RawResponse, RequestOptions, ReqwestTransport,
    TransportSettings,
};
pub use window::{format_gerrit_timestamp, DurationUnit, Lookback, Window};

// Re-export traits
pub use traits::Get;

// Re-export models
pub use models::{
    account_id_of, AccountDetail, ChangeQuery, ProjectInfo, ProjectState, ACCOUNT_ID_FIELD,
    ACTIVE_ACCOUNTS_PATH, ALL_PROJECTS_PATH,
};

// Re-export convenience functions
pub use models::{get_active_accounts, get_active_projects, get_projects};
pub use models::{get_changes, get_changes_in_period, get_changes_in_window, get_resolved_changes};
