//! Change queries.
//!
//! Changes are kept as raw [`Record`]s: Gerrit returns dozens of optional
//! fields depending on the query options, and the export writes whatever
//! came back.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::client::GerritClient;
use crate::error::Result;
use crate::pagination::{Collected, Record};
use crate::window::{format_gerrit_timestamp, Window};

/// A search over `/changes/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeQuery {
    /// All changes of one repository.
    Repo(String),
    /// Changes updated after an instant.
    After(DateTime<Utc>),
    /// Any other Gerrit search expression.
    Raw(String),
}

impl ChangeQuery {
    /// The search expression, unencoded.
    pub fn expression(&self) -> String {
        match self {
            ChangeQuery::Repo(name) => format!("repo:{name}"),
            ChangeQuery::After(instant) => {
                format!("after:\"{}\"", format_gerrit_timestamp(*instant))
            }
            ChangeQuery::Raw(query) => query.clone(),
        }
    }

    /// Path and query string, without pagination parameters.
    pub fn path(&self) -> String {
        format!("/changes/?q={}", urlencoding::encode(&self.expression()))
    }
}

impl fmt::Display for ChangeQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expression())
    }
}

/// Get every change matching the query, across all pages.
///
/// Account references are left as returned by the server.
#[tracing::instrument(skip(client, query), fields(query = %query))]
pub async fn get_changes(client: &GerritClient, query: &ChangeQuery) -> Collected<Vec<Record>> {
    client.fetch_all(&query.path()).await
}

/// Get every change matching the query with `owner` and `submitter`
/// replaced by the account's name.
#[tracing::instrument(skip(client, query), fields(query = %query))]
pub async fn get_resolved_changes(
    client: &GerritClient,
    query: &ChangeQuery,
) -> Collected<Vec<Record>> {
    let (mut changes, mut warnings) = get_changes(client, query).await.into_parts();
    warnings.extend(client.resolve_references(&mut changes).await);
    Collected::with_warnings(changes, warnings)
}

/// Get the resolved changes updated inside the window.
pub async fn get_changes_in_window(client: &GerritClient, window: &Window) -> Collected<Vec<Record>> {
    let changes = get_resolved_changes(client, &ChangeQuery::After(window.start)).await;
    tracing::info!(
        "Total commits from {} is: {}",
        window.gerrit_start(),
        changes.items.len()
    );
    changes
}

/// Get the resolved changes of the last `duration` (e.g. `24Hours`) before `stop`.
///
/// # Errors
///
/// Returns an error if `duration` is not a valid duration string. Fetch
/// failures are reported as warnings instead.
pub async fn get_changes_in_period(
    client: &GerritClient,
    duration: &str,
    stop: DateTime<Utc>,
) -> Result<Collected<Vec<Record>>> {
    let window = Window::parse(duration, stop)?;
    Ok(get_changes_in_window(client, &window).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_repo_query_path() {
        let query = ChangeQuery::Repo("platform/build".to_string());
        assert_eq!(query.expression(), "repo:platform/build");
        assert_eq!(query.path(), "/changes/?q=repo%3Aplatform%2Fbuild");
    }

    #[test]
    fn test_after_query_quotes_timestamp() {
        let instant = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let query = ChangeQuery::After(instant);
        assert_eq!(query.expression(), "after:\"2024-01-02 03:04:05.000\"");
        assert!(query.path().starts_with("/changes/?q=after%3A%222024-01-02"));
    }
}
