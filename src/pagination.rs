//! Pagination utilities for Gerrit API responses.
//!
//! Gerrit caps list endpoints at a fixed number of results and flags
//! truncation in the data itself: the last record of a truncated page
//! carries `"_more_changes": true` (or `_more_accounts`, `_more_projects`).
//! The next page is requested by offset with the `S` (skip) and `n` (limit)
//! query parameters.

use serde_json::{Map, Value};

use crate::decode::Decoded;
use crate::error::{FetchWarning, GerritError, Result};

/// Default number of records requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 500;

/// Default safety limit on the number of pages fetched for one query.
pub const DEFAULT_MAX_PAGES: u32 = 1000;

/// Key prefix Gerrit uses for its continuation markers.
const MORE_MARKER_PREFIX: &str = "_more_";

/// A JSON object as returned by Gerrit.
pub type Record = Map<String, Value>;

/// One page of records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// The records on this page.
    pub records: Vec<Record>,
    /// Whether the server signalled that more records exist.
    pub has_more: bool,
}

impl Page {
    /// Build a page from records, detecting the continuation marker.
    #[must_use]
    pub fn new(records: Vec<Record>) -> Self {
        let has_more = signals_more(&records);
        Self { records, has_more }
    }

    /// Build a page from a decoded JSON value.
    ///
    /// An array contributes its object elements; an object is a single
    /// record. Anything else is not a page.
    ///
    /// # Errors
    ///
    /// Returns [`GerritError::UnexpectedShape`] for scalars.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Array(items) => Ok(Self::new(
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::Object(record) => Some(record),
                        _ => None,
                    })
                    .collect(),
            )),
            Value::Object(record) => Ok(Self::new(vec![record])),
            _ => Err(GerritError::UnexpectedShape {
                expected: "a list or object of records",
            }),
        }
    }

    /// Build a page from any decode outcome.
    ///
    /// # Errors
    ///
    /// Returns an error if the response did not decode into records.
    pub fn from_decoded(decoded: Decoded) -> Result<Self> {
        Self::from_value(decoded.into_json()?)
    }

    /// Returns true if this page has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the number of records on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }
}

impl IntoIterator for Page {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

/// Whether any record carries a `_more_*: true` marker.
///
/// Gerrit only sets the marker on the last record, so the scan starts there.
pub fn signals_more(records: &[Record]) -> bool {
    records.iter().rev().any(|record| {
        record
            .iter()
            .any(|(key, value)| key.starts_with(MORE_MARKER_PREFIX) && value.as_bool() == Some(true))
    })
}

/// Append the skip/limit parameters to a query URL.
pub fn page_url(base: &str, offset: u32, limit: u32) -> String {
    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{base}{separator}S={offset}&n={limit}")
}

/// Items gathered by a fetch operation, plus every sub-request that degraded.
#[derive(Debug)]
pub struct Collected<T> {
    /// Whatever was gathered.
    pub items: T,
    /// Failures that were tolerated along the way.
    pub warnings: Vec<FetchWarning>,
}

impl<T> Collected<T> {
    /// A result with no warnings.
    pub fn complete(items: T) -> Self {
        Self {
            items,
            warnings: Vec::new(),
        }
    }

    /// A result with the given warnings.
    pub fn with_warnings(items: T, warnings: Vec<FetchWarning>) -> Self {
        Self { items, warnings }
    }

    /// True if nothing went wrong while collecting.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Map the items, keeping the warnings.
    #[must_use]
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Collected<U> {
        Collected {
            items: f(self.items),
            warnings: self.warnings,
        }
    }

    /// Split into items and warnings.
    pub fn into_parts(self) -> (T, Vec<FetchWarning>) {
        (self.items, self.warnings)
    }
}

impl<T: Default> Default for Collected<T> {
    fn default() -> Self {
        Self::complete(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_marker_on_last_record() {
        let records = vec![
            record(json!({"id": "a"})),
            record(json!({"id": "b", "_more_changes": true})),
        ];
        assert!(signals_more(&records));
    }

    #[test]
    fn test_marker_must_be_true() {
        let records = vec![record(json!({"id": "a", "_more_changes": false}))];
        assert!(!signals_more(&records));

        let records = vec![record(json!({"id": "a", "_more_accounts": "yes"}))];
        assert!(!signals_more(&records));
    }

    #[test]
    fn test_any_more_key_counts() {
        let records = vec![record(json!({"_account_id": 1, "_more_accounts": true}))];
        assert!(signals_more(&records));
    }

    #[test]
    fn test_empty_page_has_no_more() {
        assert!(!signals_more(&[]));
        assert!(Page::new(vec![]).is_empty());
    }

    #[test]
    fn test_page_from_array_skips_non_objects() {
        let page = Page::from_value(json!([{"id": "a"}, 3, "x", {"id": "b"}])).unwrap();
        assert_eq!(page.len(), 2);
        assert!(!page.has_more);
    }

    #[test]
    fn test_page_from_object_is_single_record() {
        let page = Page::from_value(json!({"id": "a", "_more_changes": true})).unwrap();
        assert_eq!(page.len(), 1);
        assert!(page.has_more);
    }

    #[test]
    fn test_page_from_scalar_is_rejected() {
        assert!(Page::from_value(json!(42)).is_err());
        assert!(Page::from_decoded(Decoded::Text("oops".into())).is_err());
    }

    #[test]
    fn test_page_url_appends_skip_and_limit() {
        assert_eq!(
            page_url("https://g/changes/?q=repo:x", 500, 500),
            "https://g/changes/?q=repo:x&S=500&n=500"
        );
        assert_eq!(page_url("https://g/changes/", 0, 25), "https://g/changes/?S=0&n=25");
    }

    #[test]
    fn test_collected_map_keeps_warnings() {
        let collected = Collected::with_warnings(
            vec![1, 2],
            vec![FetchWarning::new("u", GerritError::PageLimit { max_pages: 1 })],
        );
        let mapped = collected.map(|v| v.len());
        assert_eq!(mapped.items, 2);
        assert!(!mapped.is_complete());
    }
}
