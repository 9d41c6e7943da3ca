//! Mock server state management.
//!
//! Provides the in-memory data store for the mock Gerrit server.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;

use crate::pagination::Record;
use crate::{AccountDetail, ProjectInfo};

/// Number of results returned when a request carries no `n` parameter.
pub const DEFAULT_SERVER_LIMIT: usize = 500;

/// Shared state for the mock server.
///
/// This struct holds all the mock data that the server will serve.
/// It's wrapped in `Arc<RwLock<_>>` for concurrent access.
#[derive(Debug)]
pub struct MockState {
    /// Projects indexed by name (e.g., "platform/build").
    pub projects: BTreeMap<String, ProjectInfo>,

    /// Account details indexed by account id. Every account is active.
    pub accounts: BTreeMap<u64, AccountDetail>,

    /// Changes in the order the server returns them.
    pub changes: Vec<Record>,

    /// Upper bound on results per request, whatever `n` asks for.
    pub max_limit: usize,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            projects: BTreeMap::new(),
            accounts: BTreeMap::new(),
            changes: Vec::new(),
            max_limit: DEFAULT_SERVER_LIMIT,
        }
    }
}

impl MockState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state wrapped in Arc<RwLock> for sharing.
    pub fn shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    /// Add a project to the state.
    pub fn with_project(mut self, name: &str, project: ProjectInfo) -> Self {
        self.projects.insert(name.to_string(), project);
        self
    }

    /// Add an account to the state.
    pub fn with_account(mut self, account: AccountDetail) -> Self {
        self.accounts.insert(account.account_id, account);
        self
    }

    /// Append changes to the state.
    pub fn with_changes(mut self, changes: impl IntoIterator<Item = Record>) -> Self {
        self.changes.extend(changes);
        self
    }

    /// Cap the number of results per request.
    pub fn with_max_limit(mut self, max_limit: usize) -> Self {
        self.max_limit = max_limit.max(1);
        self
    }

    /// Get a project by name.
    pub fn get_project(&self, name: &str) -> Option<&ProjectInfo> {
        self.projects.get(name)
    }

    /// Get an account by id.
    pub fn get_account(&self, account_id: u64) -> Option<&AccountDetail> {
        self.accounts.get(&account_id)
    }

    /// Changes matching a search expression.
    ///
    /// Understands `repo:NAME` and `after:"TIMESTAMP"` (compared against the
    /// `updated` field); anything else matches every change.
    pub fn query_changes(&self, query: Option<&str>) -> Vec<&Record> {
        let query = query.unwrap_or_default();
        self.changes
            .iter()
            .filter(|change| {
                if let Some(repo) = query.strip_prefix("repo:") {
                    return change.get("project").and_then(Value::as_str) == Some(repo);
                }
                if let Some(after) = query.strip_prefix("after:") {
                    let after = after.trim_matches('"');
                    return change
                        .get("updated")
                        .and_then(Value::as_str)
                        .is_some_and(|updated| updated >= after);
                }
                true
            })
            .collect()
    }

    /// Slice `items` the way Gerrit does for `S`/`n`, marking truncation.
    ///
    /// When records remain past the slice, the last returned record gets
    /// `marker: true`.
    pub fn paginate(
        &self,
        items: Vec<Record>,
        start: Option<usize>,
        limit: Option<usize>,
        marker: &str,
    ) -> Vec<Record> {
        let start = start.unwrap_or(0);
        let limit = limit.unwrap_or(self.max_limit).clamp(1, self.max_limit);
        let total = items.len();

        let mut page: Vec<Record> = items.into_iter().skip(start).take(limit).collect();
        if start.saturating_add(limit) < total {
            if let Some(last) = page.last_mut() {
                last.insert(marker.to_string(), Value::Bool(true));
            }
        }
        page
    }
}
