//! Test data fixtures for the mock server.
//!
//! Provides factory functions for creating realistic test data.

use serde_json::{json, Value};

use crate::pagination::Record;
use crate::{AccountDetail, ProjectInfo, ProjectState};

/// Collection of fixture factories for test data.
pub struct Fixtures;

/// Default scenario data.
pub struct DefaultScenario {
    pub projects: Vec<(String, ProjectInfo)>,
    pub accounts: Vec<AccountDetail>,
    pub changes: Vec<Record>,
}

impl Fixtures {
    // =========================================================================
    // Project Fixtures
    // =========================================================================

    /// Create a project as the list endpoint reports it.
    pub fn project(name: &str, description: &str, state: ProjectState) -> ProjectInfo {
        ProjectInfo {
            id: urlencoding::encode(name).into_owned(),
            name: None,
            parent: Some("All-Projects".to_string()),
            description: Some(description.to_string()),
            state: Some(state),
        }
    }

    // =========================================================================
    // Account Fixtures
    // =========================================================================

    /// Create an account with a name derived from its id.
    pub fn account(account_id: u64, name: &str) -> AccountDetail {
        let username = name.to_lowercase().replace(' ', ".");
        AccountDetail {
            account_id,
            name: Some(name.to_string()),
            email: Some(format!("{username}@example.com")),
            username: Some(username),
            registered_on: Some("2020-01-01 00:00:00.000000000".to_string()),
        }
    }

    // =========================================================================
    // Change Fixtures
    // =========================================================================

    /// Create a change owned by `owner`, optionally submitted by `submitter`.
    pub fn change(
        number: u64,
        project: &str,
        updated: &str,
        owner: u64,
        submitter: Option<u64>,
    ) -> Record {
        let mut change = json!({
            "id": format!("{}~master~I{:040x}", urlencoding::encode(project), number),
            "project": project,
            "branch": "master",
            "_number": number,
            "subject": format!("Change {number}"),
            "status": if submitter.is_some() { "MERGED" } else { "NEW" },
            "updated": updated,
            "owner": { "_account_id": owner },
        });
        if let Some(submitter) = submitter {
            change["submitter"] = json!({ "_account_id": submitter });
        }
        match change {
            Value::Object(record) => record,
            _ => unreachable!("json! object literal"),
        }
    }

    /// Create `count` changes in one project, owners cycling over `owners`.
    ///
    /// Every third change is merged by the next owner in the cycle.
    pub fn bulk_changes(count: u64, project: &str, updated: &str, owners: &[u64]) -> Vec<Record> {
        (0..count)
            .map(|i| {
                let owner = owners[i as usize % owners.len()];
                let submitter =
                    (i % 3 == 0).then(|| owners[(i as usize + 1) % owners.len()]);
                Self::change(i + 1, project, updated, owner, submitter)
            })
            .collect()
    }

    // =========================================================================
    // Scenarios
    // =========================================================================

    /// A small server: three projects, three accounts, four changes.
    pub fn default_scenario() -> DefaultScenario {
        DefaultScenario {
            projects: vec![
                (
                    "platform/build".to_string(),
                    Self::project("platform/build", "Build tools", ProjectState::Active),
                ),
                (
                    "platform/docs".to_string(),
                    Self::project("platform/docs", "Documentation", ProjectState::ReadOnly),
                ),
                (
                    "tools/repo".to_string(),
                    Self::project("tools/repo", "Repo tool", ProjectState::Active),
                ),
            ],
            accounts: vec![
                Self::account(1000001, "Jane Doe"),
                Self::account(1000002, "John Roe"),
                Self::account(1000003, "Max Mustermann"),
            ],
            changes: vec![
                Self::change(1, "platform/build", "2024-01-01 09:00:00.000000000", 1000001, None),
                Self::change(
                    2,
                    "platform/build",
                    "2024-01-02 10:00:00.000000000",
                    1000002,
                    Some(1000001),
                ),
                Self::change(3, "tools/repo", "2024-01-03 11:00:00.000000000", 1000003, None),
                Self::change(
                    4,
                    "tools/repo",
                    "2024-01-04 12:00:00.000000000",
                    1000001,
                    Some(1000003),
                ),
            ],
        }
    }
}
