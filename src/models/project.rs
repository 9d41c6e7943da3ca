//! Project model and trait implementations.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::GerritClient;
use crate::error::{FetchWarning, GerritError, Result};
use crate::pagination::Collected;
use crate::traits::Get;

/// Lists every visible project with its description.
pub const ALL_PROJECTS_PATH: &str = "/projects/?d";

/// A Gerrit project (repository).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectInfo {
    /// URL-encoded project name.
    pub id: String,

    /// Project name. Omitted by the list endpoint, where the name is the map key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Name of the parent project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Only an explicit `ACTIVE` counts as active; a missing state does not.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<ProjectState>,
}

/// Project state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectState {
    Active,
    ReadOnly,
    Hidden,
    #[serde(other)]
    Unknown,
}

impl ProjectInfo {
    /// Whether the project is explicitly reported as active.
    pub fn is_active(&self) -> bool {
        self.state == Some(ProjectState::Active)
    }

    /// The decoded project name, falling back to the id.
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| {
            urlencoding::decode(&self.id)
                .map(|name| name.into_owned())
                .unwrap_or_else(|_| self.id.clone())
        })
    }
}

#[async_trait]
impl Get for ProjectInfo {
    type Id = String; // Project name

    #[tracing::instrument(skip(client))]
    async fn get(client: &GerritClient, name: String) -> Result<Self> {
        let path = format!("/projects/{}", urlencoding::encode(&name));
        let value = client.fetch(&path).await.into_json()?;
        Ok(serde_json::from_value(value)?)
    }
}

/// Get every project, keyed by name.
///
/// Entries that do not deserialize are skipped with a warning.
#[tracing::instrument(skip(client))]
pub async fn get_projects(client: &GerritClient) -> Collected<BTreeMap<String, ProjectInfo>> {
    let url = client.url_for(ALL_PROJECTS_PATH);
    let mut projects = BTreeMap::new();
    let mut warnings = Vec::new();

    let entries = match client.fetch(ALL_PROJECTS_PATH).await.into_json() {
        Ok(Value::Object(entries)) => entries,
        Ok(_) => {
            warnings.push(FetchWarning::new(
                url,
                GerritError::UnexpectedShape {
                    expected: "an object keyed by project name",
                },
            ));
            return Collected::with_warnings(projects, warnings);
        }
        Err(err) => {
            warnings.push(FetchWarning::new(url, err));
            return Collected::with_warnings(projects, warnings);
        }
    };

    for (name, entry) in entries {
        match serde_json::from_value::<ProjectInfo>(entry) {
            Ok(project) => {
                projects.insert(name, project);
            }
            Err(err) => warnings.push(FetchWarning::new(format!("{url} [{name}]"), err.into())),
        }
    }

    tracing::info!("Found {} repositories", projects.len());
    Collected::with_warnings(projects, warnings)
}

/// Get the names of all projects whose state is `ACTIVE`.
#[tracing::instrument(skip(client))]
pub async fn get_active_projects(client: &GerritClient) -> Collected<Vec<String>> {
    let active = get_projects(client).await.map(|projects| {
        projects
            .into_iter()
            .filter(|(_, project)| project.is_active())
            .map(|(name, _)| name)
            .collect::<Vec<_>>()
    });
    tracing::info!("Found {} active repositories", active.items.len());
    active
}
