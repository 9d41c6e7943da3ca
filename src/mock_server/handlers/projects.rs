//! Project endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::Response,
};
use tokio::sync::RwLock;

use super::{gerrit_json, not_found};
use crate::mock_server::state::MockState;

/// GET /projects/
pub async fn list_projects(State(state): State<Arc<RwLock<MockState>>>) -> Response {
    let state = state.read().await;
    gerrit_json(&state.projects)
}

/// GET /projects/{name}
pub async fn get_project(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(name): Path<String>,
) -> Response {
    let state = state.read().await;

    match state.get_project(&name) {
        Some(project) => {
            let mut project = project.clone();
            project.name = Some(name);
            gerrit_json(&project)
        }
        None => not_found(&name),
    }
}
