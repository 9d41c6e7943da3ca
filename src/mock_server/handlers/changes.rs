//! Change endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::Response,
};
use tokio::sync::RwLock;

use super::{gerrit_json, ListQuery};
use crate::mock_server::state::MockState;

/// GET /changes/?q=...&S=...&n=...
pub async fn query_changes(
    State(state): State<Arc<RwLock<MockState>>>,
    Query(query): Query<ListQuery>,
) -> Response {
    let state = state.read().await;

    let matching = state
        .query_changes(query.q.as_deref())
        .into_iter()
        .cloned()
        .collect();
    let page = state.paginate(matching, query.start, query.n, "_more_changes");

    gerrit_json(&page)
}
