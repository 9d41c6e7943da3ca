//! Account endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::Response,
};
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use super::{gerrit_json, not_found, ListQuery};
use crate::mock_server::state::MockState;
use crate::models::ACCOUNT_ID_FIELD;

/// GET /accounts/?q=is:active&S=...&n=...
///
/// Returns minimal entries carrying only the account id.
pub async fn query_accounts(
    State(state): State<Arc<RwLock<MockState>>>,
    Query(query): Query<ListQuery>,
) -> Response {
    let state = state.read().await;

    let entries = state
        .accounts
        .keys()
        .map(|id| {
            let mut entry = Map::new();
            entry.insert(ACCOUNT_ID_FIELD.to_string(), Value::from(*id));
            entry
        })
        .collect();
    let page = state.paginate(entries, query.start, query.n, "_more_accounts");

    gerrit_json(&page)
}

/// GET /accounts/{id}/detail
pub async fn get_account_detail(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(account_id): Path<u64>,
) -> Response {
    let state = state.read().await;

    match state.get_account(account_id) {
        Some(account) => gerrit_json(account),
        None => not_found(&format!("account {account_id}")),
    }
}
