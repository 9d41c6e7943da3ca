//! E2E tests using the mock Gerrit server.
//!
//! These tests exercise full workflows against the mock server,
//! testing realistic scenarios rather than individual endpoints.

#![cfg(feature = "test-server")]

use chrono::{TimeZone, Utc};
use gerritapi::mock_server::{Fixtures, MockServer, MockState};
use gerritapi::output::export_csv;
use gerritapi::{
    get_active_accounts, get_active_projects, get_changes_in_period, get_resolved_changes,
    ChangeQuery, GerritClient, GerritConfig, GerritError,
};

fn client_for(server: &MockServer) -> GerritClient {
    GerritClient::new(&GerritConfig::new(server.url())).unwrap()
}

// =============================================================================
// Server Lifecycle Tests
// =============================================================================

#[tokio::test]
async fn test_server_starts_on_random_port() {
    let server1 = MockServer::start().await;
    let server2 = MockServer::start().await;

    // Both servers should have different URLs
    assert_ne!(server1.url(), server2.url());

    server1.shutdown().await;
    server2.shutdown().await;
}

#[tokio::test]
async fn test_server_shutdown_degrades_to_warnings() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    server.shutdown().await;

    let projects = get_active_projects(&client).await;

    assert!(projects.items.is_empty());
    assert_eq!(projects.warnings.len(), 1);
}

// =============================================================================
// Workflow Tests
// =============================================================================

#[tokio::test]
async fn test_active_projects_workflow() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    let projects = get_active_projects(&client).await;

    assert!(projects.is_complete());
    assert_eq!(projects.items, vec!["platform/build", "tools/repo"]);

    server.shutdown().await;
}

#[tokio::test]
async fn test_changes_in_period_workflow() {
    let server = MockServer::start().await;
    let client = client_for(&server);
    let stop = Utc.with_ymd_and_hms(2024, 1, 4, 0, 0, 0).unwrap();

    let changes = get_changes_in_period(&client, "2Days", stop).await.unwrap();

    assert!(changes.is_complete());
    let owners: Vec<_> = changes.items.iter().map(|c| c["owner"].clone()).collect();
    assert_eq!(owners, vec!["John Roe", "Max Mustermann", "Jane Doe"]);
    assert_eq!(changes.items[0]["submitter"], "Jane Doe");

    server.shutdown().await;
}

#[tokio::test]
async fn test_large_repository_is_paginated_and_resolved() {
    let state = MockState::new()
        .with_account(Fixtures::account(1, "Ada Lovelace"))
        .with_account(Fixtures::account(2, "Grace Hopper"))
        .with_changes(Fixtures::bulk_changes(
            510,
            "platform/build",
            "2024-01-01 00:00:00.000000000",
            &[1, 2],
        ));
    let server = MockServer::with_state(state).await;
    let client = client_for(&server);

    let changes =
        get_resolved_changes(&client, &ChangeQuery::Repo("platform/build".to_string())).await;

    assert!(changes.is_complete(), "warnings: {:?}", changes.warnings);
    assert_eq!(changes.items.len(), 510);
    assert!(changes
        .items
        .iter()
        .all(|c| c["owner"] == "Ada Lovelace" || c["owner"] == "Grace Hopper"));
    assert_eq!(changes.items[0]["_number"], 1);
    assert_eq!(changes.items[509]["_number"], 510);

    server.shutdown().await;
}

#[tokio::test]
async fn test_server_cap_below_page_size_is_reported() {
    // The server returns at most 100 results, while the client assumes 500.
    let state = MockState::new()
        .with_max_limit(100)
        .with_account(Fixtures::account(1, "Ada Lovelace"))
        .with_changes(Fixtures::bulk_changes(150, "p", "2024-01-01", &[1]));
    let server = MockServer::with_state(state).await;
    let client = client_for(&server);

    let changes = get_resolved_changes(&client, &ChangeQuery::Repo("p".to_string())).await;

    // Second page starts at offset 500, past the end; the gap is reported.
    assert_eq!(changes.items.len(), 100);
    assert!(!changes.is_complete());
    assert!(matches!(
        changes.warnings[0].error,
        GerritError::ShortPage { received: 100, page_size: 500 }
    ));

    server.shutdown().await;
}

#[tokio::test]
async fn test_active_accounts_workflow() {
    let server = MockServer::start().await;
    let client = client_for(&server).with_page_size(2);

    let accounts = get_active_accounts(&client).await;

    assert!(accounts.is_complete());
    assert_eq!(accounts.items.len(), 3);
    assert_eq!(accounts.items[2].name.as_deref(), Some("Max Mustermann"));

    server.shutdown().await;
}

#[tokio::test]
async fn test_export_workflow() {
    let server = MockServer::start().await;
    let client = client_for(&server);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("new_commits.csv");

    let changes =
        get_resolved_changes(&client, &ChangeQuery::Repo("tools/repo".to_string())).await;
    export_csv(&path, &changes.items).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("owner"));
    assert!(lines[1].contains("Max Mustermann"));

    server.shutdown().await;
}
