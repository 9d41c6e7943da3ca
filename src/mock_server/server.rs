//! Mock Gerrit server.
//!
//! Provides an axum-based HTTP server that simulates the Gerrit REST API.

use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use super::fixtures::{DefaultScenario, Fixtures};
use super::handlers;
use super::state::MockState;

/// A mock Gerrit server for testing.
///
/// The server runs in the background and can be used to test the Gerrit
/// client against a realistic API implementation.
pub struct MockServer {
    /// The URL where the server is listening.
    url: String,
    /// Handle to the server task.
    handle: JoinHandle<()>,
    /// Shared state that can be modified during tests.
    state: Arc<RwLock<MockState>>,
}

impl MockServer {
    /// Start a new mock server with default fixtures.
    ///
    /// The server listens on a random available port and returns immediately.
    /// Use `url()` to get the server's base URL.
    pub async fn start() -> Self {
        Self::with_state(Self::default_state()).await
    }

    /// Start a mock server with empty state.
    ///
    /// Useful when you want to control exactly what data is available.
    pub async fn start_empty() -> Self {
        Self::with_state(MockState::new()).await
    }

    /// Start a mock server with custom state.
    pub async fn with_state(state: MockState) -> Self {
        let shared_state = state.shared();
        let app = Self::create_router(shared_state.clone());

        // Bind to a random available port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to address");
        let addr = listener.local_addr().expect("Failed to get local address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server error");
        });

        Self {
            url: format!("http://{}", addr),
            handle,
            state: shared_state,
        }
    }

    /// Get the base URL of the mock server.
    ///
    /// Use this URL as the server when creating a `GerritClient` for testing.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get access to the server's shared state.
    ///
    /// This allows modifying the mock data during a test.
    pub fn state(&self) -> Arc<RwLock<MockState>> {
        self.state.clone()
    }

    /// Shutdown the server.
    ///
    /// This aborts the server task. It's safe to call multiple times.
    pub async fn shutdown(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }

    /// Create the default state with common test fixtures.
    fn default_state() -> MockState {
        Self::state_from_scenario(Fixtures::default_scenario())
    }

    /// Create state from a scenario.
    fn state_from_scenario(scenario: DefaultScenario) -> MockState {
        let mut state = MockState::new();

        for (name, project) in scenario.projects {
            state.projects.insert(name, project);
        }

        for account in scenario.accounts {
            state.accounts.insert(account.account_id, account);
        }

        state.changes = scenario.changes;
        state
    }

    /// Create the axum router with all routes.
    fn create_router(state: Arc<RwLock<MockState>>) -> Router {
        Router::new()
            // Project routes
            .route("/projects/", get(handlers::list_projects))
            .route("/projects/:name", get(handlers::get_project))
            // Change routes
            .route("/changes/", get(handlers::query_changes))
            // Account routes
            .route("/accounts/", get(handlers::query_accounts))
            .route("/accounts/:id/detail", get(handlers::get_account_detail))
            // Health check
            .route("/health", get(health_check))
            .with_state(state)
    }
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{get_projects, AccountDetail, GerritClient, GerritConfig, Get};

    fn client_for(server: &MockServer) -> GerritClient {
        GerritClient::new(&GerritConfig::new(server.url())).unwrap()
    }

    #[tokio::test]
    async fn test_server_starts_and_responds() {
        let server = MockServer::start().await;

        // Server should be accessible
        let client = reqwest::Client::new();
        let response = client
            .get(format!("{}/health", server.url()))
            .send()
            .await
            .expect("Failed to send request");

        assert!(response.status().is_success());
        assert_eq!(response.text().await.unwrap(), "ok");

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_responses_carry_envelope() {
        let server = MockServer::start().await;

        let body = reqwest::get(format!("{}/projects/?d", server.url()))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();

        assert!(body.starts_with(")]}'\n{"));

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_get_account_with_gerrit_client() {
        let server = MockServer::start().await;
        let client = client_for(&server);

        let account = AccountDetail::get(&client, 1000001)
            .await
            .expect("Failed to get account");

        assert_eq!(account.name.as_deref(), Some("Jane Doe"));

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_list_projects_with_gerrit_client() {
        let server = MockServer::start().await;
        let client = client_for(&server);

        let projects = get_projects(&client).await;

        assert!(projects.is_complete());
        assert_eq!(projects.items.len(), 3);

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_empty_server() {
        let server = MockServer::start_empty().await;
        let client = client_for(&server);

        let result = AccountDetail::get(&client, 1).await;

        assert!(result.is_err());

        server.shutdown().await;
    }
}
