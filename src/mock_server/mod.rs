//! Mock Gerrit server for E2E testing.
//!
//! This module provides an in-memory mock server that simulates the Gerrit
//! REST API for integration and end-to-end testing. Unlike wiremock which
//! mocks at the HTTP level per-test, this server maintains state across
//! requests and paginates like Gerrit does: bodies carry the `)]}'`
//! envelope and truncated pages end with a `_more_*` marker.
//!
//! # Example
//!
//! ```ignore
//! use gerritapi::mock_server::MockServer;
//! use gerritapi::{get_active_projects, GerritClient, GerritConfig};
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await;
//!     let client = GerritClient::new(&GerritConfig::new(server.url())).unwrap();
//!
//!     // Server comes with default fixtures
//!     let projects = get_active_projects(&client).await;
//!     assert_eq!(projects.items.len(), 2);
//!
//!     server.shutdown().await;
//! }
//! ```

mod fixtures;
mod handlers;
mod server;
mod state;

pub use fixtures::{DefaultScenario, Fixtures};
pub use server::MockServer;
pub use state::{MockState, DEFAULT_SERVER_LIMIT};
