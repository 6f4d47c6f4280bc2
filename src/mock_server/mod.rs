//! Mock FOSSology server for E2E testing.
//!
//! This module provides an in-memory mock server that simulates the FOSSology
//! REST API for integration and end-to-end testing. Unlike wiremock which
//! mocks at the HTTP level per-test, this server maintains state across
//! requests, enabling realistic workflow testing.
//!
//! # Example
//!
//! ```ignore
//! use fossology::mock_server::{Fixtures, MockServer};
//! use fossology::{Credentials, Fossology};
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await;
//!     let expire = chrono::NaiveDate::from_ymd_opt(2099, 1, 1).unwrap();
//!     let credentials = Credentials::new(Fixtures::USERNAME, Fixtures::PASSWORD, expire);
//!     let client = Fossology::connect(server.url(), &credentials).await.unwrap();
//!
//!     // Server comes with default fixtures
//!     let root = client.get_folder("1").await.unwrap().unwrap();
//!     assert_eq!(root.name(), Some("Software Repository"));
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
pub use state::{MockFolder, MockJob, MockReport, MockState, MockUpload, MockUser, ReportPoll};
