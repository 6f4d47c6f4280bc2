//! Mock FOSSology server.
//!
//! Provides an axum-based HTTP server that simulates the FOSSology REST API.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use super::fixtures::Fixtures;
use super::handlers;
use super::state::MockState;

/// A mock FOSSology server for testing.
///
/// The server runs in the background and can be used to test the client
/// against a stateful API implementation.
pub struct MockServer {
    /// Server root, without the API path.
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
    pub async fn start() -> Self {
        Self::with_state(Fixtures::default_scenario().into_state()).await
    }

    /// Start a mock server with only the root folder and the default login.
    pub async fn start_empty() -> Self {
        let state = MockState::new()
            .with_account(Fixtures::USERNAME, Fixtures::PASSWORD)
            .with_folder(Fixtures::root_folder());
        Self::with_state(state).await
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

        tracing::debug!(%addr, "Mock FOSSology server started");
        Self {
            url: format!("http://{}", addr),
            handle,
            state: shared_state,
        }
    }

    /// The server address to pass to [`crate::Fossology::connect`].
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get access to the server's shared state.
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

    fn create_router(state: Arc<RwLock<MockState>>) -> Router {
        let api = Router::new()
            .route("/tokens", post(handlers::create_token))
            // Uploads
            .route(
                "/uploads",
                get(handlers::list_uploads).post(handlers::create_upload),
            )
            .route(
                "/uploads/:id",
                get(handlers::get_upload)
                    .patch(handlers::move_upload)
                    .put(handlers::copy_upload)
                    .delete(handlers::delete_upload),
            )
            // Folders
            .route(
                "/folders",
                get(handlers::list_folders).post(handlers::create_folder),
            )
            .route(
                "/folders/:id",
                get(handlers::get_folder)
                    .put(handlers::relocate_folder)
                    .patch(handlers::edit_folder)
                    .delete(handlers::delete_folder),
            )
            // Users
            .route("/users", get(handlers::list_users))
            .route(
                "/users/:id",
                get(handlers::get_user).delete(handlers::delete_user),
            )
            // Jobs
            .route(
                "/jobs",
                get(handlers::list_jobs).post(handlers::schedule_job),
            )
            .route("/jobs/:id", get(handlers::get_job))
            // Reports
            .route("/report", get(handlers::request_report))
            .route("/report/:id", get(handlers::download_report))
            // Search
            .route("/search", get(handlers::search));

        Router::new()
            .nest("/api/v1", api)
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
    use crate::{Credentials, Fossology, FossologyError};

    fn credentials() -> Credentials {
        let expire = chrono::NaiveDate::from_ymd_opt(2099, 1, 1).unwrap();
        Credentials::new(Fixtures::USERNAME, Fixtures::PASSWORD, expire)
    }

    #[tokio::test]
    async fn test_server_starts_and_responds() {
        let server = MockServer::start().await;

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
    async fn test_requests_without_token_are_forbidden() {
        let server = MockServer::start().await;

        let response = reqwest::Client::new()
            .get(format!("{}/api/v1/uploads", server.url()))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::FORBIDDEN);

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_connect_and_list_uploads() {
        let server = MockServer::start().await;
        let client = Fossology::connect(server.url(), &credentials())
            .await
            .expect("Failed to connect");

        let uploads = client.list_uploads().await.unwrap();
        assert_eq!(uploads.len(), 2);
        assert_eq!(uploads[0].name(), Some("zlib-1.2.11.tar.gz"));

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_wrong_password_is_invalid_credentials() {
        let server = MockServer::start().await;
        let expire = chrono::NaiveDate::from_ymd_opt(2099, 1, 1).unwrap();
        let bad = Credentials::new(Fixtures::USERNAME, "nope", expire);

        let err = Fossology::connect(server.url(), &bad).await.unwrap_err();
        assert!(matches!(err, FossologyError::InvalidCredentials));

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_custom_state() {
        let root = Fixtures::root_folder();
        let state = MockState::new()
            .with_account("alice", "secret")
            .with_upload(Fixtures::upload(9, &root, "busybox.tar.bz2", 42))
            .with_folder(root);

        let server = MockServer::with_state(state).await;
        let expire = chrono::NaiveDate::from_ymd_opt(2099, 1, 1).unwrap();
        let client = Fossology::connect(server.url(), &Credentials::new("alice", "secret", expire))
            .await
            .unwrap();

        let upload = client.get_upload("9").await.unwrap().unwrap();
        assert_eq!(upload.file_size(), Some(42));

        server.shutdown().await;
    }
}
