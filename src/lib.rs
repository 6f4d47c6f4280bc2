//! FOSSology API client library.
//!
//! A thin async client for the FOSSology REST API. A [`Fossology`] client
//! logs in on construction and returns resource objects ([`Upload`],
//! [`Folder`], [`User`], [`Job`], [`Report`]) that carry the same
//! [`Connection`] and can act on themselves.
//!
//! # Quick Start
//!
//! ```no_run
//! use fossology::{AgentSpec, Fossology, ReportFormat, Visibility};
//!
//! #[tokio::main]
//! async fn main() -> fossology::Result<()> {
//!     // Log in using FOSSOLOGY_* environment variables
//!     let client = Fossology::from_env().await?;
//!
//!     // Upload a package into the root folder
//!     let root = client.get_folder("1").await?.expect("root folder");
//!     let upload = client
//!         .create_upload(&root, "zlib.tar.gz".as_ref(), Some("zlib"), Visibility::Public)
//!         .await?
//!         .expect("upload created");
//!
//!     // Scan it and fetch an SPDX report
//!     upload.schedule_agents(&AgentSpec::all()).await?;
//!     if let Some(report) = upload.request_report(ReportFormat::Spdx2).await? {
//!         let path = report.download(None).await?;
//!         println!("Report written to {}", path.display());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`Connection`] - HTTP session, token header and error translation
//! - [`Get`], [`List`], [`Delete`] - operations each resource type
//!   implements when its endpoints support them
//! - [`Fossology`] - facade that owns the connection and delegates to the
//!   traits
//!
//! Every 400–599 answer becomes a [`FossologyError`]. Operations with a
//! specific success code (202 for deletes, 201 for creations, ...) return
//! `false`/`None` for other non-error answers.
//!
//! # Configuration
//!
//! [`FossologyConfig::from_env`] reads:
//!
//! - `FOSSOLOGY_URL` (required) - Server address
//! - `FOSSOLOGY_USERNAME`, `FOSSOLOGY_PASSWORD` (required)
//! - `FOSSOLOGY_TOKEN_EXPIRE` (required) - Token expiry, `YYYY-MM-DD`
//! - `FOSSOLOGY_TOKEN_NAME`, `FOSSOLOGY_TOKEN_SCOPE`,
//!   `FOSSOLOGY_TIMEOUT_SECS` (optional)

mod client;
mod connection;
mod error;
mod models;
mod traits;

#[cfg(feature = "test-server")]
pub mod mock_server;

// Re-export core types
pub use client::{api_url, Credentials, Fossology, FossologyConfig, TokenScope, API_PATH};
pub use connection::{Connection, Headers, DEFAULT_DOWNLOAD_NAME, UPLOAD_FIELD};
pub use error::{FossologyError, Result};

// Re-export traits
pub use traits::{Delete, Get, List};

// Re-export models
pub use models::{
    // Uploads
    AgentSpec,
    Analysis,
    Decider,
    Reuse,
    Upload,
    Visibility,
    // Folders
    Folder,
    // Users and jobs
    Job,
    JobListQuery,
    User,
    // Reports
    Report,
    ReportFormat,
    // Search
    SearchQuery,
    SearchResult,
    SearchType,
    // Status envelope
    Info,
};
