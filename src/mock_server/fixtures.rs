//! Test data fixtures for the mock server.
//!
//! Provides factory functions for creating realistic test data.

use super::state::{MockFolder, MockJob, MockState, MockUpload, MockUser};

/// Collection of fixture factories for test data.
pub struct Fixtures;

impl Fixtures {
    /// Login accepted by the default scenario.
    pub const USERNAME: &'static str = "fossy";
    pub const PASSWORD: &'static str = "fossy";

    /// Id of the top-level folder every server has.
    pub const ROOT_FOLDER_ID: u64 = 1;

    // =========================================================================
    // Folder Fixtures
    // =========================================================================

    /// The "Software Repository" root folder.
    pub fn root_folder() -> MockFolder {
        MockFolder {
            id: Self::ROOT_FOLDER_ID,
            name: "Software Repository".to_string(),
            description: "Top Folder".to_string(),
            parent: None,
        }
    }

    /// A folder below `parent`.
    pub fn folder(id: u64, name: &str, parent: u64) -> MockFolder {
        MockFolder {
            id,
            name: name.to_string(),
            description: format!("{} folder", name),
            parent: Some(parent),
        }
    }

    // =========================================================================
    // Upload Fixtures
    // =========================================================================

    /// An upload stored in `folder`.
    pub fn upload(id: u64, folder: &MockFolder, name: &str, file_size: u64) -> MockUpload {
        MockUpload {
            id,
            folder_id: folder.id,
            folder_name: folder.name.clone(),
            description: String::new(),
            upload_name: name.to_string(),
            upload_date: "2024-03-01 09:30:00.000000+00:00".to_string(),
            file_size,
        }
    }

    // =========================================================================
    // User Fixtures
    // =========================================================================

    /// A user with the given access level.
    pub fn user(id: u64, name: &str, access_level: &str) -> MockUser {
        MockUser {
            id,
            name: name.to_string(),
            description: format!("{} account", name),
            email: format!("{}@localhost", name),
            access_level: access_level.to_string(),
            root_folder_id: Self::ROOT_FOLDER_ID,
            email_notification: true,
            agents: serde_json::json!({
                "bucket": true,
                "copyright_email_author": true,
                "ecc": false,
                "keyword": false,
                "mime": false,
                "monk": true,
                "nomos": true,
                "package": false
            }),
        }
    }

    // =========================================================================
    // Job Fixtures
    // =========================================================================

    /// A finished job for `upload`.
    pub fn completed_job(id: u64, upload: &MockUpload) -> MockJob {
        MockJob {
            id,
            name: upload.upload_name.clone(),
            queue_date: "2024-03-01 09:31:00.000000+00:00".to_string(),
            upload_id: upload.id,
            user_id: 1,
            group_id: 1,
            status: "Completed".to_string(),
        }
    }

    // =========================================================================
    // Scenarios
    // =========================================================================

    /// Create the default test scenario.
    pub fn default_scenario() -> DefaultScenario {
        DefaultScenario::new()
    }
}

/// Default test scenario with a small folder tree and a couple of uploads.
pub struct DefaultScenario {
    pub folders: Vec<MockFolder>,
    pub uploads: Vec<MockUpload>,
    pub users: Vec<MockUser>,
    pub jobs: Vec<MockJob>,
}

impl DefaultScenario {
    /// Create the default scenario.
    pub fn new() -> Self {
        let root = Fixtures::root_folder();
        let projects = Fixtures::folder(2, "Projects", root.id);

        let zlib = Fixtures::upload(1, &root, "zlib-1.2.11.tar.gz", 607_698);
        let openssl = Fixtures::upload(2, &projects, "openssl-3.0.0.tar.gz", 14_978_663);

        Self {
            users: vec![
                Fixtures::user(1, Fixtures::USERNAME, "admin"),
                Fixtures::user(2, "reviewer", "read_write"),
            ],
            jobs: vec![Fixtures::completed_job(1, &zlib)],
            uploads: vec![zlib, openssl],
            folders: vec![root, projects],
        }
    }

    /// Load the scenario into a fresh state.
    pub fn into_state(self) -> MockState {
        let state = MockState::new().with_account(Fixtures::USERNAME, Fixtures::PASSWORD);
        let state = self.folders.into_iter().fold(state, MockState::with_folder);
        let state = self.uploads.into_iter().fold(state, MockState::with_upload);
        let state = self.users.into_iter().fold(state, MockState::with_user);
        self.jobs.into_iter().fold(state, MockState::with_job)
    }
}

impl Default for DefaultScenario {
    fn default() -> Self {
        Self::new()
    }
}
