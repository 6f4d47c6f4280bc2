//! Mock server state management.
//!
//! Provides the in-memory data store for the mock FOSSology server. Records
//! serialize to the same JSON shapes the real server emits.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;

/// Upload record as served by `GET /uploads`.
#[derive(Debug, Clone, Serialize)]
pub struct MockUpload {
    pub id: u64,
    #[serde(rename = "folderid")]
    pub folder_id: u64,
    #[serde(rename = "foldername")]
    pub folder_name: String,
    pub description: String,
    #[serde(rename = "uploadname")]
    pub upload_name: String,
    #[serde(rename = "uploaddate")]
    pub upload_date: String,
    #[serde(rename = "filesize")]
    pub file_size: u64,
}

/// Folder record as served by `GET /folders`.
#[derive(Debug, Clone, Serialize)]
pub struct MockFolder {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub parent: Option<u64>,
}

/// User record as served by `GET /users`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MockUser {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub email: String,
    pub access_level: String,
    pub root_folder_id: u64,
    pub email_notification: bool,
    pub agents: serde_json::Value,
}

/// Job record as served by `GET /jobs`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MockJob {
    pub id: u64,
    pub name: String,
    pub queue_date: String,
    pub upload_id: u64,
    pub user_id: u64,
    pub group_id: u64,
    pub status: String,
}

/// A requested report.
#[derive(Debug, Clone)]
pub struct MockReport {
    pub id: u64,
    pub upload_id: u64,
    pub format: String,
    /// Downloads answered with 503 before the report becomes available.
    pub pending_polls: u32,
}

/// Outcome of polling a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportPoll {
    NotFound,
    Pending,
    Ready { filename: String, content: String },
}

/// Shared state for the mock server.
///
/// Wrapped in `Arc<RwLock<_>>` for concurrent access from handlers.
#[derive(Debug, Default)]
pub struct MockState {
    pub uploads: BTreeMap<u64, MockUpload>,
    pub folders: BTreeMap<u64, MockFolder>,
    pub users: BTreeMap<u64, MockUser>,
    pub jobs: BTreeMap<u64, MockJob>,
    pub reports: BTreeMap<u64, MockReport>,

    /// Accepted logins, username to password.
    pub accounts: HashMap<String, String>,

    /// `Authorization` header values handed out by `POST /tokens`.
    pub issued_tokens: Vec<String>,

    /// How many 503 answers a new report gets before it is ready.
    pub report_delay: u32,

    next_id: u64,
}

impl MockState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self {
            next_id: 100,
            ..Default::default()
        }
    }

    /// Create state wrapped in Arc<RwLock> for sharing.
    pub fn shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    /// Accept a login.
    pub fn with_account(mut self, username: &str, password: &str) -> Self {
        self.accounts
            .insert(username.to_string(), password.to_string());
        self
    }

    pub fn with_folder(mut self, folder: MockFolder) -> Self {
        self.folders.insert(folder.id, folder);
        self
    }

    pub fn with_upload(mut self, upload: MockUpload) -> Self {
        self.uploads.insert(upload.id, upload);
        self
    }

    pub fn with_user(mut self, user: MockUser) -> Self {
        self.users.insert(user.id, user);
        self
    }

    pub fn with_job(mut self, job: MockJob) -> Self {
        self.jobs.insert(job.id, job);
        self
    }

    /// Answer this many report downloads with 503 before serving them.
    pub fn with_report_delay(mut self, polls: u32) -> Self {
        self.report_delay = polls;
        self
    }

    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Check a login and issue a token.
    pub fn issue_token(&mut self, username: &str, password: &str) -> Option<String> {
        if self.accounts.get(username).map(String::as_str) != Some(password) {
            return None;
        }
        let token = format!("Bearer {}", uuid::Uuid::new_v4());
        self.issued_tokens.push(token.clone());
        Some(token)
    }

    /// Whether an `Authorization` header value was issued by this server.
    pub fn is_authorized(&self, authorization: Option<&str>) -> bool {
        authorization.is_some_and(|value| self.issued_tokens.iter().any(|t| t == value))
    }

    /// Store a new upload and return its id.
    pub fn add_upload(
        &mut self,
        folder_id: u64,
        upload_name: &str,
        description: &str,
        file_size: u64,
    ) -> Option<u64> {
        let folder_name = self.folders.get(&folder_id)?.name.clone();
        let id = self.allocate_id();
        self.uploads.insert(
            id,
            MockUpload {
                id,
                folder_id,
                folder_name,
                description: description.to_string(),
                upload_name: upload_name.to_string(),
                upload_date: chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.f%:z").to_string(),
                file_size,
            },
        );
        Some(id)
    }

    /// Move an upload; `false` if either side is unknown.
    pub fn move_upload(&mut self, upload_id: u64, folder_id: u64) -> bool {
        let Some(folder_name) = self.folders.get(&folder_id).map(|f| f.name.clone()) else {
            return false;
        };
        match self.uploads.get_mut(&upload_id) {
            Some(upload) => {
                upload.folder_id = folder_id;
                upload.folder_name = folder_name;
                true
            }
            None => false,
        }
    }

    /// Copy an upload into another folder; returns the copy's id.
    pub fn copy_upload(&mut self, upload_id: u64, folder_id: u64) -> Option<u64> {
        let upload = self.uploads.get(&upload_id)?.clone();
        self.add_upload(
            folder_id,
            &upload.upload_name,
            &upload.description,
            upload.file_size,
        )
    }

    /// Create a folder; `Err(())` if the parent is unknown, `Ok(None)` if
    /// the name is taken under that parent.
    #[allow(clippy::result_unit_err)]
    pub fn create_folder(
        &mut self,
        parent: u64,
        name: &str,
        description: &str,
    ) -> Result<Option<u64>, ()> {
        if !self.folders.contains_key(&parent) {
            return Err(());
        }
        if self
            .folders
            .values()
            .any(|f| f.parent == Some(parent) && f.name == name)
        {
            return Ok(None);
        }
        let id = self.allocate_id();
        self.folders.insert(
            id,
            MockFolder {
                id,
                name: name.to_string(),
                description: description.to_string(),
                parent: Some(parent),
            },
        );
        Ok(Some(id))
    }

    /// Move or copy a folder under a new parent.
    pub fn relocate_folder(&mut self, folder_id: u64, parent: u64, copy: bool) -> bool {
        if !self.folders.contains_key(&parent) {
            return false;
        }
        if copy {
            let Some(source) = self.folders.get(&folder_id).cloned() else {
                return false;
            };
            let id = self.allocate_id();
            self.folders.insert(
                id,
                MockFolder {
                    id,
                    parent: Some(parent),
                    ..source
                },
            );
            return true;
        }
        match self.folders.get_mut(&folder_id) {
            Some(folder) => {
                folder.parent = Some(parent);
                true
            }
            None => false,
        }
    }

    /// Queue a job for an upload; returns the job id.
    pub fn schedule_job(&mut self, upload_id: u64) -> Option<u64> {
        let name = self.uploads.get(&upload_id)?.upload_name.clone();
        let id = self.allocate_id();
        self.jobs.insert(
            id,
            MockJob {
                id,
                name,
                queue_date: chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.f%:z").to_string(),
                upload_id,
                user_id: 1,
                group_id: 1,
                status: "Queued".to_string(),
            },
        );
        Some(id)
    }

    /// Record a report request; returns the report id.
    pub fn request_report(&mut self, upload_id: u64, format: &str) -> Option<u64> {
        if !self.uploads.contains_key(&upload_id) {
            return None;
        }
        let id = self.allocate_id();
        self.reports.insert(
            id,
            MockReport {
                id,
                upload_id,
                format: format.to_string(),
                pending_polls: self.report_delay,
            },
        );
        Some(id)
    }

    /// Poll a report, counting down its pending answers.
    pub fn poll_report(&mut self, report_id: u64) -> ReportPoll {
        let Some(report) = self.reports.get_mut(&report_id) else {
            return ReportPoll::NotFound;
        };
        if report.pending_polls > 0 {
            report.pending_polls -= 1;
            return ReportPoll::Pending;
        }

        let upload_name = self
            .uploads
            .get(&report.upload_id)
            .map(|u| u.upload_name.as_str())
            .unwrap_or("upload");
        ReportPoll::Ready {
            filename: format!("{}_{}.txt", report.format, upload_name),
            content: format!(
                "{} report for upload {} ({})\n",
                report.format, report.upload_id, upload_name
            ),
        }
    }

    /// Uploads whose name matches a `%`-wildcard pattern, case-insensitive.
    pub fn search(&self, pattern: Option<&str>) -> Vec<&MockUpload> {
        let needles: Vec<String> = pattern
            .unwrap_or_default()
            .to_lowercase()
            .split('%')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        self.uploads
            .values()
            .filter(|u| {
                let name = u.upload_name.to_lowercase();
                needles.iter().all(|n| name.contains(n.as_str()))
            })
            .collect()
    }
}
