//! Upload model and trait implementations.

use std::path::Path;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use super::{
    created_id, de, fetch_many, fetch_one, has_status, Folder, Info, Job, Report, ReportFormat,
};
use crate::connection::Connection;
use crate::error::Result;
use crate::traits::{Delete, Get, List};

const ENDPOINT: &str = "uploads";

/// Who can see a new upload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

impl Visibility {
    /// Value sent in the `public` header.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Protected => "protected",
            Self::Private => "private",
        }
    }
}

/// An uploaded package on the server.
///
/// The id is fixed at construction. Folder fields are last-known values:
/// they change locally after [`Upload::move_to`] succeeds and are only
/// re-read from the server by [`Upload::refresh`].
#[derive(Debug, Clone, Serialize)]
pub struct Upload {
    id: String,
    folder_id: Option<String>,
    folder_name: Option<String>,
    description: Option<String>,
    upload_name: Option<String>,
    upload_date: Option<String>,
    file_size: Option<u64>,
    #[serde(skip)]
    connection: Connection,
}

/// Upload as it appears on the wire.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct UploadRecord {
    #[serde(deserialize_with = "de::id")]
    id: String,
    #[serde(rename = "folderid", default, deserialize_with = "de::opt_id")]
    folder_id: Option<String>,
    #[serde(rename = "foldername", default)]
    folder_name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(rename = "uploadname", default)]
    upload_name: Option<String>,
    #[serde(rename = "uploaddate", default)]
    upload_date: Option<String>,
    #[serde(rename = "filesize", default, deserialize_with = "de::opt_u64")]
    file_size: Option<u64>,
}

impl UploadRecord {
    pub(crate) fn into_upload(self, connection: &Connection) -> Upload {
        Upload {
            id: self.id,
            folder_id: self.folder_id,
            folder_name: self.folder_name,
            description: self.description,
            upload_name: self.upload_name,
            upload_date: self.upload_date,
            file_size: self.file_size,
            connection: connection.clone(),
        }
    }
}

impl Upload {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Last-known id of the containing folder.
    pub fn folder_id(&self) -> Option<&str> {
        self.folder_id.as_deref()
    }

    /// Last-known name of the containing folder.
    pub fn folder_name(&self) -> Option<&str> {
        self.folder_name.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The upload's display name (usually the uploaded file name).
    pub fn name(&self) -> Option<&str> {
        self.upload_name.as_deref()
    }

    /// Creation timestamp as reported by the server.
    pub fn upload_date(&self) -> Option<&str> {
        self.upload_date.as_deref()
    }

    /// Size in bytes.
    pub fn file_size(&self) -> Option<u64> {
        self.file_size
    }

    /// Upload a file and fetch the stored result.
    ///
    /// The POST answers 201 with the new id in `message`; the returned
    /// upload is populated from a follow-up GET of that id. Any other
    /// non-error answer yields `Ok(None)`.
    #[tracing::instrument(skip(connection, folder), fields(folder = folder.id()))]
    pub async fn create(
        connection: &Connection,
        folder: &Folder,
        file: &Path,
        description: Option<&str>,
        visibility: Visibility,
    ) -> Result<Option<Self>> {
        let mut headers = vec![("folderId", folder.id()), ("public", visibility.as_str())];
        if let Some(description) = description {
            headers.push(("uploadDescription", description));
        }

        let response = connection.upload_file(&[ENDPOINT], file, &headers).await?;
        if !has_status(&response, StatusCode::CREATED, "create upload") {
            return Ok(None);
        }

        let info = Info::from_response(response).await;
        let id = created_id(&info, "create upload")?;
        tracing::info!(upload_id = %id, "Upload created");
        Self::get(connection, &id).await
    }

    /// Move this upload into `folder`.
    ///
    /// On 202 the local folder fields take the target's values.
    pub async fn move_to(&mut self, folder: &Folder) -> Result<bool> {
        let response = self
            .connection
            .patch(&[ENDPOINT, self.id.as_str()], &[("folderId", folder.id())])
            .await?;
        if !has_status(&response, StatusCode::ACCEPTED, "move upload") {
            return Ok(false);
        }

        self.folder_id = Some(folder.id().to_string());
        self.folder_name = folder.name().map(str::to_string);
        tracing::info!(upload_id = %self.id, folder_id = folder.id(), "Upload moved");
        Ok(true)
    }

    /// Copy this upload into `folder`.
    pub async fn copy_to(&self, folder: &Folder) -> Result<bool> {
        let response = self
            .connection
            .put(&[ENDPOINT, self.id.as_str()], &[("folderId", folder.id())])
            .await?;
        Ok(has_status(&response, StatusCode::ACCEPTED, "copy upload"))
    }

    /// Schedule analysis agents on this upload.
    ///
    /// On 201 the job is built from the id in `message`. Its other fields
    /// are filled in by a follow-up GET when that succeeds and left unset
    /// otherwise.
    pub async fn schedule_agents(&self, spec: &AgentSpec) -> Result<Option<Job>> {
        let mut headers = vec![("uploadId", self.id.as_str())];
        if let Some(folder_id) = self.folder_id.as_deref() {
            headers.push(("folderId", folder_id));
        }

        let response = self
            .connection
            .post_json(&["jobs"], &headers, spec)
            .await?;
        if !has_status(&response, StatusCode::CREATED, "schedule agents") {
            return Ok(None);
        }

        let info = Info::from_response(response).await;
        let job_id = created_id(&info, "schedule agents")?;
        tracing::info!(upload_id = %self.id, job_id = %job_id, "Agents scheduled");

        // Job details are best effort; the id is already known.
        let mut job = Job::scheduled(job_id, self.connection.clone());
        if let Err(err) = job.refresh().await {
            tracing::warn!(job_id = job.id(), error = %err, "Could not fetch scheduled job");
        }
        Ok(Some(job))
    }

    /// Ask the server to generate a report for this upload.
    ///
    /// On 201 the report id is the last path segment of the `message`
    /// field (a download URL).
    pub async fn request_report(&self, format: ReportFormat) -> Result<Option<Report>> {
        let response = self
            .connection
            .get(
                &["report"],
                &[("uploadId", self.id.as_str()), ("reportFormat", format.as_str())],
            )
            .await?;
        if !has_status(&response, StatusCode::CREATED, "request report") {
            return Ok(None);
        }

        let info = Info::from_response(response).await;
        let report_id = info
            .message()
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default();
        tracing::info!(upload_id = %self.id, report_id, %format, "Report requested");
        Ok(Some(Report::new(
            report_id.to_string(),
            format,
            self.connection.clone(),
        )))
    }

    /// Re-read this upload from the server.
    ///
    /// Returns `Ok(false)` and keeps the local fields when the server does
    /// not return the upload.
    pub async fn refresh(&mut self) -> Result<bool> {
        match Self::get(&self.connection, &self.id).await? {
            Some(fresh) => {
                *self = fresh;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl Get for Upload {
    type Id = str;

    #[tracing::instrument(skip(connection))]
    async fn get(connection: &Connection, id: &str) -> Result<Option<Self>> {
        let record: Option<UploadRecord> = fetch_one(connection, &[ENDPOINT, id], &[]).await?;
        Ok(record.map(|r| r.into_upload(connection)))
    }
}

#[async_trait]
impl List for Upload {
    type Query = ();

    #[tracing::instrument(skip(connection))]
    async fn list(connection: &Connection, _query: &()) -> Result<Vec<Self>> {
        let records: Vec<UploadRecord> = fetch_many(connection, &[ENDPOINT], &[]).await?;
        Ok(records.into_iter().map(|r| r.into_upload(connection)).collect())
    }
}

#[async_trait]
impl Delete for Upload {
    #[tracing::instrument(skip(self), fields(upload_id = %self.id))]
    async fn delete(&self) -> Result<bool> {
        let response = self.connection.delete(&[ENDPOINT, self.id.as_str()], &[]).await?;
        Ok(has_status(&response, StatusCode::ACCEPTED, "delete upload"))
    }
}

/// Analysis agents to run on an upload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSpec {
    pub analysis: Analysis,
    pub decider: Decider,
    pub reuse: Reuse,
}

impl AgentSpec {
    /// Every analysis agent enabled, no deciders, no reuse.
    pub fn all() -> Self {
        Self {
            analysis: Analysis {
                bucket: true,
                copyright_email_author: true,
                ecc: true,
                keyword: true,
                mime: true,
                monk: true,
                nomos: true,
                package: true,
            },
            ..Default::default()
        }
    }
}

/// Scanner agents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    pub bucket: bool,
    pub copyright_email_author: bool,
    pub ecc: bool,
    pub keyword: bool,
    pub mime: bool,
    pub monk: bool,
    pub nomos: bool,
    pub package: bool,
}

/// Automatic conclusion agents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decider {
    pub nomos_monk: bool,
    pub bulk_reused: bool,
    pub new_scanner: bool,
}

/// Reuse of earlier clearing decisions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reuse {
    /// Upload whose decisions are reused; 0 for none.
    pub reuse_upload: u64,
    /// Group whose decisions are reused; 0 for none.
    pub reuse_group: u64,
    pub reuse_main: bool,
    pub reuse_enhanced: bool,
}
