//! Folder model and trait implementations.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use super::{created_id, de, fetch_many, fetch_one, has_status, Info};
use crate::connection::Connection;
use crate::error::{FossologyError, Result};
use crate::traits::{Delete, Get, List};

const ENDPOINT: &str = "folders";

/// A folder on the server.
///
/// Name and description are last-known values, updated locally after a
/// successful [`Folder::rename`] or [`Folder::edit_description`].
#[derive(Debug, Clone, Serialize)]
pub struct Folder {
    id: String,
    name: Option<String>,
    description: Option<String>,
    parent: Option<String>,
    #[serde(skip)]
    connection: Connection,
}

#[derive(Debug, Clone, Deserialize)]
struct FolderRecord {
    #[serde(deserialize_with = "de::id")]
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, deserialize_with = "de::opt_id")]
    parent: Option<String>,
}

impl FolderRecord {
    fn into_folder(self, connection: &Connection) -> Folder {
        Folder {
            id: self.id,
            name: self.name,
            description: self.description,
            parent: self.parent,
            connection: connection.clone(),
        }
    }
}

/// What [`Folder::move_to`] and [`Folder::copy_to`] send as `action`.
#[derive(Debug, Clone, Copy)]
enum Action {
    Move,
    Copy,
}

impl Action {
    fn as_str(self) -> &'static str {
        match self {
            Action::Move => "move",
            Action::Copy => "copy",
        }
    }
}

impl Folder {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Parent folder id; `None` for the root folder.
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Create a folder inside this one.
    ///
    /// # Errors
    ///
    /// Anything but 201 is an error. FOSSology answers 200 when a folder
    /// of that name already exists under this parent; that is reported as
    /// [`FossologyError::Server`] with code 200.
    #[tracing::instrument(skip(self), fields(parent = %self.id))]
    pub async fn create_child_folder(&self, name: &str, description: Option<&str>) -> Result<Folder> {
        let mut headers = vec![("parentFolder", self.id.as_str()), ("folderName", name)];
        if let Some(description) = description {
            headers.push(("folderDescription", description));
        }

        let response = self.connection.post(&[ENDPOINT], &headers).await?;
        let status = response.status();
        let info = Info::from_response(response).await;

        if status != StatusCode::CREATED {
            tracing::warn!(status = status.as_u16(), message = info.message(), "Folder not created");
            return Err(FossologyError::server(
                status.as_u16(),
                info.message(),
                info.info_type(),
            ));
        }

        let id = created_id(&info, "create folder")?;
        tracing::info!(folder_id = %id, "Folder created");
        Ok(Folder {
            id,
            name: Some(name.to_string()),
            description: description.map(str::to_string),
            parent: Some(self.id.clone()),
            connection: self.connection.clone(),
        })
    }

    /// Move this folder under `parent`.
    pub async fn move_to(&self, parent: &Folder) -> Result<bool> {
        self.relocate(parent, Action::Move).await
    }

    /// Copy this folder under `parent`.
    pub async fn copy_to(&self, parent: &Folder) -> Result<bool> {
        self.relocate(parent, Action::Copy).await
    }

    async fn relocate(&self, parent: &Folder, action: Action) -> Result<bool> {
        let response = self
            .connection
            .put(
                &[ENDPOINT, self.id.as_str()],
                &[("parent", parent.id()), ("action", action.as_str())],
            )
            .await?;
        Ok(has_status(&response, StatusCode::ACCEPTED, action.as_str()))
    }

    /// Rename this folder. On 200 the local name follows.
    pub async fn rename(&mut self, name: &str) -> Result<bool> {
        let response = self
            .connection
            .patch(&[ENDPOINT, self.id.as_str()], &[("name", name)])
            .await?;
        if !has_status(&response, StatusCode::OK, "rename folder") {
            return Ok(false);
        }
        self.name = Some(name.to_string());
        Ok(true)
    }

    /// Replace this folder's description. On 200 the local copy follows.
    pub async fn edit_description(&mut self, description: &str) -> Result<bool> {
        let response = self
            .connection
            .patch(&[ENDPOINT, self.id.as_str()], &[("description", description)])
            .await?;
        if !has_status(&response, StatusCode::OK, "edit folder description") {
            return Ok(false);
        }
        self.description = Some(description.to_string());
        Ok(true)
    }

    /// Re-read this folder from the server.
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
impl Get for Folder {
    type Id = str;

    #[tracing::instrument(skip(connection))]
    async fn get(connection: &Connection, id: &str) -> Result<Option<Self>> {
        let record: Option<FolderRecord> = fetch_one(connection, &[ENDPOINT, id], &[]).await?;
        Ok(record.map(|r| r.into_folder(connection)))
    }
}

#[async_trait]
impl List for Folder {
    type Query = ();

    #[tracing::instrument(skip(connection))]
    async fn list(connection: &Connection, _query: &()) -> Result<Vec<Self>> {
        let records: Vec<FolderRecord> = fetch_many(connection, &[ENDPOINT], &[]).await?;
        Ok(records.into_iter().map(|r| r.into_folder(connection)).collect())
    }
}

#[async_trait]
impl Delete for Folder {
    #[tracing::instrument(skip(self), fields(folder_id = %self.id))]
    async fn delete(&self) -> Result<bool> {
        let response = self.connection.delete(&[ENDPOINT, self.id.as_str()], &[]).await?;
        Ok(has_status(&response, StatusCode::ACCEPTED, "delete folder"))
    }
}
