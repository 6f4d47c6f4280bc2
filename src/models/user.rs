//! User model and trait implementations.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use super::{de, fetch_many, fetch_one, has_status};
use crate::connection::Connection;
use crate::error::Result;
use crate::traits::{Delete, Get, List};

const ENDPOINT: &str = "users";

/// A user account on the server.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub email: Option<String>,
    /// e.g. `admin`, `read_write`, `read_only`, `none`.
    pub access_level: Option<String>,
    pub root_folder_id: Option<String>,
    pub email_notification: Option<bool>,
    /// Default agents selected for this user's uploads.
    pub agents: Option<serde_json::Value>,
    #[serde(skip)]
    connection: Connection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserRecord {
    #[serde(deserialize_with = "de::id")]
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    access_level: Option<String>,
    #[serde(default, deserialize_with = "de::opt_id")]
    root_folder_id: Option<String>,
    #[serde(default, deserialize_with = "de::opt_flag")]
    email_notification: Option<bool>,
    #[serde(default)]
    agents: Option<serde_json::Value>,
}

impl UserRecord {
    fn into_user(self, connection: &Connection) -> User {
        User {
            id: self.id,
            name: self.name,
            description: self.description,
            email: self.email,
            access_level: self.access_level,
            root_folder_id: self.root_folder_id,
            email_notification: self.email_notification,
            agents: self.agents,
            connection: connection.clone(),
        }
    }
}

impl User {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether the user holds the `admin` access level.
    pub fn is_admin(&self) -> bool {
        self.access_level.as_deref() == Some("admin")
    }
}

#[async_trait]
impl Get for User {
    type Id = str;

    #[tracing::instrument(skip(connection))]
    async fn get(connection: &Connection, id: &str) -> Result<Option<Self>> {
        let record: Option<UserRecord> = fetch_one(connection, &[ENDPOINT, id], &[]).await?;
        Ok(record.map(|r| r.into_user(connection)))
    }
}

#[async_trait]
impl List for User {
    type Query = ();

    #[tracing::instrument(skip(connection))]
    async fn list(connection: &Connection, _query: &()) -> Result<Vec<Self>> {
        let records: Vec<UserRecord> = fetch_many(connection, &[ENDPOINT], &[]).await?;
        Ok(records.into_iter().map(|r| r.into_user(connection)).collect())
    }
}

#[async_trait]
impl Delete for User {
    #[tracing::instrument(skip(self), fields(user_id = %self.id))]
    async fn delete(&self) -> Result<bool> {
        let response = self.connection.delete(&[ENDPOINT, self.id.as_str()], &[]).await?;
        Ok(has_status(&response, StatusCode::ACCEPTED, "delete user"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connection() -> Connection {
        Connection::new("http://localhost/api/v1", None).unwrap()
    }

    #[test]
    fn test_user_deserialize() {
        let record: UserRecord = serde_json::from_value(serde_json::json!({
            "id": 2,
            "name": "fossy",
            "description": "super user",
            "email": "fossy@localhost",
            "accessLevel": "admin",
            "rootFolderId": 1,
            "emailNotification": true,
            "agents": {"bucket": true, "nomos": true}
        }))
        .unwrap();
        let user = record.into_user(&connection());

        assert_eq!(user.id(), "2");
        assert!(user.is_admin());
        assert_eq!(user.root_folder_id.as_deref(), Some("1"));
        assert_eq!(user.email_notification, Some(true));
        assert_eq!(user.agents.as_ref().unwrap()["nomos"], true);
    }

    #[test]
    fn test_user_minimal() {
        let record: UserRecord = serde_json::from_str(r#"{"id": "5"}"#).unwrap();
        let user = record.into_user(&connection());
        assert_eq!(user.id(), "5");
        assert!(!user.is_admin());
        assert!(user.email.is_none());
        assert!(user.agents.is_none());
    }
}
