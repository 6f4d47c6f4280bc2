//! Job model and trait implementations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{de, fetch_many, fetch_one};
use crate::connection::Connection;
use crate::error::Result;
use crate::traits::{Get, List};

const ENDPOINT: &str = "jobs";

/// A scheduled or finished analysis job.
///
/// Upload, user and group ids are reported as-is and not resolved into
/// their resources.
#[derive(Debug, Clone, Serialize)]
pub struct Job {
    id: String,
    pub name: Option<String>,
    pub queue_date: Option<String>,
    pub upload_id: Option<String>,
    pub user_id: Option<String>,
    pub group_id: Option<String>,
    /// e.g. `Queued`, `Processing`, `Completed`, `Failed`.
    pub status: Option<String>,
    #[serde(skip)]
    connection: Connection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobRecord {
    #[serde(deserialize_with = "de::id")]
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    queue_date: Option<String>,
    #[serde(default, deserialize_with = "de::opt_id")]
    upload_id: Option<String>,
    #[serde(default, deserialize_with = "de::opt_id")]
    user_id: Option<String>,
    #[serde(default, deserialize_with = "de::opt_id")]
    group_id: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

impl JobRecord {
    fn into_job(self, connection: &Connection) -> Job {
        Job {
            id: self.id,
            name: self.name,
            queue_date: self.queue_date,
            upload_id: self.upload_id,
            user_id: self.user_id,
            group_id: self.group_id,
            status: self.status,
            connection: connection.clone(),
        }
    }
}

impl Job {
    /// A job known only by id, as returned when scheduling.
    pub(crate) fn scheduled(id: String, connection: Connection) -> Self {
        Self {
            id,
            name: None,
            queue_date: None,
            upload_id: None,
            user_id: None,
            group_id: None,
            status: None,
            connection,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Re-read this job, e.g. to poll its status.
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

/// Filters for listing jobs.
#[derive(Debug, Clone, Default)]
pub struct JobListQuery {
    /// Maximum number of jobs, sent as the `limit` header.
    pub limit: Option<u32>,
}

#[async_trait]
impl Get for Job {
    type Id = str;

    #[tracing::instrument(skip(connection))]
    async fn get(connection: &Connection, id: &str) -> Result<Option<Self>> {
        let record: Option<JobRecord> = fetch_one(connection, &[ENDPOINT, id], &[]).await?;
        Ok(record.map(|r| r.into_job(connection)))
    }
}

#[async_trait]
impl List for Job {
    type Query = JobListQuery;

    #[tracing::instrument(skip(connection))]
    async fn list(connection: &Connection, query: &JobListQuery) -> Result<Vec<Self>> {
        let limit = query.limit.map(|l| l.to_string());
        let headers: Vec<(&str, &str)> = limit.iter().map(|l| ("limit", l.as_str())).collect();

        let records: Vec<JobRecord> = fetch_many(connection, &[ENDPOINT], &headers).await?;
        Ok(records.into_iter().map(|r| r.into_job(connection)).collect())
    }
}
