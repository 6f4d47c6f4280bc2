//! List trait for fetching collections of resources.

use async_trait::async_trait;

use crate::connection::Connection;
use crate::error::Result;

/// List resources, optionally filtered.
///
/// FOSSology's collection endpoints are not paginated; filters travel as
/// request headers.
#[async_trait]
pub trait List: Sized + Send {
    /// Filter parameters.
    type Query: Default + Send + Sync;

    /// List resources matching the query.
    ///
    /// A non-error answer other than 200 yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn list(connection: &Connection, query: &Self::Query) -> Result<Vec<Self>>;

    /// List with the default query.
    async fn list_all(connection: &Connection) -> Result<Vec<Self>> {
        Self::list(connection, &Self::Query::default()).await
    }
}
