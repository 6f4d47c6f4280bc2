//! Get trait for fetching single resources.

use async_trait::async_trait;

use crate::connection::Connection;
use crate::error::Result;

/// Fetch a single resource by ID.
///
/// # Example
///
/// ```ignore
/// use fossology::{Get, Upload};
///
/// let upload = Upload::get(client.connection(), "42").await?;
/// ```
#[async_trait]
pub trait Get: Sized {
    /// The ID type for this resource.
    type Id: ?Sized + Sync;

    /// Fetch the resource by ID.
    ///
    /// Returns `Ok(None)` when the server answers with a non-error status
    /// other than 200.
    ///
    /// # Errors
    ///
    /// Returns an error if the server answers with a 400–599 status or the
    /// body does not parse.
    async fn get(connection: &Connection, id: &Self::Id) -> Result<Option<Self>>;
}
