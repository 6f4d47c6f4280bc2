//! Delete trait for removing resources.

use async_trait::async_trait;

use crate::error::Result;

/// Delete the resource a handle points at.
///
/// After a successful delete the handle is dangling: its fields still
/// describe the removed resource.
#[async_trait]
pub trait Delete {
    /// Request deletion.
    ///
    /// Returns `Ok(true)` on 202 Accepted and `Ok(false)` for any other
    /// non-error answer.
    ///
    /// # Errors
    ///
    /// Returns an error for 400–599 answers.
    async fn delete(&self) -> Result<bool>;
}
