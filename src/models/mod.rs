//! FOSSology resource types.

mod de;
mod folder;
mod info;
mod job;
mod report;
mod search;
mod upload;
mod user;

pub use folder::*;
pub use info::Info;
pub use job::*;
pub use report::*;
pub use search::*;
pub use upload::*;
pub use user::*;

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::connection::{Connection, Headers};
use crate::error::{FossologyError, Result};

/// GET a single record; `None` unless the answer is 200.
pub(crate) async fn fetch_one<R: DeserializeOwned>(
    connection: &Connection,
    segments: &[&str],
    headers: Headers<'_>,
) -> Result<Option<R>> {
    let response = connection.get(segments, headers).await?;
    if !has_status(&response, StatusCode::OK, "fetch") {
        return Ok(None);
    }
    let record = response.json().await.map_err(FossologyError::HttpError)?;
    Ok(Some(record))
}

/// GET a JSON array of records; empty unless the answer is 200.
pub(crate) async fn fetch_many<R: DeserializeOwned>(
    connection: &Connection,
    segments: &[&str],
    headers: Headers<'_>,
) -> Result<Vec<R>> {
    let response = connection.get(segments, headers).await?;
    if !has_status(&response, StatusCode::OK, "list") {
        return Ok(Vec::new());
    }
    let records = response.json().await.map_err(FossologyError::HttpError)?;
    Ok(records)
}

/// The new resource id a 201 envelope carries in `message`.
///
/// An envelope without one is reported as a server error with the 201 code.
pub(crate) fn created_id(info: &Info, operation: &str) -> Result<String> {
    let id = info.message().trim();
    if id.is_empty() {
        tracing::warn!(operation, "Created response carried no id");
        return Err(FossologyError::server(
            StatusCode::CREATED.as_u16(),
            format!("{operation}: response carried no id"),
            info.info_type(),
        ));
    }
    Ok(id.to_string())
}

/// Check an operation's exact success status, logging a miss.
pub(crate) fn has_status(response: &Response, expected: StatusCode, operation: &str) -> bool {
    let status = response.status();
    if status != expected {
        tracing::warn!(
            operation,
            url = %response.url(),
            status = status.as_u16(),
            expected = expected.as_u16(),
            "Unexpected status"
        );
        return false;
    }
    true
}
