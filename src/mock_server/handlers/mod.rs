//! HTTP request handlers for the mock server.
//!
//! Handlers answer with the `{code, message, type}` envelope for every
//! non-resource response, like the real server does.

pub mod folders;
pub mod jobs;
pub mod reports;
pub mod search;
pub mod tokens;
pub mod uploads;
pub mod users;

pub use folders::*;
pub use jobs::*;
pub use reports::*;
pub use search::*;
pub use tokens::*;
pub use uploads::*;
pub use users::*;

use std::fmt::Display;
use std::sync::Arc;

use axum::{
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tokio::sync::RwLock;

use super::state::MockState;

pub(crate) type SharedState = Arc<RwLock<MockState>>;

/// Build a `{code, message, type}` response.
pub(crate) fn info(status: StatusCode, message: impl Display, kind: &str) -> Response {
    (
        status,
        Json(serde_json::json!({
            "code": status.as_u16(),
            "message": message.to_string(),
            "type": kind
        })),
    )
        .into_response()
}

/// Header value as a string, if present and readable.
pub(crate) fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Header value parsed as an id.
pub(crate) fn id_header(headers: &HeaderMap, name: &str) -> Option<u64> {
    header(headers, name).and_then(|v| v.trim().parse().ok())
}

/// Reject requests that don't carry a token issued by this server.
pub(crate) async fn authorize(state: &SharedState, headers: &HeaderMap) -> Result<(), Response> {
    let authorization = header(headers, "authorization");
    if state.read().await.is_authorized(authorization.as_deref()) {
        Ok(())
    } else {
        Err(info(
            StatusCode::FORBIDDEN,
            "Authentication failed or token missing",
            "ERROR",
        ))
    }
}

pub(crate) fn bad_request(message: impl Display) -> Response {
    info(StatusCode::BAD_REQUEST, message, "ERROR")
}

pub(crate) fn not_found(message: impl Display) -> Response {
    info(StatusCode::NOT_FOUND, message, "ERROR")
}
