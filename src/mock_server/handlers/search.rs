//! Search endpoint handler.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use super::{authorize, header, SharedState};

/// GET /search
///
/// Only the `filename` filter is evaluated; each matching upload yields one
/// hit whose tree id is the upload id.
pub async fn search(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    if let Err(denied) = authorize(&state, &headers).await {
        return denied;
    }
    let filename = header(&headers, "filename");
    let state = state.read().await;
    let hits: Vec<_> = state
        .search(filename.as_deref())
        .into_iter()
        .map(|upload| {
            serde_json::json!({
                "upload": upload,
                "uploadTreeId": upload.id,
                "filename": upload.upload_name,
            })
        })
        .collect();
    (StatusCode::OK, Json(hits)).into_response()
}
