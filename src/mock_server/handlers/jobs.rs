//! Job endpoint handlers.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use super::{authorize, bad_request, id_header, info, not_found, SharedState};

/// GET /jobs
///
/// Honors the `limit` header.
pub async fn list_jobs(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    if let Err(denied) = authorize(&state, &headers).await {
        return denied;
    }
    let limit = id_header(&headers, "limit").map_or(usize::MAX, |l| l as usize);
    let state = state.read().await;
    let jobs: Vec<_> = state.jobs.values().take(limit).cloned().collect();
    (StatusCode::OK, Json(jobs)).into_response()
}

/// GET /jobs/{id}
pub async fn get_job(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> Response {
    if let Err(denied) = authorize(&state, &headers).await {
        return denied;
    }
    let state = state.read().await;
    match state.jobs.get(&id) {
        Some(job) => (StatusCode::OK, Json(job.clone())).into_response(),
        None => not_found(format!("Job {} does not exist", id)),
    }
}

/// POST /jobs
///
/// The agent selection body is accepted as-is.
pub async fn schedule_job(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(_agents): Json<serde_json::Value>,
) -> Response {
    if let Err(denied) = authorize(&state, &headers).await {
        return denied;
    }
    let Some(upload_id) = id_header(&headers, "uploadId") else {
        return bad_request("uploadId header is required");
    };
    match state.write().await.schedule_job(upload_id) {
        Some(id) => info(StatusCode::CREATED, id, "INFO"),
        None => not_found(format!("Upload {} does not exist", upload_id)),
    }
}
