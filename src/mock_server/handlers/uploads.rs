//! Upload endpoint handlers.

use axum::{
    extract::{Multipart, Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use super::{authorize, bad_request, header, id_header, info, not_found, SharedState};

/// GET /uploads
pub async fn list_uploads(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    if let Err(denied) = authorize(&state, &headers).await {
        return denied;
    }
    let state = state.read().await;
    let uploads: Vec<_> = state.uploads.values().cloned().collect();
    (StatusCode::OK, Json(uploads)).into_response()
}

/// GET /uploads/{id}
pub async fn get_upload(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> Response {
    if let Err(denied) = authorize(&state, &headers).await {
        return denied;
    }
    let state = state.read().await;
    match state.uploads.get(&id) {
        Some(upload) => (StatusCode::OK, Json(upload.clone())).into_response(),
        None => not_found(format!("Upload {} does not exist", id)),
    }
}

/// POST /uploads
///
/// Expects the archive in the `fileInput` multipart field and the target in
/// the `folderId` header.
pub async fn create_upload(
    State(state): State<SharedState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    if let Err(denied) = authorize(&state, &headers).await {
        return denied;
    }
    let Some(folder_id) = id_header(&headers, "folderId") else {
        return bad_request("folderId header is required");
    };
    if !matches!(
        header(&headers, "public").as_deref(),
        None | Some("public" | "protected" | "private")
    ) {
        return bad_request("public must be one of public, protected, private");
    }

    let mut file = None;
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some(crate::UPLOAD_FIELD) {
            continue;
        }
        let name = field.file_name().unwrap_or("upload").to_string();
        match field.bytes().await {
            Ok(bytes) => file = Some((name, bytes.len() as u64)),
            Err(err) => return bad_request(err),
        }
    }
    let Some((name, size)) = file else {
        return bad_request("fileInput is required");
    };

    let description = header(&headers, "uploadDescription").unwrap_or_default();
    let mut state = state.write().await;
    match state.add_upload(folder_id, &name, &description, size) {
        Some(id) => info(StatusCode::CREATED, id, "INFO"),
        None => not_found(format!("Folder {} does not exist", folder_id)),
    }
}

/// PATCH /uploads/{id}
pub async fn move_upload(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> Response {
    if let Err(denied) = authorize(&state, &headers).await {
        return denied;
    }
    let Some(folder_id) = id_header(&headers, "folderId") else {
        return bad_request("folderId header is required");
    };
    if state.write().await.move_upload(id, folder_id) {
        info(
            StatusCode::ACCEPTED,
            format!("Upload {} will be moved to folder {}", id, folder_id),
            "INFO",
        )
    } else {
        not_found("Upload or folder does not exist")
    }
}

/// PUT /uploads/{id}
pub async fn copy_upload(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> Response {
    if let Err(denied) = authorize(&state, &headers).await {
        return denied;
    }
    let Some(folder_id) = id_header(&headers, "folderId") else {
        return bad_request("folderId header is required");
    };
    match state.write().await.copy_upload(id, folder_id) {
        Some(_) => info(
            StatusCode::ACCEPTED,
            format!("Upload {} will be copied to folder {}", id, folder_id),
            "INFO",
        ),
        None => not_found("Upload or folder does not exist"),
    }
}

/// DELETE /uploads/{id}
pub async fn delete_upload(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> Response {
    if let Err(denied) = authorize(&state, &headers).await {
        return denied;
    }
    match state.write().await.uploads.remove(&id) {
        Some(_) => info(
            StatusCode::ACCEPTED,
            format!("Delete Job for file with id {}", id),
            "INFO",
        ),
        None => not_found(format!("Upload {} does not exist", id)),
    }
}
