//! Folder endpoint handlers.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use super::{authorize, bad_request, header, id_header, info, not_found, SharedState};

/// GET /folders
pub async fn list_folders(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    if let Err(denied) = authorize(&state, &headers).await {
        return denied;
    }
    let state = state.read().await;
    let folders: Vec<_> = state.folders.values().cloned().collect();
    (StatusCode::OK, Json(folders)).into_response()
}

/// GET /folders/{id}
pub async fn get_folder(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> Response {
    if let Err(denied) = authorize(&state, &headers).await {
        return denied;
    }
    let state = state.read().await;
    match state.folders.get(&id) {
        Some(folder) => (StatusCode::OK, Json(folder.clone())).into_response(),
        None => not_found(format!("Folder {} does not exist", id)),
    }
}

/// POST /folders
///
/// Answers 200 instead of 201 when the name is already taken under the
/// parent.
pub async fn create_folder(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    if let Err(denied) = authorize(&state, &headers).await {
        return denied;
    }
    let Some(parent) = id_header(&headers, "parentFolder") else {
        return bad_request("parentFolder header is required");
    };
    let Some(name) = header(&headers, "folderName").filter(|n| !n.is_empty()) else {
        return bad_request("folderName header is required");
    };
    let description = header(&headers, "folderDescription").unwrap_or_default();

    match state.write().await.create_folder(parent, &name, &description) {
        Ok(Some(id)) => info(StatusCode::CREATED, id, "INFO"),
        Ok(None) => info(
            StatusCode::OK,
            format!("Folder {} already exists under parent {}", name, parent),
            "INFO",
        ),
        Err(()) => not_found(format!("Parent folder {} does not exist", parent)),
    }
}

/// PUT /folders/{id}
///
/// Moves or copies depending on the `action` header.
pub async fn relocate_folder(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> Response {
    if let Err(denied) = authorize(&state, &headers).await {
        return denied;
    }
    let Some(parent) = id_header(&headers, "parent") else {
        return bad_request("parent header is required");
    };
    let copy = match header(&headers, "action").as_deref() {
        Some("copy") => true,
        Some("move") => false,
        _ => return bad_request("action must be move or copy"),
    };

    if state.write().await.relocate_folder(id, parent, copy) {
        info(
            StatusCode::ACCEPTED,
            format!("Folder {} will be {} to {}", id, if copy { "copied" } else { "moved" }, parent),
            "INFO",
        )
    } else {
        not_found("Folder or parent does not exist")
    }
}

/// PATCH /folders/{id}
///
/// Updates name and/or description from headers.
pub async fn edit_folder(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> Response {
    if let Err(denied) = authorize(&state, &headers).await {
        return denied;
    }
    let name = header(&headers, "name");
    let description = header(&headers, "description");
    if name.is_none() && description.is_none() {
        return bad_request("name or description header is required");
    }

    let mut state = state.write().await;
    let Some(folder) = state.folders.get_mut(&id) else {
        return not_found(format!("Folder {} does not exist", id));
    };
    if let Some(name) = name {
        folder.name = name;
    }
    if let Some(description) = description {
        folder.description = description;
    }
    info(StatusCode::OK, format!("Folder {} updated", id), "INFO")
}

/// DELETE /folders/{id}
pub async fn delete_folder(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> Response {
    if let Err(denied) = authorize(&state, &headers).await {
        return denied;
    }
    let mut state = state.write().await;
    if state.folders.get(&id).is_some_and(|f| f.parent.is_none()) {
        return bad_request("The root folder cannot be deleted");
    }
    match state.folders.remove(&id) {
        Some(_) => info(
            StatusCode::ACCEPTED,
            format!("Delete Job for folder {}", id),
            "INFO",
        ),
        None => not_found(format!("Folder {} does not exist", id)),
    }
}
