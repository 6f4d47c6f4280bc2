//! User endpoint handlers.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use super::{authorize, info, not_found, SharedState};

/// GET /users
pub async fn list_users(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    if let Err(denied) = authorize(&state, &headers).await {
        return denied;
    }
    let state = state.read().await;
    let users: Vec<_> = state.users.values().cloned().collect();
    (StatusCode::OK, Json(users)).into_response()
}

/// GET /users/{id}
pub async fn get_user(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> Response {
    if let Err(denied) = authorize(&state, &headers).await {
        return denied;
    }
    let state = state.read().await;
    match state.users.get(&id) {
        Some(user) => (StatusCode::OK, Json(user.clone())).into_response(),
        None => not_found(format!("User {} does not exist", id)),
    }
}

/// DELETE /users/{id}
pub async fn delete_user(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> Response {
    if let Err(denied) = authorize(&state, &headers).await {
        return denied;
    }
    match state.write().await.users.remove(&id) {
        Some(_) => info(
            StatusCode::ACCEPTED,
            format!("User id {} deleted", id),
            "INFO",
        ),
        None => not_found(format!("User {} does not exist", id)),
    }
}
