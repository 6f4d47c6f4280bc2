//! Token endpoint handler.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use super::{bad_request, info, SharedState};

/// Body of `POST /tokens`.
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
    pub token_name: String,
    pub token_scope: String,
    pub token_expire: String,
}

/// POST /tokens
pub async fn create_token(
    State(state): State<SharedState>,
    Json(request): Json<TokenRequest>,
) -> Response {
    if chrono::NaiveDate::parse_from_str(&request.token_expire, "%Y-%m-%d").is_err() {
        return bad_request(format!("Invalid token_expire: {}", request.token_expire));
    }
    if !matches!(request.token_scope.as_str(), "read" | "write") {
        return bad_request(format!("Invalid token_scope: {}", request.token_scope));
    }
    if request.token_name.is_empty() {
        return bad_request("token_name is required");
    }

    let mut state = state.write().await;
    match state.issue_token(&request.username, &request.password) {
        Some(token) => (
            StatusCode::CREATED,
            Json(serde_json::json!({ "Authorization": token })),
        )
            .into_response(),
        None => info(
            StatusCode::NOT_FOUND,
            "Username or password is incorrect",
            "ERROR",
        ),
    }
}
