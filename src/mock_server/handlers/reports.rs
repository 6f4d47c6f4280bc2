//! Report endpoint handlers.

use axum::{
    extract::{Path, State},
    http::{header as http_header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};

use super::{authorize, bad_request, header, id_header, info, not_found, SharedState};
use crate::mock_server::state::ReportPoll;

const FORMATS: &[&str] = &["dep5", "spdx2", "spdx2tv", "readmeoss", "unifiedreport"];

/// Seconds suggested to clients polling a pending report.
const RETRY_AFTER_SECS: u64 = 1;

/// GET /report
///
/// Queues report generation; the message carries the download URL.
pub async fn request_report(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    if let Err(denied) = authorize(&state, &headers).await {
        return denied;
    }
    let Some(upload_id) = id_header(&headers, "uploadId") else {
        return bad_request("uploadId header is required");
    };
    let format = header(&headers, "reportFormat").unwrap_or_default();
    if !FORMATS.contains(&format.as_str()) {
        return bad_request(format!("reportFormat must be one of {}", FORMATS.join(", ")));
    }

    let host = header(&headers, "host").unwrap_or_else(|| "localhost".to_string());
    match state.write().await.request_report(upload_id, &format) {
        Some(id) => info(
            StatusCode::CREATED,
            format!("http://{}/api/v1/report/{}", host, id),
            "INFO",
        ),
        None => not_found(format!("Upload {} does not exist", upload_id)),
    }
}

/// GET /report/{id}
///
/// Answers 503 with `Retry-After` until the report is ready.
pub async fn download_report(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> Response {
    if let Err(denied) = authorize(&state, &headers).await {
        return denied;
    }
    match state.write().await.poll_report(id) {
        ReportPoll::NotFound => not_found(format!("Report {} does not exist", id)),
        ReportPoll::Pending => {
            let mut response = info(
                StatusCode::SERVICE_UNAVAILABLE,
                "Report is not ready yet. Check back later.",
                "INFO",
            );
            response
                .headers_mut()
                .insert(http_header::RETRY_AFTER, RETRY_AFTER_SECS.into());
            response
        }
        ReportPoll::Ready { filename, content } => (
            StatusCode::OK,
            [
                (
                    http_header::CONTENT_TYPE,
                    "text/plain; charset=UTF-8".to_string(),
                ),
                (
                    http_header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", filename),
                ),
            ],
            content,
        )
            .into_response(),
    }
}
