//! Report downloads.

mod common;

use common::{connect, fetch_upload, info};
use fossology::{Connection, FossologyError, Report, ReportFormat, DEFAULT_DOWNLOAD_NAME};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Request report 99 for upload 42.
async fn request_report(mock_server: &MockServer) -> Report {
    let client = connect(mock_server).await;
    let upload = fetch_upload(mock_server, &client, 42).await;

    Mock::given(method("GET"))
        .and(path("/api/v1/report"))
        .respond_with(ResponseTemplate::new(201).set_body_json(info(
            201,
            &format!("{}/api/v1/report/99", mock_server.uri()),
        )))
        .mount(mock_server)
        .await;

    upload
        .request_report(ReportFormat::Spdx2)
        .await
        .unwrap()
        .unwrap()
}

#[tokio::test]
async fn test_not_ready_carries_retry_after() {
    let mock_server = MockServer::start().await;
    let report = request_report(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/api/v1/report/99"))
        .respond_with(
            ResponseTemplate::new(503)
                .insert_header("Retry-After", "7")
                .set_body_json(info(503, "Report is not ready yet")),
        )
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let err = report.download_to(dir.path(), None).await.unwrap_err();

    match &err {
        FossologyError::ResourceNotReady {
            code, retry_after, ..
        } => {
            assert_eq!(*code, 503);
            assert_eq!(*retry_after, Some(7));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.retry_after(), Some(7));
    assert_eq!(err.message(), Some("Report is not ready yet"));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_explicit_filename_wins() {
    let mock_server = MockServer::start().await;
    let report = request_report(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/api/v1/report/99"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Disposition", "attachment; filename=\"server.rdf\"")
                .set_body_string("SPDXVersion: SPDX-2.2"),
        )
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let written = report.download_to(dir.path(), Some("mine.rdf")).await.unwrap();

    assert_eq!(written, dir.path().join("mine.rdf"));
    assert_eq!(std::fs::read_to_string(&written).unwrap(), "SPDXVersion: SPDX-2.2");
    assert!(!dir.path().join("server.rdf").exists());
}

#[tokio::test]
async fn test_content_disposition_name() {
    let mock_server = MockServer::start().await;
    let report = request_report(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/api/v1/report/99"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(
                    "Content-Disposition",
                    "attachment; filename=\"SPDX2_zlib-1.2.11.tar.gz.rdf\"",
                )
                .set_body_bytes(b"<rdf/>".to_vec()),
        )
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let written = report.download_to(dir.path(), None).await.unwrap();

    assert_eq!(written, dir.path().join("SPDX2_zlib-1.2.11.tar.gz.rdf"));
    assert_eq!(std::fs::read(&written).unwrap(), b"<rdf/>");
}

#[tokio::test]
async fn test_fallback_name_without_disposition() {
    let mock_server = MockServer::start().await;
    let report = request_report(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/api/v1/report/99"))
        .respond_with(ResponseTemplate::new(200).set_body_string("report"))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let written = report.download_to(dir.path(), None).await.unwrap();

    assert_eq!(written, dir.path().join(DEFAULT_DOWNLOAD_NAME));
    assert_eq!(std::fs::read_to_string(&written).unwrap(), "report");
}

#[tokio::test]
async fn test_missing_report_is_server_error() {
    let mock_server = MockServer::start().await;
    let report = request_report(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/api/v1/report/99"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "code": 404,
            "message": "Report does not exist",
            "type": "ERROR"
        })))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let err = report.download_to(dir.path(), None).await.unwrap_err();

    assert!(matches!(err, FossologyError::Server { code: 404, .. }));
    assert_eq!(err.retry_after(), None);
}

#[tokio::test]
async fn test_truncated_body_leaves_no_file() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    // Announces 100 bytes, sends 5, then hangs up.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                return;
            }
            request.extend_from_slice(&buf[..n]);
        }
        socket
            .write_all(
                b"HTTP/1.1 200 OK\r\n\
                  Content-Length: 100\r\n\
                  Content-Disposition: attachment; filename=\"partial.txt\"\r\n\
                  \r\n\
                  hello",
            )
            .await
            .unwrap();
        socket.shutdown().await.unwrap();
    });

    let connection = Connection::new(&format!("http://{}/api/v1", addr), None).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let err = connection
        .download_file(&["report", "99"], dir.path(), None, &[])
        .await
        .unwrap_err();

    assert!(matches!(err, FossologyError::HttpError(_)));
    assert!(!dir.path().join("partial.txt").exists());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
