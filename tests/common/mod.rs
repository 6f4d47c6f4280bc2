//! Shared helpers for the wiremock-based integration tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use fossology::{Credentials, Fossology, Folder, Upload};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN: &str = "Bearer test-token";

pub fn credentials() -> Credentials {
    let expire = NaiveDate::from_ymd_opt(2099, 12, 31).unwrap();
    Credentials::new("fossy", "fossy", expire)
}

/// Mount a token endpoint that accepts any login.
pub async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/v1/tokens"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(serde_json::json!({ "Authorization": TOKEN })),
        )
        .mount(server)
        .await;
}

/// A logged-in client talking to `server`.
pub async fn connect(server: &MockServer) -> Fossology {
    mount_token(server).await;
    Fossology::connect(&server.uri(), &credentials())
        .await
        .expect("login against mock server")
}

pub fn info(code: u16, message: &str) -> serde_json::Value {
    serde_json::json!({ "code": code, "message": message, "type": "INFO" })
}

pub fn upload_json(id: u64, folder_id: u64, folder_name: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "folderid": folder_id,
        "foldername": folder_name,
        "description": "",
        "uploadname": "zlib-1.2.11.tar.gz",
        "uploaddate": "2024-03-01 09:30:00.000000+00:00",
        "filesize": 607698
    })
}

pub fn folder_json(id: u64, name: &str, parent: Option<u64>) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": name,
        "description": format!("{} folder", name),
        "parent": parent
    })
}

/// Mount a GET for one upload and fetch it through the client.
pub async fn fetch_upload(server: &MockServer, client: &Fossology, id: u64) -> Upload {
    Mock::given(method("GET"))
        .and(path(format!("/api/v1/uploads/{}", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(upload_json(id, 1, "Software Repository")))
        .mount(server)
        .await;
    client.get_upload(&id.to_string()).await.unwrap().unwrap()
}

/// Mount a GET for one folder and fetch it through the client.
pub async fn fetch_folder(
    server: &MockServer,
    client: &Fossology,
    id: u64,
    name: &str,
    parent: Option<u64>,
) -> Folder {
    Mock::given(method("GET"))
        .and(path(format!("/api/v1/folders/{}", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(folder_json(id, name, parent)))
        .mount(server)
        .await;
    client.get_folder(&id.to_string()).await.unwrap().unwrap()
}
