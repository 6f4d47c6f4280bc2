//! FOSSology transport.
//!
//! Low-level HTTP session that handles authentication, path building and
//! status-to-error translation. Resource types hold a clone of the
//! [`Connection`] and issue their own requests through it.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_DISPOSITION, RETRY_AFTER,
};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use url::Url;

use crate::client::{Credentials, TokenScope};
use crate::error::{FossologyError, Result};
use crate::models::Info;

const USER_AGENT: &str = concat!("fossology-rs/", env!("CARGO_PKG_VERSION"));

/// Multipart field carrying the uploaded file.
pub const UPLOAD_FIELD: &str = "fileInput";

/// File name used when neither the caller nor the server names a download.
pub const DEFAULT_DOWNLOAD_NAME: &str = "download";

/// Per-request headers as `(name, value)` pairs.
pub type Headers<'a> = &'a [(&'a str, &'a str)];

/// HTTP session bound to one FOSSology API base URL.
///
/// Cloning is cheap; clones share the connection pool and the header set
/// captured at clone time. The authorization header is written only by
/// [`Connection::authenticate`], which needs exclusive access.
#[derive(Clone)]
pub struct Connection {
    http: Client,
    base_url: Arc<Url>,
    headers: Arc<HeaderMap>,
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("base_url", &self.base_url.as_str())
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct TokenRequest<'a> {
    username: &'a str,
    password: &'a str,
    token_name: String,
    token_scope: TokenScope,
    token_expire: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    #[serde(rename = "Authorization")]
    authorization: String,
}

impl Connection {
    /// Create an unauthenticated connection to an API base URL
    /// (e.g. `https://fossology.example.com/repo/api/v1`).
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or cannot carry a path.
    pub fn new(api_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let base_url = Url::parse(api_url.trim_end_matches('/'))?;
        if base_url.cannot_be_a_base() {
            return Err(FossologyError::UrlError(
                url::ParseError::RelativeUrlWithCannotBeABaseBase,
            ));
        }

        let mut builder = Client::builder()
            .user_agent(USER_AGENT)
            .brotli(true)
            .gzip(true)
            .deflate(true);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(FossologyError::HttpError)?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        Ok(Self {
            http,
            base_url: Arc::new(base_url),
            headers: Arc::new(headers),
        })
    }

    /// The API base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Whether a token has been merged into the persistent headers.
    pub fn is_authenticated(&self) -> bool {
        self.headers.contains_key(AUTHORIZATION)
    }

    /// Build the URL for a list of path segments below the base URL.
    ///
    /// Each segment becomes exactly one path segment; separators inside a
    /// segment are percent-encoded.
    pub fn url_for(&self, segments: &[&str]) -> Result<Url> {
        let mut url = (*self.base_url).clone();
        url.path_segments_mut()
            .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Request a token and attach it to every later request.
    ///
    /// # Errors
    ///
    /// Returns [`FossologyError::InvalidCredentials`] when the server
    /// answers 404, and [`FossologyError::Server`] for any other answer
    /// than 201.
    #[tracing::instrument(skip(self, credentials), fields(username = %credentials.username))]
    pub async fn authenticate(&mut self, credentials: &Credentials) -> Result<()> {
        let body = TokenRequest {
            username: &credentials.username,
            password: &credentials.password,
            token_name: credentials
                .token_name
                .clone()
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            token_scope: credentials.token_scope,
            token_expire: credentials.token_expire.format("%Y-%m-%d").to_string(),
        };

        let response = match self.post_json(&["tokens"], &[], &body).await {
            Ok(response) => response,
            Err(FossologyError::Server { code: 404, .. }) => {
                return Err(FossologyError::InvalidCredentials)
            }
            Err(e) => return Err(e),
        };

        let status = response.status();
        if status != StatusCode::CREATED {
            let info = Info::from_response(response).await;
            return Err(FossologyError::server(
                status.as_u16(),
                info.message(),
                info.info_type(),
            ));
        }

        let token: TokenResponse = response.json().await.map_err(FossologyError::HttpError)?;
        let mut value = HeaderValue::from_str(&token.authorization)?;
        value.set_sensitive(true);
        Arc::make_mut(&mut self.headers).insert(AUTHORIZATION, value);

        tracing::info!(token_name = %body.token_name, "Authenticated with FOSSology");
        Ok(())
    }

    /// Make a GET request.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, segments: &[&str], headers: Headers<'_>) -> Result<Response> {
        self.send(self.request(Method::GET, segments, headers)?).await
    }

    /// Make a POST request without a body.
    #[tracing::instrument(skip(self))]
    pub async fn post(&self, segments: &[&str], headers: Headers<'_>) -> Result<Response> {
        self.send(self.request(Method::POST, segments, headers)?).await
    }

    /// Make a POST request with a JSON body.
    #[tracing::instrument(skip(self, body))]
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        headers: Headers<'_>,
        body: &B,
    ) -> Result<Response> {
        self.send(self.request(Method::POST, segments, headers)?.json(body))
            .await
    }

    /// Make a PUT request.
    #[tracing::instrument(skip(self))]
    pub async fn put(&self, segments: &[&str], headers: Headers<'_>) -> Result<Response> {
        self.send(self.request(Method::PUT, segments, headers)?).await
    }

    /// Make a PATCH request.
    #[tracing::instrument(skip(self))]
    pub async fn patch(&self, segments: &[&str], headers: Headers<'_>) -> Result<Response> {
        self.send(self.request(Method::PATCH, segments, headers)?).await
    }

    /// Make a DELETE request.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, segments: &[&str], headers: Headers<'_>) -> Result<Response> {
        self.send(self.request(Method::DELETE, segments, headers)?).await
    }

    /// Upload a local file as the `fileInput` multipart field.
    #[tracing::instrument(skip(self))]
    pub async fn upload_file(
        &self,
        segments: &[&str],
        file: &Path,
        headers: Headers<'_>,
    ) -> Result<Response> {
        let contents = tokio::fs::read(file).await?;
        let file_name = file
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(DEFAULT_DOWNLOAD_NAME)
            .to_string();

        tracing::debug!(file = %file.display(), size = contents.len(), "Uploading file");

        let form = Form::new().part(UPLOAD_FIELD, Part::bytes(contents).file_name(file_name));
        self.send(self.request(Method::POST, segments, headers)?.multipart(form))
            .await
    }

    /// Stream a GET response into `dir`.
    ///
    /// The file is named `filename` if given, else after the response's
    /// `Content-Disposition` header, else [`DEFAULT_DOWNLOAD_NAME`].
    ///
    /// # Errors
    ///
    /// A 503 answer yields [`FossologyError::ResourceNotReady`] with the
    /// server's `Retry-After` value; any other non-200 answer yields
    /// [`FossologyError::Server`].
    #[tracing::instrument(skip(self))]
    pub async fn download_file(
        &self,
        segments: &[&str],
        dir: &Path,
        filename: Option<&str>,
        headers: Headers<'_>,
    ) -> Result<PathBuf> {
        let response = self
            .request(Method::GET, segments, headers)?
            .send()
            .await
            .map_err(FossologyError::HttpError)?;

        match response.status() {
            StatusCode::OK => {
                let name = filename
                    .map(str::to_string)
                    .or_else(|| {
                        response
                            .headers()
                            .get(CONTENT_DISPOSITION)
                            .and_then(|v| v.to_str().ok())
                            .and_then(filename_from_disposition)
                    })
                    .unwrap_or_else(|| DEFAULT_DOWNLOAD_NAME.to_string());
                let path = dir.join(name);

                match write_body(response, &path).await {
                    Ok(written) => {
                        tracing::info!(path = %path.display(), size = written, "Downloaded file");
                        Ok(path)
                    }
                    Err(err) => {
                        // Don't leave a truncated file behind.
                        if let Err(cleanup) = tokio::fs::remove_file(&path).await {
                            tracing::debug!(path = %path.display(), error = %cleanup, "Could not remove partial download");
                        }
                        tracing::warn!(path = %path.display(), error = %err, "Download failed");
                        Err(err)
                    }
                }
            }
            StatusCode::SERVICE_UNAVAILABLE => {
                let retry_after = response
                    .headers()
                    .get(RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.trim().parse().ok());
                let info = Info::from_response(response).await;
                Err(FossologyError::ResourceNotReady {
                    code: StatusCode::SERVICE_UNAVAILABLE.as_u16(),
                    message: info.message().to_string(),
                    error_type: info.info_type().to_string(),
                    retry_after,
                })
            }
            status => {
                let info = Info::from_response(response).await;
                Err(FossologyError::server(
                    status.as_u16(),
                    info.message(),
                    info.info_type(),
                ))
            }
        }
    }

    /// Release the underlying session.
    pub fn close(self) {
        tracing::debug!(base_url = %self.base_url, "Closing FOSSology connection");
    }

    fn request(
        &self,
        method: Method,
        segments: &[&str],
        headers: Headers<'_>,
    ) -> Result<RequestBuilder> {
        let url = self.url_for(segments)?;
        let mut builder = self
            .http
            .request(method, url)
            .headers((*self.headers).clone());
        for (name, value) in headers {
            builder = builder.header(*name, HeaderValue::from_str(value)?);
        }
        Ok(builder)
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await.map_err(FossologyError::HttpError)?;
        Self::check_response(response).await
    }

    /// Translate 400–599 answers into [`FossologyError::Server`].
    async fn check_response(response: Response) -> Result<Response> {
        let status = response.status();
        if !(status.is_client_error() || status.is_server_error()) {
            return Ok(response);
        }

        let info = Info::from_response(response).await;
        tracing::debug!(status = status.as_u16(), message = info.message(), "Request failed");
        Err(FossologyError::server(
            status.as_u16(),
            info.message(),
            info.info_type(),
        ))
    }
}

/// Stream a response body into a new file, returning the bytes written.
async fn write_body(response: Response, path: &Path) -> Result<u64> {
    let mut file = tokio::fs::File::create(path).await?;
    let mut written: u64 = 0;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;
    Ok(written)
}

/// Split header parameters on `;`, ignoring separators inside quoted strings.
fn split_params(value: &str) -> Vec<&str> {
    let mut params = Vec::new();
    let mut start = 0;
    let mut quoted = false;
    let mut escaped = false;

    for (i, c) in value.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if quoted => escaped = true,
            '"' => quoted = !quoted,
            ';' if !quoted => {
                params.push(&value[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    params.push(&value[start..]);
    params
}

/// Strip surrounding quotes and backslash escapes from a parameter value.
fn unquote(raw: &str) -> String {
    let Some(inner) = raw.strip_prefix('"').and_then(|r| r.strip_suffix('"')) else {
        return raw.to_string();
    };
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.extend(chars.next()),
            c => out.push(c),
        }
    }
    out
}

/// Extract the file name from a `Content-Disposition` header value.
///
/// Prefers the RFC 5987 `filename*` parameter over plain `filename`, and
/// keeps only the final path component.
fn filename_from_disposition(value: &str) -> Option<String> {
    let mut plain = None;
    let mut extended = None;

    for param in split_params(value).into_iter().skip(1) {
        let Some((key, raw)) = param.split_once('=') else {
            continue;
        };
        let raw = raw.trim();
        match key.trim().to_ascii_lowercase().as_str() {
            "filename*" => {
                // charset'language'percent-encoded
                let encoded = raw.splitn(3, '\'').nth(2).unwrap_or(raw);
                extended = urlencoding::decode(encoded).ok().map(|s| s.into_owned());
            }
            "filename" => plain = Some(unquote(raw)),
            _ => {}
        }
    }

    extended
        .or(plain)
        .and_then(|name| {
            Path::new(&name)
                .file_name()
                .and_then(|n| n.to_str())
                .map(str::to_string)
        })
        .filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_debug_hides_headers() {
        let conn = Connection::new("https://fossology.example.com/repo/api/v1", None).unwrap();
        let debug = format!("{:?}", conn);
        assert!(debug.contains("Connection"));
        assert!(debug.contains("base_url"));
        assert!(debug.contains("authenticated: false"));
    }

    #[test]
    fn test_url_for_joins_segments() {
        let conn = Connection::new("https://fossology.example.com/repo/api/v1", None).unwrap();
        let url = conn.url_for(&["uploads", "42"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://fossology.example.com/repo/api/v1/uploads/42"
        );
    }

    #[test]
    fn test_url_for_trailing_slash_base() {
        let conn = Connection::new("https://fossology.example.com/repo/api/v1/", None).unwrap();
        let url = conn.url_for(&["folders"]).unwrap();
        assert_eq!(url.as_str(), "https://fossology.example.com/repo/api/v1/folders");
    }

    #[test]
    fn test_url_for_encodes_separators() {
        let conn = Connection::new("http://localhost/api/v1", None).unwrap();
        let url = conn.url_for(&["uploads", "a/b"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost/api/v1/uploads/a%2Fb");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(Connection::new("not a url", None).is_err());
        assert!(Connection::new("mailto:someone@example.com", None).is_err());
    }

    #[test]
    fn test_disposition_plain_filename() {
        assert_eq!(
            filename_from_disposition(r#"attachment; filename="report.rdf""#).as_deref(),
            Some("report.rdf")
        );
        assert_eq!(
            filename_from_disposition("attachment; filename=report.txt").as_deref(),
            Some("report.txt")
        );
    }

    #[test]
    fn test_disposition_extended_filename_wins() {
        let value = r#"attachment; filename="fallback.txt"; filename*=UTF-8''r%C3%A9sum%C3%A9.txt"#;
        assert_eq!(filename_from_disposition(value).as_deref(), Some("résumé.txt"));
    }

    #[test]
    fn test_disposition_strips_directories() {
        assert_eq!(
            filename_from_disposition(r#"attachment; filename="../../etc/passwd""#).as_deref(),
            Some("passwd")
        );
    }

    #[test]
    fn test_disposition_separator_inside_quotes() {
        assert_eq!(
            filename_from_disposition(r#"attachment; filename="SPDX2;v2.rdf""#).as_deref(),
            Some("SPDX2;v2.rdf")
        );
        assert_eq!(
            filename_from_disposition(r#"attachment; filename="a;b.txt"; size=10"#).as_deref(),
            Some("a;b.txt")
        );
    }

    #[test]
    fn test_disposition_escaped_quote() {
        assert_eq!(
            filename_from_disposition(r#"attachment; filename="say \"hi\";.txt""#).as_deref(),
            Some(r#"say "hi";.txt"#)
        );
    }

    #[test]
    fn test_disposition_without_filename() {
        assert_eq!(filename_from_disposition("attachment"), None);
        assert_eq!(filename_from_disposition(r#"inline; filename="""#), None);
    }
}
