//! FOSSology API client.
//!
//! [`Fossology`] is the entry point: it logs in on construction and hands
//! out resource objects that share its [`Connection`].

use std::env;
use std::path::Path;
use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::connection::Connection;
use crate::error::{FossologyError, Result};
use crate::models::{
    Folder, Job, JobListQuery, SearchQuery, SearchResult, Upload, User, Visibility,
};
use crate::traits::{Get, List};

/// Path of the REST API below the server address.
pub const API_PATH: &str = "api/v1";

/// Token scope requested at login.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenScope {
    #[default]
    Read,
    Write,
}

impl std::str::FromStr for TokenScope {
    type Err = FossologyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "read" => Ok(Self::Read),
            "write" => Ok(Self::Write),
            other => Err(FossologyError::ConfigMissing(format!(
                "unknown token scope '{other}', expected 'read' or 'write'"
            ))),
        }
    }
}

/// Login credentials.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    /// Last day the requested token is valid.
    pub token_expire: NaiveDate,
    /// Token name; a random UUID is used when unset.
    pub token_name: Option<String>,
    pub token_scope: TokenScope,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("token_expire", &self.token_expire)
            .field("token_name", &self.token_name)
            .field("token_scope", &self.token_scope)
            .finish_non_exhaustive()
    }
}

impl Credentials {
    /// Credentials for a read-scoped token with a generated name.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        token_expire: NaiveDate,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            token_expire,
            token_name: None,
            token_scope: TokenScope::Read,
        }
    }

    /// Set the token name.
    #[must_use]
    pub fn with_token_name(mut self, name: impl Into<String>) -> Self {
        self.token_name = Some(name.into());
        self
    }

    /// Set the token scope.
    #[must_use]
    pub fn with_scope(mut self, scope: TokenScope) -> Self {
        self.token_scope = scope;
        self
    }
}

/// Everything needed to build a [`Fossology`] client.
#[derive(Debug, Clone)]
pub struct FossologyConfig {
    /// Server address, e.g. `https://fossology.example.com/repo`.
    pub server: String,
    pub credentials: Credentials,
    /// Request timeout; `reqwest`'s default when unset.
    pub timeout: Option<Duration>,
}

impl FossologyConfig {
    /// Read configuration from environment variables.
    ///
    /// - `FOSSOLOGY_URL` (required) - server address
    /// - `FOSSOLOGY_USERNAME`, `FOSSOLOGY_PASSWORD` (required)
    /// - `FOSSOLOGY_TOKEN_EXPIRE` (required) - `YYYY-MM-DD`
    /// - `FOSSOLOGY_TOKEN_NAME` (optional)
    /// - `FOSSOLOGY_TOKEN_SCOPE` (optional) - `read` or `write`
    /// - `FOSSOLOGY_TIMEOUT_SECS` (optional)
    ///
    /// # Errors
    ///
    /// Returns [`FossologyError::ConfigMissing`] if a required variable is
    /// unset or a value does not parse.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| {
            lookup(key).ok_or_else(|| {
                FossologyError::ConfigMissing(format!("{key} environment variable not set"))
            })
        };

        let server = required("FOSSOLOGY_URL")?;
        let username = required("FOSSOLOGY_USERNAME")?;
        let password = required("FOSSOLOGY_PASSWORD")?;
        let expire = required("FOSSOLOGY_TOKEN_EXPIRE")?;
        let token_expire = NaiveDate::parse_from_str(&expire, "%Y-%m-%d").map_err(|e| {
            FossologyError::ConfigMissing(format!("FOSSOLOGY_TOKEN_EXPIRE '{expire}': {e}"))
        })?;

        let mut credentials = Credentials::new(username, password, token_expire);
        credentials.token_name = lookup("FOSSOLOGY_TOKEN_NAME");
        if let Some(scope) = lookup("FOSSOLOGY_TOKEN_SCOPE") {
            credentials.token_scope = scope.parse()?;
        }

        let timeout = lookup("FOSSOLOGY_TIMEOUT_SECS")
            .map(|secs| {
                secs.parse::<u64>().map(Duration::from_secs).map_err(|e| {
                    FossologyError::ConfigMissing(format!("FOSSOLOGY_TIMEOUT_SECS '{secs}': {e}"))
                })
            })
            .transpose()?;

        Ok(Self {
            server,
            credentials,
            timeout,
        })
    }
}

/// Build the API base URL from a server address.
pub fn api_url(server: &str) -> String {
    format!("{}/{API_PATH}", server.trim_end_matches('/'))
}

/// Authenticated FOSSology client.
///
/// Construction logs in; a value of this type always carries a token.
///
/// # Example
///
/// ```no_run
/// use chrono::NaiveDate;
/// use fossology::{Credentials, Fossology};
///
/// # async fn example() -> fossology::Result<()> {
/// let expire = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
/// let client = Fossology::connect(
///     "https://fossology.example.com/repo",
///     &Credentials::new("fossy", "fossy", expire),
/// )
/// .await?;
///
/// for upload in client.list_uploads().await? {
///     println!("{} {}", upload.id(), upload.name().unwrap_or_default());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Fossology {
    connection: Connection,
}

impl Fossology {
    /// Connect and log in.
    ///
    /// # Errors
    ///
    /// Fails if the address is invalid or the login is refused; no client
    /// is produced in that case.
    pub async fn connect(server: &str, credentials: &Credentials) -> Result<Self> {
        let mut connection = Connection::new(&api_url(server), None)?;
        connection.authenticate(credentials).await?;
        Ok(Self { connection })
    }

    /// Connect and log in using a full configuration.
    pub async fn connect_with_config(config: &FossologyConfig) -> Result<Self> {
        let mut connection = Connection::new(&api_url(&config.server), config.timeout)?;
        connection.authenticate(&config.credentials).await?;
        Ok(Self { connection })
    }

    /// Connect using [`FossologyConfig::from_env`].
    pub async fn from_env() -> Result<Self> {
        Self::connect_with_config(&FossologyConfig::from_env()?).await
    }

    /// The shared transport.
    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// All uploads visible to the user.
    pub async fn list_uploads(&self) -> Result<Vec<Upload>> {
        Upload::list(&self.connection, &()).await
    }

    /// A single upload; `None` if the server answers without an error but
    /// without the upload either.
    pub async fn get_upload(&self, id: &str) -> Result<Option<Upload>> {
        Upload::get(&self.connection, id).await
    }

    /// Upload a local file into `folder` and return the stored upload.
    pub async fn create_upload(
        &self,
        folder: &Folder,
        file: &Path,
        description: Option<&str>,
        visibility: Visibility,
    ) -> Result<Option<Upload>> {
        Upload::create(&self.connection, folder, file, description, visibility).await
    }

    /// All folders visible to the user.
    pub async fn list_folders(&self) -> Result<Vec<Folder>> {
        Folder::list(&self.connection, &()).await
    }

    /// A single folder.
    pub async fn get_folder(&self, id: &str) -> Result<Option<Folder>> {
        Folder::get(&self.connection, id).await
    }

    /// Create a folder below `parent`.
    pub async fn create_folder(
        &self,
        parent: &Folder,
        name: &str,
        description: Option<&str>,
    ) -> Result<Folder> {
        parent.create_child_folder(name, description).await
    }

    /// All users.
    pub async fn list_users(&self) -> Result<Vec<User>> {
        User::list(&self.connection, &()).await
    }

    /// A single user.
    pub async fn get_user(&self, id: &str) -> Result<Option<User>> {
        User::get(&self.connection, id).await
    }

    /// A single job.
    pub async fn get_job(&self, id: &str) -> Result<Option<Job>> {
        Job::get(&self.connection, id).await
    }

    /// Jobs, at most `limit` of them when given.
    pub async fn list_jobs(&self, limit: Option<u32>) -> Result<Vec<Job>> {
        Job::list(&self.connection, &JobListQuery { limit }).await
    }

    /// Search files across uploads.
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>> {
        SearchResult::list(&self.connection, query).await
    }

    /// Release the session.
    pub fn close(self) {
        self.connection.close();
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 4] = [
        ("FOSSOLOGY_URL", "http://localhost/repo"),
        ("FOSSOLOGY_USERNAME", "fossy"),
        ("FOSSOLOGY_PASSWORD", "secret"),
        ("FOSSOLOGY_TOKEN_EXPIRE", "2030-01-31"),
    ];

    #[test]
    fn test_api_url_trims_trailing_separators() {
        assert_eq!(api_url("http://localhost/repo"), "http://localhost/repo/api/v1");
        assert_eq!(api_url("http://localhost/repo//"), "http://localhost/repo/api/v1");
    }

    #[test]
    fn test_config_from_lookup() {
        let config = FossologyConfig::from_lookup(lookup(&REQUIRED)).unwrap();
        assert_eq!(config.server, "http://localhost/repo");
        assert_eq!(config.credentials.username, "fossy");
        assert_eq!(
            config.credentials.token_expire,
            NaiveDate::from_ymd_opt(2030, 1, 31).unwrap()
        );
        assert_eq!(config.credentials.token_scope, TokenScope::Read);
        assert!(config.credentials.token_name.is_none());
        assert!(config.timeout.is_none());
    }

    #[test]
    fn test_config_optional_values() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("FOSSOLOGY_TOKEN_SCOPE", "WRITE"));
        vars.push(("FOSSOLOGY_TOKEN_NAME", "ci-token"));
        vars.push(("FOSSOLOGY_TIMEOUT_SECS", "30"));

        let config = FossologyConfig::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(config.credentials.token_scope, TokenScope::Write);
        assert_eq!(config.credentials.token_name.as_deref(), Some("ci-token"));
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_config_missing_variable() {
        let err = FossologyConfig::from_lookup(lookup(&REQUIRED[..3])).unwrap_err();
        assert!(matches!(err, FossologyError::ConfigMissing(ref m) if m.contains("FOSSOLOGY_TOKEN_EXPIRE")));
    }

    #[test]
    fn test_config_bad_date() {
        let mut vars = REQUIRED.to_vec();
        vars[3] = ("FOSSOLOGY_TOKEN_EXPIRE", "31/01/2030");
        assert!(FossologyConfig::from_lookup(lookup(&vars)).is_err());
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let creds = Credentials::new("fossy", "hunter2", NaiveDate::from_ymd_opt(2030, 1, 1).unwrap());
        let debug = format!("{:?}", creds);
        assert!(debug.contains("fossy"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_token_scope_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&TokenScope::Write).unwrap(), r#""write""#);
        assert!("admin".parse::<TokenScope>().is_err());
    }
}
