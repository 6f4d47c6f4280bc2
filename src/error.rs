//! Error types for FOSSology API operations.

use thiserror::Error;

/// Message reported when the server rejects a login.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Username or password incorrect.";

/// Errors that can occur during FOSSology API operations.
#[derive(Debug, Error)]
pub enum FossologyError {
    /// The server answered with an error status.
    ///
    /// Raised for every response in the 400–599 band that is not otherwise
    /// special-cased, and for the few success-band answers the client
    /// treats as failures (a 200 on folder creation, for instance).
    #[error("FOSSology API error ({code}): {message}")]
    Server {
        code: u16,
        message: String,
        error_type: String,
    },

    /// The login exchange was refused.
    #[error("Username or password incorrect.")]
    InvalidCredentials,

    /// The requested file is still being prepared by the server.
    ///
    /// Callers should wait `retry_after` seconds before asking again.
    #[error("Resource not ready ({code}): {message}")]
    ResourceNotReady {
        code: u16,
        message: String,
        error_type: String,
        retry_after: Option<u64>,
    },

    /// Configuration is missing or incomplete.
    #[error("FOSSology configuration required: {0}")]
    ConfigMissing(String),

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("Failed to parse response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    /// A header value could not be encoded.
    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    /// Local file could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FossologyError {
    /// Build a generic server error.
    pub fn server(code: u16, message: impl Into<String>, error_type: impl Into<String>) -> Self {
        Self::Server {
            code,
            message: message.into(),
            error_type: error_type.into(),
        }
    }

    /// HTTP status code reported by the server, if this error came from one.
    pub fn code(&self) -> Option<u16> {
        match self {
            Self::Server { code, .. } | Self::ResourceNotReady { code, .. } => Some(*code),
            Self::InvalidCredentials => Some(404),
            Self::HttpError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Server-supplied message, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Server { message, .. } | Self::ResourceNotReady { message, .. } => {
                Some(message)
            }
            Self::InvalidCredentials => Some(INVALID_CREDENTIALS_MESSAGE),
            _ => None,
        }
    }

    /// Server-supplied error type (e.g. `ERROR`, `INFO`), if any.
    pub fn error_type(&self) -> Option<&str> {
        match self {
            Self::Server { error_type, .. } | Self::ResourceNotReady { error_type, .. } => {
                Some(error_type)
            }
            Self::InvalidCredentials => Some("ERROR"),
            _ => None,
        }
    }

    /// Seconds the server asked us to wait, for not-ready downloads.
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            Self::ResourceNotReady { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

/// Result type alias for FOSSology operations.
pub type Result<T> = core::result::Result<T, FossologyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_accessors() {
        let err = FossologyError::server(403, "Access denied", "ERROR");
        assert_eq!(err.code(), Some(403));
        assert_eq!(err.message(), Some("Access denied"));
        assert_eq!(err.error_type(), Some("ERROR"));
        assert_eq!(err.retry_after(), None);
        assert_eq!(err.to_string(), "FOSSology API error (403): Access denied");
    }

    #[test]
    fn test_invalid_credentials_reports_fixed_triple() {
        let err = FossologyError::InvalidCredentials;
        assert_eq!(err.code(), Some(404));
        assert_eq!(err.message(), Some("Username or password incorrect."));
        assert_eq!(err.error_type(), Some("ERROR"));
        assert_eq!(err.to_string(), "Username or password incorrect.");
    }

    #[test]
    fn test_not_ready_carries_retry_after() {
        let err = FossologyError::ResourceNotReady {
            code: 503,
            message: "Report is not ready yet".to_string(),
            error_type: "INFO".to_string(),
            retry_after: Some(60),
        };
        assert_eq!(err.code(), Some(503));
        assert_eq!(err.retry_after(), Some(60));
    }

    #[test]
    fn test_config_error_has_no_server_fields() {
        let err = FossologyError::ConfigMissing("FOSSOLOGY_URL".to_string());
        assert_eq!(err.code(), None);
        assert_eq!(err.message(), None);
    }
}
