//! The `{code, message, type}` envelope FOSSology uses for status replies.

use reqwest::Response;
use serde::{Deserialize, Serialize};

use super::de;

/// Status envelope returned by create/delete/move style endpoints and by
/// every error response.
///
/// Fields the server leaves out deserialize as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Info {
    /// Status code echoed in the body.
    #[serde(default)]
    pub code: Option<u16>,

    /// Free-form message. Creation endpoints put the new id here.
    #[serde(default, deserialize_with = "de::opt_id")]
    pub message: Option<String>,

    /// Message category such as `INFO` or `ERROR`.
    #[serde(rename = "type", default)]
    pub info_type: Option<String>,
}

impl Info {
    /// Read the envelope from a response body, tolerating empty or
    /// non-JSON bodies.
    pub(crate) async fn from_response(response: Response) -> Self {
        match response.bytes().await {
            Ok(body) => serde_json::from_slice(&body).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    /// The message, or an empty string.
    pub fn message(&self) -> &str {
        self.message.as_deref().unwrap_or_default()
    }

    /// The message type, or an empty string.
    pub fn info_type(&self) -> &str {
        self.info_type.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info_numeric_message() {
        let info: Info =
            serde_json::from_str(r#"{"code": 201, "message": 42, "type": "INFO"}"#).unwrap();
        assert_eq!(info.code, Some(201));
        assert_eq!(info.message(), "42");
        assert_eq!(info.info_type(), "INFO");
    }

    #[test]
    fn test_info_missing_fields() {
        let info: Info = serde_json::from_str("{}").unwrap();
        assert_eq!(info.message(), "");
        assert_eq!(info.info_type(), "");
    }
}
