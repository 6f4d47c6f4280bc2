//! Lenient deserializers for FOSSology's loosely-typed JSON.
//!
//! Depending on the server version, identifiers and sizes arrive either as
//! JSON numbers or as strings. Everything is normalized to `String` ids.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    String(String),
    Number(serde_json::Number),
    Bool(bool),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Scalar::String(s) => s,
            Scalar::Number(n) => n.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }
    }
}

/// Required identifier, number or string.
pub(crate) fn id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Scalar::deserialize(deserializer).map(Scalar::into_string)
}

/// Optional identifier, number, string or null.
pub(crate) fn opt_id<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(Scalar::into_string))
}

/// Optional unsigned integer that may be quoted.
pub(crate) fn opt_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    match Option::<Scalar>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Scalar::Number(n)) => n
            .as_u64()
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("expected unsigned integer, got {n}"))),
        Some(Scalar::String(s)) if s.is_empty() => Ok(None),
        Some(Scalar::String(s)) => s.parse().map(Some).map_err(D::Error::custom),
        Some(Scalar::Bool(b)) => Err(D::Error::custom(format!("expected integer, got {b}"))),
    }
}

/// Optional flag; accepts booleans, 0/1 and the usual yes/no spellings.
pub(crate) fn opt_flag<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<bool>, D::Error> {
    match Option::<Scalar>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Scalar::Bool(b)) => Ok(Some(b)),
        Some(Scalar::Number(n)) => Ok(Some(n.as_u64().map_or(false, |v| v != 0))),
        Some(Scalar::String(s)) => match s.to_ascii_lowercase().as_str() {
            "y" | "yes" | "true" | "1" => Ok(Some(true)),
            "n" | "no" | "false" | "0" => Ok(Some(false)),
            "" => Ok(None),
            other => Err(D::Error::custom(format!("unrecognized flag '{other}'"))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(deserialize_with = "id")]
        id: String,
        #[serde(default, deserialize_with = "opt_id")]
        parent: Option<String>,
        #[serde(default, deserialize_with = "opt_u64")]
        size: Option<u64>,
        #[serde(default, deserialize_with = "opt_flag")]
        notify: Option<bool>,
    }

    #[test]
    fn test_numeric_and_string_ids_normalize() {
        let a: Sample = serde_json::from_str(r#"{"id": 42, "parent": 1}"#).unwrap();
        let b: Sample = serde_json::from_str(r#"{"id": "42", "parent": "1"}"#).unwrap();
        assert_eq!(a.id, "42");
        assert_eq!(a.id, b.id);
        assert_eq!(a.parent, b.parent);
    }

    #[test]
    fn test_missing_and_null_optionals() {
        let s: Sample = serde_json::from_str(r#"{"id": 1, "parent": null}"#).unwrap();
        assert!(s.parent.is_none());
        assert!(s.size.is_none());
        assert!(s.notify.is_none());
    }

    #[test]
    fn test_quoted_size() {
        let s: Sample = serde_json::from_str(r#"{"id": 1, "size": "1024"}"#).unwrap();
        assert_eq!(s.size, Some(1024));
        assert!(serde_json::from_str::<Sample>(r#"{"id": 1, "size": "big"}"#).is_err());
    }

    #[test]
    fn test_flag_spellings() {
        let y: Sample = serde_json::from_str(r#"{"id": 1, "notify": "y"}"#).unwrap();
        let n: Sample = serde_json::from_str(r#"{"id": 1, "notify": false}"#).unwrap();
        assert_eq!(y.notify, Some(true));
        assert_eq!(n.notify, Some(false));
    }
}
