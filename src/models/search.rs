//! File search across uploads.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::upload::{Upload, UploadRecord};
use super::{de, fetch_many};
use crate::connection::Connection;
use crate::error::Result;
use crate::traits::List;

/// Which upload tree entries a search covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    Allfiles,
    Containers,
    Directory,
}

impl SearchType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Allfiles => "allfiles",
            Self::Containers => "containers",
            Self::Directory => "directory",
        }
    }
}

/// Search filters; unset fields are not sent.
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    /// Server default (all files) when unset.
    pub search_type: Option<SearchType>,
    /// Filename pattern, `%` matches any run of characters.
    pub filename: Option<String>,
    pub tag: Option<String>,
    pub filesize_min: Option<u64>,
    pub filesize_max: Option<u64>,
    pub license: Option<String>,
    pub copyright: Option<String>,
}

impl SearchQuery {
    /// Search for files matching a name pattern.
    pub fn filename(pattern: impl Into<String>) -> Self {
        Self {
            filename: Some(pattern.into()),
            ..Default::default()
        }
    }

    fn headers(&self) -> Vec<(&'static str, String)> {
        let params = [
            ("searchType", self.search_type.map(|t| t.as_str().to_string())),
            ("filename", self.filename.clone()),
            ("tag", self.tag.clone()),
            ("filesizemin", self.filesize_min.map(|v| v.to_string())),
            ("filesizemax", self.filesize_max.map(|v| v.to_string())),
            ("license", self.license.clone()),
            ("copyright", self.copyright.clone()),
        ];
        params
            .into_iter()
            .filter_map(|(name, value)| value.map(|v| (name, v)))
            .collect()
    }
}

/// A matched file and the upload that contains it.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub filename: String,
    pub upload_tree_id: String,
    pub upload: Upload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchRecord {
    upload: UploadRecord,
    #[serde(deserialize_with = "de::id")]
    upload_tree_id: String,
    filename: String,
}

#[async_trait]
impl List for SearchResult {
    type Query = SearchQuery;

    #[tracing::instrument(skip(connection))]
    async fn list(connection: &Connection, query: &SearchQuery) -> Result<Vec<Self>> {
        let owned = query.headers();
        let headers: Vec<(&str, &str)> = owned.iter().map(|(k, v)| (*k, v.as_str())).collect();

        let records: Vec<SearchRecord> = fetch_many(connection, &["search"], &headers).await?;
        Ok(records
            .into_iter()
            .map(|r| SearchResult {
                filename: r.filename,
                upload_tree_id: r.upload_tree_id,
                upload: r.upload.into_upload(connection),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_headers_skip_unset() {
        let headers = SearchQuery::filename("%.c").headers();
        assert_eq!(headers, vec![("filename", "%.c".to_string())]);
    }

    #[test]
    fn test_query_headers_all_fields() {
        let query = SearchQuery {
            search_type: Some(SearchType::Containers),
            filename: Some("main".to_string()),
            tag: Some("release".to_string()),
            filesize_min: Some(10),
            filesize_max: Some(2048),
            license: Some("MIT".to_string()),
            copyright: Some("Siemens".to_string()),
        };
        let headers = query.headers();
        assert_eq!(headers.len(), 7);
        assert!(headers.contains(&("filesizemax", "2048".to_string())));
        assert!(headers.contains(&("searchType", "containers".to_string())));
    }
}
