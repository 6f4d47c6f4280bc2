//! Report model.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::connection::Connection;
use crate::error::Result;

const ENDPOINT: &str = "report";

/// Formats the report generator understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Dep5,
    Spdx2,
    Spdx2tv,
    Readmeoss,
    Unifiedreport,
}

impl ReportFormat {
    /// Value sent in the `reportFormat` header.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dep5 => "dep5",
            Self::Spdx2 => "spdx2",
            Self::Spdx2tv => "spdx2tv",
            Self::Readmeoss => "readmeoss",
            Self::Unifiedreport => "unifiedreport",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A report the server has been asked to generate.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    id: String,
    format: ReportFormat,
    #[serde(skip)]
    connection: Connection,
}

impl Report {
    pub(crate) fn new(id: String, format: ReportFormat, connection: Connection) -> Self {
        Self {
            id,
            format,
            connection,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn format(&self) -> ReportFormat {
        self.format
    }

    /// Download into the current directory.
    ///
    /// See [`Report::download_to`].
    pub async fn download(&self, filename: Option<&str>) -> Result<PathBuf> {
        self.download_to(Path::new("."), filename).await
    }

    /// Download into `dir` and return the written path.
    ///
    /// # Errors
    ///
    /// [`crate::FossologyError::ResourceNotReady`] while the server is
    /// still generating the report; retry after the carried delay.
    #[tracing::instrument(skip(self), fields(report_id = %self.id))]
    pub async fn download_to(&self, dir: &Path, filename: Option<&str>) -> Result<PathBuf> {
        self.connection
            .download_file(&[ENDPOINT, self.id.as_str()], dir, filename, &[])
            .await
    }
}
