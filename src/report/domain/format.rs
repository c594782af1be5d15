//! Output formats for sprint reports.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Rendering format of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    /// Plain text with ASCII rules.
    PlainText,
    /// Markdown with a summary table and task lists.
    Markdown,
}

impl ReportFormat {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PlainText => "plain_text",
            Self::Markdown => "markdown",
        }
    }

    /// Returns the conventional file extension.
    #[must_use]
    pub const fn file_extension(self) -> &'static str {
        match self {
            Self::PlainText => "txt",
            Self::Markdown => "md",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a report format name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown report format: {0}")]
pub struct ParseReportFormatError(pub String);

impl FromStr for ReportFormat {
    type Err = ParseReportFormatError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "plain_text" | "text" | "txt" => Ok(Self::PlainText),
            "markdown" | "md" => Ok(Self::Markdown),
            other => Err(ParseReportFormatError(other.to_owned())),
        }
    }
}
