//! Report decorations.

use serde::{Deserialize, Serialize};

/// Optional header and footer wrapped around a rendered report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportOptions {
    /// Text placed above the report body.
    pub header: Option<String>,
    /// Text placed below the report body.
    pub footer: Option<String>,
}

impl ReportOptions {
    /// Creates options without decorations.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the header; blank text removes it.
    #[must_use]
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = non_blank(header.into());
        self
    }

    /// Sets the footer; blank text removes it.
    #[must_use]
    pub fn with_footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = non_blank(footer.into());
        self
    }
}

fn non_blank(text: String) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}
