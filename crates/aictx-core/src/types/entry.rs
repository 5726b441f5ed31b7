//! Log entries and the blocks parsed back out of a log.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::AictxResult;
use crate::validation::{validate_content, validate_identifier};

/// Timestamp format used in entry headers.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Category assigned to content imported from provider files.
pub const IMPORTED_CATEGORY: &str = "imported";

/// A complete entry header line. Captures the category and the timestamp.
pub(crate) const ENTRY_HEADER_PATTERN: &str =
    r"^## \[([A-Za-z][A-Za-z0-9_-]*)\] (\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}Z)\r?$";

static HEADER_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(ENTRY_HEADER_PATTERN).unwrap());

/// Prefix body lines that would parse as entry headers with a backslash.
fn escape_headers(content: &str) -> String {
    content
        .split('\n')
        .map(|line| {
            if HEADER_LINE.is_match(line) {
                format!("\\{}", line)
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// One record appended to the context log.
///
/// Entries are immutable once written; the log only ever grows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryEntry {
    /// Short identifier such as `architecture`.
    pub category: String,
    /// Entry body.
    pub content: String,
    /// When the entry was appended.
    pub timestamp: DateTime<Utc>,
}

impl MemoryEntry {
    /// Create a validated entry stamped with the current time.
    pub fn new(category: &str, content: &str) -> AictxResult<Self> {
        let category = validate_identifier("category", category)?;
        let content = validate_content(content)?;
        Ok(Self {
            category,
            content,
            timestamp: Utc::now(),
        })
    }

    /// Entry for content lifted out of an existing provider file.
    ///
    /// The body comes from the user's own files rather than the command
    /// line, so it keeps its line structure and skips the text allow-list.
    pub(crate) fn imported(source: &str, body: &str, timestamp: DateTime<Utc>) -> Self {
        Self {
            category: IMPORTED_CATEGORY.to_string(),
            content: format!("<!-- source: {} -->\n{}", source, body),
            timestamp,
        }
    }

    /// Replace the timestamp.
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// The `## [category] timestamp` header line.
    pub fn header(&self) -> String {
        format!(
            "## [{}] {}",
            self.category,
            self.timestamp.format(TIMESTAMP_FORMAT)
        )
    }

    /// The block appended to the log, including its leading separator line.
    ///
    /// Body lines that look like entry headers are escaped so the block
    /// always parses back as a single entry.
    pub fn render(&self) -> String {
        format!("\n{}\n{}\n", self.header(), escape_headers(&self.content))
    }
}

/// An entry block as found in a log document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogBlock {
    /// Category from the header.
    pub category: String,
    /// Header timestamp, verbatim.
    pub timestamp: String,
    /// Full block text: header line plus body, without trailing blank lines.
    pub text: String,
}

impl LogBlock {
    /// Body without the header line.
    pub fn body(&self) -> &str {
        self.text.split_once('\n').map(|(_, body)| body).unwrap_or("")
    }
}
