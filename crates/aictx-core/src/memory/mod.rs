//! The context log document.
//!
//! The log is a flat markdown file: a fixed header followed by entry
//! blocks. It is logically append-only, but each write loads the whole
//! document, appends, and atomically replaces the file.

mod atomic;

pub use atomic::write_atomic;

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

use crate::error::{AictxError, AictxResult, ErrorCode};
use crate::types::{LogBlock, MemoryEntry, ENTRY_HEADER_PATTERN};

/// Header written when a log is created.
pub const LOG_HEADER: &str = "# AI Context Memory\n\nProject decisions and context recorded by aictx. Entries are append-only.\n";

static ENTRY_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("(?m){}", ENTRY_HEADER_PATTERN)).unwrap());

/// In-memory copy of a context log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryLog {
    text: String,
}

impl Default for MemoryLog {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryLog {
    /// A fresh log holding only the header.
    pub fn new() -> Self {
        Self {
            text: LOG_HEADER.to_string(),
        }
    }

    /// Wrap existing log text.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Load the log at `path`; `Ok(None)` when it does not exist.
    pub fn load(path: &Path) -> AictxResult<Option<Self>> {
        match std::fs::read_to_string(path) {
            Ok(text) => Ok(Some(Self::from_text(text))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AictxError::io(
                ErrorCode::IoRead,
                format!("cannot read {}", path.display()),
                e,
            )),
        }
    }

    /// Atomically write the log to `path`.
    pub fn save(&self, path: &Path) -> AictxResult<()> {
        write_atomic(path, &self.text)
    }

    /// Append an entry block.
    pub fn append(&mut self, entry: &MemoryEntry) {
        if !self.text.is_empty() && !self.text.ends_with('\n') {
            self.text.push('\n');
        }
        self.text.push_str(&entry.render());
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len_bytes(&self) -> usize {
        self.text.len()
    }

    /// Number of entry headers in the document.
    pub fn entry_count(&self) -> usize {
        count_entries(&self.text)
    }

    /// Split the document into entry blocks. Text before the first header is skipped.
    pub fn blocks(&self) -> Vec<LogBlock> {
        let starts: Vec<_> = ENTRY_HEADER.captures_iter(&self.text).collect();
        let mut blocks = Vec::with_capacity(starts.len());

        for (i, caps) in starts.iter().enumerate() {
            let (Some(whole), Some(category), Some(timestamp)) =
                (caps.get(0), caps.get(1), caps.get(2))
            else {
                continue;
            };
            let end = starts
                .get(i + 1)
                .and_then(|next| next.get(0))
                .map(|m| m.start())
                .unwrap_or(self.text.len());

            blocks.push(LogBlock {
                category: category.as_str().to_string(),
                timestamp: timestamp.as_str().to_string(),
                text: self.text[whole.start()..end].trim_end().to_string(),
            });
        }

        blocks
    }
}

/// Count entry headers in arbitrary log text.
pub fn count_entries(text: &str) -> usize {
    ENTRY_HEADER.find_iter(text).count()
}
