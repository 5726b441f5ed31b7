//! The fixed set of provider files kept in sync with the log.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// A tool that reads project instructions from its own file.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// `CLAUDE.md` at the project root.
    Claude,
    /// `.cursorrules` at the project root.
    Cursor,
    /// `.github/copilot-instructions.md`.
    Copilot,
    /// `.windsurfrules`, a link to the log itself.
    Windsurf,
}

/// How a provider's file is maintained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderFormat {
    /// Markdown file shared with the user; a managed block is prepended once.
    SharedMarkdown,
    /// Plaintext rules file shared with the user; `#` comments.
    SharedPlaintext,
    /// Markdown file owned entirely by aictx and rewritten on every sync.
    OwnedMarkdown,
    /// Symbolic link pointing at the log.
    Link,
}

impl ProviderKind {
    /// Path relative to the project root, with `/` separators.
    pub fn relative_path(&self) -> &'static str {
        match self {
            ProviderKind::Claude => "CLAUDE.md",
            ProviderKind::Cursor => ".cursorrules",
            ProviderKind::Copilot => ".github/copilot-instructions.md",
            ProviderKind::Windsurf => ".windsurfrules",
        }
    }

    pub fn format(&self) -> ProviderFormat {
        match self {
            ProviderKind::Claude => ProviderFormat::SharedMarkdown,
            ProviderKind::Cursor => ProviderFormat::SharedPlaintext,
            ProviderKind::Copilot => ProviderFormat::OwnedMarkdown,
            ProviderKind::Windsurf => ProviderFormat::Link,
        }
    }
}
