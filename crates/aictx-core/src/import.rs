//! Importing existing provider file content into the log.
//!
//! Projects often already have a `CLAUDE.md` or `.cursorrules` with
//! hand-written guidance. That content is copied into the log once, so the
//! log becomes the single place holding it.

use chrono::{DateTime, Utc};
use strum::IntoEnumIterator;

use crate::memory::MemoryLog;
use crate::project::ProjectLayout;
use crate::secrets::contains_secret;
use crate::sync::{CommentStyle, SyncReport};
use crate::types::{MemoryEntry, ProviderFormat, ProviderKind};

/// Statistics from an import operation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportStats {
    /// Provider files that were examined.
    pub examined: usize,
    /// Files whose content was added to the log.
    pub imported: Vec<ProviderKind>,
    /// Files skipped (empty, already imported, or flagged).
    pub skipped: Vec<(ProviderKind, String)>,
}

impl ImportStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn imported_count(&self) -> usize {
        self.imported.len()
    }
}

/// Result of the `import` command.
#[derive(Debug, Clone)]
pub struct ImportReport {
    pub stats: ImportStats,
    /// The log did not exist before.
    pub created_log: bool,
    pub sync: SyncReport,
}

fn comment_style(kind: ProviderKind) -> Option<CommentStyle> {
    match kind.format() {
        ProviderFormat::SharedMarkdown => Some(CommentStyle::Html),
        ProviderFormat::SharedPlaintext => Some(CommentStyle::Hash),
        ProviderFormat::OwnedMarkdown | ProviderFormat::Link => None,
    }
}

/// Keep line structure but drop other control characters.
fn clean_body(text: &str) -> String {
    text.chars()
        .filter(|c| *c == '\n' || *c == '\t' || !c.is_control())
        .collect()
}

/// Append user content from shared provider files to `log`.
///
/// Managed blocks are removed first. Content already present in the log,
/// empty files, non-files, and content that trips the secret heuristic are skipped.
pub fn import_providers(
    layout: &ProjectLayout,
    log: &mut MemoryLog,
    now: DateTime<Utc>,
) -> ImportStats {
    let mut stats = ImportStats::new();

    for kind in ProviderKind::iter() {
        let Some(style) = comment_style(kind) else {
            continue;
        };
        let path = layout.provider_path(kind);

        // Links are followed: a linked provider file is still the user's content.
        match std::fs::metadata(&path) {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => {
                stats.skipped.push((kind, "not a regular file".to_string()));
                continue;
            }
            Err(_) => continue,
        }
        stats.examined += 1;

        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Cannot read {} for import: {}", path.display(), e);
                stats.skipped.push((kind, format!("unreadable: {}", e)));
                continue;
            }
        };

        let body = clean_body(&crate::sync::templates::strip_managed_block(&text, style));
        if body.is_empty() {
            stats.skipped.push((kind, "no user content".to_string()));
            continue;
        }
        if log.as_str().contains(&body) {
            stats.skipped.push((kind, "already imported".to_string()));
            continue;
        }
        if contains_secret(&body) {
            tracing::warn!(
                "Not importing {}: content looks like it contains a credential",
                kind.relative_path()
            );
            stats.skipped.push((kind, "possible secret".to_string()));
            continue;
        }

        log.append(&MemoryEntry::imported(kind.relative_path(), &body, now));
        tracing::info!("Imported {} into the context log", kind.relative_path());
        stats.imported.push(kind);
    }

    stats
}
