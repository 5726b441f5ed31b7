//! Documentation tracking: recording doc files and finding recent ones.

use chrono::{DateTime, Duration, Utc};
use std::path::{Path, PathBuf};
use strum::IntoEnumIterator;
use walkdir::{DirEntry, WalkDir};

use crate::error::{AictxError, AictxResult};
use crate::project::{ProjectLayout, CONTEXT_DIR, VCS_MARKER};
use crate::traits::FileMetadataProvider;
use crate::types::{ProviderKind, TIMESTAMP_FORMAT};
use crate::validation::{validate_days, validate_text, CharClass};

/// Category used for doc entries.
pub const DOC_CATEGORY: &str = "documentation";

/// Maximum length of a doc description.
pub const MAX_DESCRIPTION_LENGTH: usize = 200;

/// Directories never searched for documentation.
const SKIPPED_DIRS: &[&str] = &[VCS_MARKER, CONTEXT_DIR, "node_modules", "target"];

/// A documentation file modified recently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentDoc {
    /// Path relative to the project root.
    pub path: PathBuf,
    pub modified: DateTime<Utc>,
    pub size: Option<u64>,
}

/// Build the content of a doc entry for `path`.
pub fn describe_file(
    layout: &ProjectLayout,
    path: &Path,
    description: Option<&str>,
    metadata: &dyn FileMetadataProvider,
) -> AictxResult<String> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        layout.root().join(path)
    };
    if !absolute.is_file() {
        return Err(AictxError::file_not_found(&absolute));
    }

    let description = description
        .map(|d| validate_text("description", d, MAX_DESCRIPTION_LENGTH, CharClass::Text))
        .transpose()?
        .unwrap_or_else(|| "no description".to_string());

    let stat = metadata.stat(&absolute).unwrap_or_default();
    let modified = stat
        .modified
        .map(|m| m.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let size = stat
        .size
        .map(|s| format!("{} bytes", s))
        .unwrap_or_else(|| "size unknown".to_string());

    Ok(format!(
        "Documented {}: {} (modified {}, {})",
        display_path(layout.relative(&absolute)),
        description,
        modified,
        size
    ))
}

/// Documentation files under the project modified within `days` of `now`, newest first.
pub fn find_recent(
    layout: &ProjectLayout,
    extensions: &[String],
    days: u32,
    now: DateTime<Utc>,
    metadata: &dyn FileMetadataProvider,
) -> AictxResult<Vec<RecentDoc>> {
    let days = validate_days(days)?;
    let cutoff = now - Duration::days(i64::from(days));
    let provider_paths: Vec<PathBuf> = ProviderKind::iter()
        .map(|k| PathBuf::from(k.relative_path()))
        .collect();

    let mut docs = Vec::new();
    let walker = WalkDir::new(layout.root())
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_skipped_dir(e));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() || !has_extension(entry.path(), extensions) {
            continue;
        }

        let relative = layout.relative(entry.path()).to_path_buf();
        if provider_paths.contains(&relative) {
            continue;
        }

        let Some(stat) = metadata.stat(entry.path()) else {
            continue;
        };
        let Some(modified) = stat.modified else {
            continue;
        };
        if modified >= cutoff {
            docs.push(RecentDoc {
                path: relative,
                modified,
                size: stat.size,
            });
        }
    }

    docs.sort_by(|a, b| b.modified.cmp(&a.modified).then_with(|| a.path.cmp(&b.path)));
    Ok(docs)
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| SKIPPED_DIRS.contains(&name))
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)))
}

/// Paths in entries always use `/`.
fn display_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
