//! Keeping the context directory out of version control.

use std::fs::OpenOptions;
use std::io::Write;

use crate::error::{AictxError, AictxResult, ErrorCode};
use crate::project::{ProjectLayout, CONTEXT_DIR};

/// Line added to the ignore-list.
pub const IGNORE_ENTRY: &str = ".ai-context/";

/// What [`ensure_ignored`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreUpdate {
    /// The ignore-list already lists the context directory.
    AlreadyPresent,
    /// The entry was appended to an existing ignore-list.
    Appended,
    /// A new ignore-list was created.
    Created,
    /// No ignore-list and no repository; nothing to do.
    NotARepository,
}

/// True when an ignore-list line covers the context directory.
fn is_context_entry(line: &str) -> bool {
    let trimmed = line.trim().trim_start_matches('/').trim_end_matches('/');
    trimmed == CONTEXT_DIR
}

/// True when `text` lists the context directory.
pub fn lists_context_dir(text: &str) -> bool {
    text.lines().any(is_context_entry)
}

/// True when the project's ignore-list lists the context directory.
pub fn is_ignored(layout: &ProjectLayout) -> bool {
    std::fs::read_to_string(layout.ignore_path())
        .map(|text| lists_context_dir(&text))
        .unwrap_or(false)
}

/// Make sure the ignore-list lists the context directory.
///
/// An existing ignore-list gets the entry appended. A new one is only
/// created inside a repository.
pub fn ensure_ignored(layout: &ProjectLayout) -> AictxResult<IgnoreUpdate> {
    let path = layout.ignore_path();

    match std::fs::read_to_string(&path) {
        Ok(text) if lists_context_dir(&text) => Ok(IgnoreUpdate::AlreadyPresent),
        Ok(text) => {
            let mut file = OpenOptions::new().append(true).open(&path).map_err(|e| {
                AictxError::io(ErrorCode::IoWrite, format!("cannot open {}", path.display()), e)
            })?;
            let separator = if text.is_empty() || text.ends_with('\n') { "" } else { "\n" };
            writeln!(file, "{}{}", separator, IGNORE_ENTRY).map_err(|e| {
                AictxError::io(ErrorCode::IoWrite, format!("cannot update {}", path.display()), e)
            })?;
            tracing::info!("Added {} to {}", IGNORE_ENTRY, path.display());
            Ok(IgnoreUpdate::Appended)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            if !layout.is_repository() {
                return Ok(IgnoreUpdate::NotARepository);
            }
            std::fs::write(&path, format!("# aictx context log\n{}\n", IGNORE_ENTRY)).map_err(
                |e| AictxError::io(ErrorCode::IoWrite, format!("cannot create {}", path.display()), e),
            )?;
            tracing::info!("Created {}", path.display());
            Ok(IgnoreUpdate::Created)
        }
        Err(e) => Err(AictxError::io(
            ErrorCode::IoRead,
            format!("cannot read {}", path.display()),
            e,
        )),
    }
}
