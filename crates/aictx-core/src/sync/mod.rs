//! Provider synchronization.
//!
//! Makes every enabled provider file reference the context log. Each
//! provider is attempted independently: a failure on one is recorded in
//! the report and the rest still run.

pub mod templates;

use chrono::{DateTime, Utc};
use std::fmt;
use std::path::{Path, PathBuf};
use strum::IntoEnumIterator;

use crate::config::ProvidersConfig;
use crate::error::{AictxError, AictxResult, ErrorCode};
use crate::memory::write_atomic;
use crate::project::{ProjectLayout, LOG_REFERENCE};
use crate::traits::RepositoryInfo;
use crate::types::{ProviderFormat, ProviderKind};

pub use templates::{CommentStyle, TemplateFields, MANAGED_MARKER};

/// Branch shown in templates when none is known.
pub const UNKNOWN_BRANCH: &str = "none";

/// Result of synchronizing one provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The file did not exist and was created.
    Created,
    /// The managed block was inserted ahead of existing content.
    Prepended,
    /// The file already referenced the log.
    Unchanged,
    /// An owned file was rewritten with new content.
    Rewritten,
    /// The link was (re)created.
    Linked,
    /// The provider is disabled.
    Skipped,
    /// The provider could not be synchronized.
    Failed(String),
}

impl fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncOutcome::Created => write!(f, "created"),
            SyncOutcome::Prepended => write!(f, "reference added"),
            SyncOutcome::Unchanged => write!(f, "up to date"),
            SyncOutcome::Rewritten => write!(f, "rewritten"),
            SyncOutcome::Linked => write!(f, "linked"),
            SyncOutcome::Skipped => write!(f, "disabled"),
            SyncOutcome::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

/// Outcome per provider, in provider order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub outcomes: Vec<(ProviderKind, SyncOutcome)>,
}

impl SyncReport {
    pub fn outcome(&self, kind: ProviderKind) -> Option<&SyncOutcome> {
        self.outcomes
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, outcome)| outcome)
    }

    /// Providers that failed.
    pub fn failures(&self) -> impl Iterator<Item = (ProviderKind, &str)> {
        self.outcomes.iter().filter_map(|(kind, outcome)| match outcome {
            SyncOutcome::Failed(reason) => Some((*kind, reason.as_str())),
            _ => None,
        })
    }
}

/// Synchronizes provider files for one project.
pub struct Synchronizer<'a> {
    layout: &'a ProjectLayout,
    providers: &'a ProvidersConfig,
    repo: &'a dyn RepositoryInfo,
}

impl<'a> Synchronizer<'a> {
    pub fn new(
        layout: &'a ProjectLayout,
        providers: &'a ProvidersConfig,
        repo: &'a dyn RepositoryInfo,
    ) -> Self {
        Self {
            layout,
            providers,
            repo,
        }
    }

    /// Template fields for this project at `now`.
    pub fn fields(&self, now: DateTime<Utc>) -> TemplateFields {
        let root = self.layout.root();
        let project = self
            .repo
            .project_name(root)
            .unwrap_or_else(|| self.layout.dir_name());
        let branch = self
            .repo
            .branch(root)
            .unwrap_or_else(|| UNKNOWN_BRANCH.to_string());
        TemplateFields::new(&project, &branch, now, LOG_REFERENCE)
    }

    /// Synchronize every provider. Fails only when the log itself is missing.
    pub fn sync(&self) -> AictxResult<SyncReport> {
        self.sync_at(Utc::now())
    }

    /// As [`Synchronizer::sync`], stamping templates with `now`.
    pub fn sync_at(&self, now: DateTime<Utc>) -> AictxResult<SyncReport> {
        let log_path = self.layout.log_path();
        if !log_path.is_file() {
            return Err(AictxError::log_not_found(log_path));
        }

        let fields = self.fields(now);
        let mut report = SyncReport::default();

        for kind in ProviderKind::iter() {
            let outcome = if !self.providers.is_enabled(kind) {
                SyncOutcome::Skipped
            } else {
                match self.sync_provider(kind, &fields) {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        tracing::warn!("Failed to sync {}: {}", kind, e);
                        SyncOutcome::Failed(e.to_string())
                    }
                }
            };
            tracing::debug!("{}: {}", kind, outcome);
            report.outcomes.push((kind, outcome));
        }

        Ok(report)
    }

    fn sync_provider(&self, kind: ProviderKind, fields: &TemplateFields) -> AictxResult<SyncOutcome> {
        let path = self.layout.provider_path(kind);
        match kind.format() {
            ProviderFormat::SharedMarkdown => sync_shared(&path, CommentStyle::Html, fields),
            ProviderFormat::SharedPlaintext => sync_shared(&path, CommentStyle::Hash, fields),
            ProviderFormat::OwnedMarkdown => sync_owned(&path, fields),
            ProviderFormat::Link => sync_link(&path, &fields.reference),
        }
    }
}

/// Create the file, or prepend the managed block when it lacks the reference.
///
/// A link at `path` is followed, so the block lands in the file it points at
/// and the link itself survives.
fn sync_shared(path: &Path, style: CommentStyle, fields: &TemplateFields) -> AictxResult<SyncOutcome> {
    let resolved = resolve_link(path)?;
    let path = resolved.as_path();
    let block = templates::managed_block(style, fields);

    match std::fs::read_to_string(path) {
        Ok(existing) if existing.contains(&fields.reference) => Ok(SyncOutcome::Unchanged),
        Ok(existing) => {
            write_atomic(path, &format!("{}{}", block, existing))?;
            Ok(SyncOutcome::Prepended)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            write_atomic(path, &block)?;
            Ok(SyncOutcome::Created)
        }
        Err(e) => Err(AictxError::io(
            ErrorCode::IoRead,
            format!("cannot read {}", path.display()),
            e,
        )),
    }
}

/// The file a link at `path` points at, or `path` itself when it is not a link.
fn resolve_link(path: &Path) -> AictxResult<PathBuf> {
    match std::fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => std::fs::canonicalize(path).map_err(|e| {
            AictxError::io(
                ErrorCode::IoLink,
                format!("cannot resolve link {}", path.display()),
                e,
            )
        }),
        _ => Ok(path.to_path_buf()),
    }
}

/// Write the owned document, skipping the write when it is already current.
fn sync_owned(path: &Path, fields: &TemplateFields) -> AictxResult<SyncOutcome> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            AictxError::io(ErrorCode::IoWrite, format!("cannot create {}", parent.display()), e)
        })?;
    }

    let document = templates::copilot_document(fields);
    let existed = match std::fs::read_to_string(path) {
        Ok(current) if current == document => return Ok(SyncOutcome::Unchanged),
        Ok(_) => true,
        Err(_) => false,
    };

    write_atomic(path, &document)?;
    Ok(if existed {
        SyncOutcome::Rewritten
    } else {
        SyncOutcome::Created
    })
}

/// Replace any link at `path` with one pointing at `target`.
///
/// A regular file at `path` belongs to the user and is left alone.
fn sync_link(path: &Path, target: &str) -> AictxResult<SyncOutcome> {
    match std::fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => {
            std::fs::remove_file(path).map_err(|e| {
                AictxError::io(ErrorCode::IoLink, format!("cannot remove {}", path.display()), e)
            })?;
        }
        Ok(_) => {
            return Err(AictxError::Io {
                message: format!("{} exists and is not a link; leaving it alone", path.display()),
                code: ErrorCode::IoLink,
                source: None,
            });
        }
        Err(_) => {}
    }

    make_link(target, path).map_err(|e| {
        AictxError::io(ErrorCode::IoLink, format!("cannot link {}", path.display()), e)
    })?;
    Ok(SyncOutcome::Linked)
}

#[cfg(unix)]
fn make_link(target: &str, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn make_link(target: &str, link: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}

#[cfg(not(any(unix, windows)))]
fn make_link(_target: &str, _link: &Path) -> std::io::Result<()> {
    Err(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "symbolic links are not supported on this platform",
    ))
}
