//! Per-user audit trail of mutating commands.

use chrono::Utc;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{AictxError, AictxResult, ErrorCode};
use crate::types::TIMESTAMP_FORMAT;
use crate::validation::strip_control;

/// Append-only audit log, one line per action.
#[derive(Debug, Clone)]
pub struct AuditLog {
    path: Option<PathBuf>,
}

impl AuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// An audit log that records nothing.
    pub fn disabled() -> Self {
        Self { path: None }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Append `<timestamp> <action> project=<root> <detail>`.
    pub fn record(&self, action: &str, project: &Path, detail: &str) -> AictxResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let line = format!(
            "{} {} project={} {}",
            Utc::now().format(TIMESTAMP_FORMAT),
            action,
            project.display(),
            strip_control(detail)
        );

        let mut file = open_private(path).map_err(|e| {
            AictxError::io(ErrorCode::IoWrite, format!("cannot open {}", path.display()), e)
        })?;
        writeln!(file, "{}", line.trim_end()).map_err(|e| {
            AictxError::io(ErrorCode::IoWrite, format!("cannot write {}", path.display()), e)
        })
    }
}

#[cfg(unix)]
fn open_private(path: &Path) -> std::io::Result<std::fs::File> {
    use std::os::unix::fs::OpenOptionsExt;

    OpenOptions::new()
        .create(true)
        .append(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> std::io::Result<std::fs::File> {
    OpenOptions::new().create(true).append(true).open(path)
}
