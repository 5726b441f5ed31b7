//! File metadata used by doc tracking.

use chrono::{DateTime, Utc};
use std::path::Path;

/// Modification time and size of a file. Either may be unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FileStat {
    pub modified: Option<DateTime<Utc>>,
    pub size: Option<u64>,
}

/// Looks up file metadata.
pub trait FileMetadataProvider {
    /// Metadata for `path`, or `None` when it cannot be read.
    fn stat(&self, path: &Path) -> Option<FileStat>;
}

/// Reads metadata from the local filesystem.
#[derive(Debug, Clone, Default)]
pub struct StdFileMetadata;

impl FileMetadataProvider for StdFileMetadata {
    fn stat(&self, path: &Path) -> Option<FileStat> {
        let meta = std::fs::metadata(path).ok()?;
        Some(FileStat {
            modified: meta.modified().ok().map(DateTime::<Utc>::from),
            size: Some(meta.len()),
        })
    }
}

/// Reports nothing; doc entries then say "unknown".
#[derive(Debug, Clone, Default)]
pub struct NoMetadata;

impl FileMetadataProvider for NoMetadata {
    fn stat(&self, _path: &Path) -> Option<FileStat> {
        None
    }
}
