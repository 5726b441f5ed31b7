//! The context store: every operation on one project's log.

use chrono::Utc;
use std::path::{Path, PathBuf};

use crate::config::{AppConfig, ProvidersConfig};
use crate::docs::{self, RecentDoc, DOC_CATEGORY};
use crate::error::{AictxError, AictxResult, ErrorCode};
use crate::gitignore::{self, IgnoreUpdate};
use crate::import::{import_providers, ImportReport, ImportStats};
use crate::memory::MemoryLog;
use crate::project::ProjectLayout;
use crate::retrieval::{self, Retrieval};
use crate::secrets::{self, SecretPolicy};
use crate::status::StatusReport;
use crate::sync::{SyncReport, Synchronizer};
use crate::traits::{FileMetadataProvider, GitCli, RepositoryInfo, StdFileMetadata};
use crate::types::MemoryEntry;

/// Confirmation of a stored entry.
#[derive(Debug, Clone)]
pub struct StoreReceipt {
    pub entry: MemoryEntry,
    pub log_path: PathBuf,
    /// The log was created by this call.
    pub created_log: bool,
    /// Provider content imported while creating the log.
    pub imported: ImportStats,
    pub ignore: IgnoreUpdate,
    /// `None` when synchronization could not run.
    pub sync: Option<SyncReport>,
}

/// Operations on one project's context log.
pub struct ContextStore {
    layout: ProjectLayout,
    providers: ProvidersConfig,
    doc_extensions: Vec<String>,
    repo: Box<dyn RepositoryInfo>,
    metadata: Box<dyn FileMetadataProvider>,
}

impl ContextStore {
    /// Store for `layout`, using git and the local filesystem as collaborators.
    pub fn new(layout: ProjectLayout, config: &AppConfig) -> Self {
        Self {
            layout,
            providers: config.providers,
            doc_extensions: config.doc_extensions.clone(),
            repo: Box::new(GitCli),
            metadata: Box::new(StdFileMetadata),
        }
    }

    /// Replace the repository information provider.
    pub fn with_repository(mut self, repo: Box<dyn RepositoryInfo>) -> Self {
        self.repo = repo;
        self
    }

    /// Replace the file metadata provider.
    pub fn with_metadata(mut self, metadata: Box<dyn FileMetadataProvider>) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    /// Validate and append an entry, then synchronize providers.
    ///
    /// Nothing touches disk until validation and the secret guard pass.
    /// A synchronization failure is logged; the entry is still stored.
    pub fn store(
        &self,
        category: &str,
        content: &str,
        policy: &SecretPolicy<'_>,
    ) -> AictxResult<StoreReceipt> {
        let entry = MemoryEntry::new(category, content)?;
        secrets::guard(&entry.category, &entry.content, policy)?;
        self.commit(entry)
    }

    /// Record a documentation file as a `documentation` entry.
    pub fn doc(
        &self,
        path: &Path,
        description: Option<&str>,
        policy: &SecretPolicy<'_>,
    ) -> AictxResult<StoreReceipt> {
        let content = docs::describe_file(&self.layout, path, description, self.metadata.as_ref())?;
        self.store(DOC_CATEGORY, &content, policy)
    }

    /// Documentation files modified within `days`.
    pub fn recent_docs(&self, days: u32) -> AictxResult<Vec<RecentDoc>> {
        docs::find_recent(
            &self.layout,
            &self.doc_extensions,
            days,
            Utc::now(),
            self.metadata.as_ref(),
        )
    }

    /// Read the log, optionally filtered.
    pub fn retrieve(&self, filter: Option<&str>) -> AictxResult<Retrieval> {
        let log_path = self.layout.log_path();
        let log = MemoryLog::load(&log_path)?;
        retrieval::retrieve(log.as_ref(), &log_path, filter)
    }

    /// Synchronize provider files with the log.
    pub fn sync(&self) -> AictxResult<SyncReport> {
        self.synchronizer().sync()
    }

    /// Derive the project status. Read-only.
    pub fn status(&self) -> AictxResult<StatusReport> {
        StatusReport::collect(&self.layout, &self.providers)
    }

    /// Import provider content into the log, then synchronize.
    pub fn import(&self) -> AictxResult<ImportReport> {
        self.prepare()?;
        let log_path = self.layout.log_path();
        let existing = MemoryLog::load(&log_path)?;
        let created_log = existing.is_none();
        let mut log = existing.unwrap_or_default();

        let stats = import_providers(&self.layout, &mut log, Utc::now());
        if created_log || stats.imported_count() > 0 {
            log.save(&log_path)?;
        }

        let sync = self.sync()?;
        Ok(ImportReport {
            stats,
            created_log,
            sync,
        })
    }

    fn synchronizer(&self) -> Synchronizer<'_> {
        Synchronizer::new(&self.layout, &self.providers, self.repo.as_ref())
    }

    /// Create the context directory and keep it out of version control.
    fn prepare(&self) -> AictxResult<IgnoreUpdate> {
        let dir = self.layout.context_dir();
        std::fs::create_dir_all(&dir).map_err(|e| {
            AictxError::io(ErrorCode::IoWrite, format!("cannot create {}", dir.display()), e)
        })?;
        gitignore::ensure_ignored(&self.layout)
    }

    fn commit(&self, entry: MemoryEntry) -> AictxResult<StoreReceipt> {
        let ignore = self.prepare()?;
        let log_path = self.layout.log_path();

        let (mut log, created_log, imported) = match MemoryLog::load(&log_path)? {
            Some(log) => (log, false, ImportStats::new()),
            None => {
                tracing::info!("Creating context log at {}", log_path.display());
                let mut log = MemoryLog::new();
                let imported = import_providers(&self.layout, &mut log, entry.timestamp);
                (log, true, imported)
            }
        };

        log.append(&entry);
        log.save(&log_path)?;
        tracing::debug!("Stored [{}] entry in {}", entry.category, log_path.display());

        let sync = match self.sync() {
            Ok(report) => {
                for (kind, reason) in report.failures() {
                    tracing::warn!("Provider {} not synchronized: {}", kind, reason);
                }
                Some(report)
            }
            Err(e) => {
                tracing::warn!("Synchronization skipped: {}", e);
                None
            }
        };

        Ok(StoreReceipt {
            entry,
            log_path,
            created_log,
            imported,
            ignore,
            sync,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::NoRepository;

    fn store() -> (tempfile::TempDir, ContextStore) {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::builder().audit(false).build();
        let store = ContextStore::new(ProjectLayout::new(dir.path()), &config)
            .with_repository(Box::new(NoRepository));
        (dir, store)
    }

    #[test]
    fn test_invalid_input_touches_nothing() {
        let (dir, store) = store();
        let err = store
            .store("123invalid", "text", &SecretPolicy::Deny)
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValInvalidIdentifier);
        assert!(!dir.path().join(".ai-context").exists());
    }

    #[test]
    fn test_secret_rejected_before_write() {
        let (dir, store) = store();
        let err = store
            .store("notes", "api_key: abc123", &SecretPolicy::Deny)
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::SecPatternMatch);
        assert!(!dir.path().join(".ai-context").exists());
    }

    #[test]
    fn test_first_store_creates_log() {
        let (_dir, store) = store();
        let receipt = store
            .store("architecture", "Microservices with event sourcing", &SecretPolicy::Deny)
            .unwrap();
        assert!(receipt.created_log);
        assert_eq!(receipt.ignore, IgnoreUpdate::NotARepository);
        assert!(receipt.sync.is_some());

        let text = std::fs::read_to_string(receipt.log_path).unwrap();
        assert!(text.starts_with("# AI Context Memory"));
        assert!(text.contains("## [architecture] "));
        assert!(text.ends_with("\nMicroservices with event sourcing\n"));
    }
}
