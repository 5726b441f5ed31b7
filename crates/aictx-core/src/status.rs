//! Read-only project status.

use std::path::PathBuf;
use strum::IntoEnumIterator;

use crate::config::ProvidersConfig;
use crate::error::AictxResult;
use crate::gitignore;
use crate::memory::MemoryLog;
use crate::project::ProjectLayout;
use crate::secrets::contains_secret;
use crate::types::ProviderKind;

/// State of one provider artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderStatus {
    pub kind: ProviderKind,
    pub path: PathBuf,
    /// The file exists, or the link resolves.
    pub exists: bool,
    pub enabled: bool,
}

/// Counts and flags derived from the project directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub root: PathBuf,
    pub log_path: PathBuf,
    pub log_exists: bool,
    pub entry_count: usize,
    pub log_bytes: usize,
    pub providers: Vec<ProviderStatus>,
    /// The ignore-list lists the context directory.
    pub gitignored: bool,
    /// The log matches the credential heuristic somewhere.
    pub secrets_suspected: bool,
}

impl StatusReport {
    /// Inspect the project. Nothing is modified.
    pub fn collect(layout: &ProjectLayout, config: &ProvidersConfig) -> AictxResult<Self> {
        let log_path = layout.log_path();
        let log = MemoryLog::load(&log_path)?;

        let providers = ProviderKind::iter()
            .map(|kind| {
                let path = layout.provider_path(kind);
                ProviderStatus {
                    kind,
                    exists: path.exists(),
                    enabled: config.is_enabled(kind),
                    path,
                }
            })
            .collect();

        Ok(Self {
            root: layout.root().to_path_buf(),
            log_exists: log.is_some(),
            entry_count: log.as_ref().map(MemoryLog::entry_count).unwrap_or(0),
            log_bytes: log.as_ref().map(MemoryLog::len_bytes).unwrap_or(0),
            secrets_suspected: log.as_ref().is_some_and(|l| contains_secret(l.as_str())),
            gitignored: gitignore::is_ignored(layout),
            providers,
            log_path,
        })
    }

    /// True when every provider artifact is present.
    pub fn all_providers_present(&self) -> bool {
        self.providers.iter().all(|p| p.exists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_project() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ProjectLayout::new(dir.path());
        let report = StatusReport::collect(&layout, &ProvidersConfig::default()).unwrap();

        assert!(!report.log_exists);
        assert_eq!(report.entry_count, 0);
        assert_eq!(report.providers.len(), 4);
        assert!(!report.all_providers_present());
        assert!(!report.gitignored);
        assert!(!report.secrets_suspected);
    }

    #[test]
    fn test_counts_and_flags() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ProjectLayout::new(dir.path());
        std::fs::create_dir_all(layout.context_dir()).unwrap();
        std::fs::write(
            layout.log_path(),
            "# log\n\n## [a] 2026-01-01T00:00:00Z\none\n\n## [b] 2026-01-01T00:00:01Z\npassword = x\n",
        )
        .unwrap();
        std::fs::write(layout.ignore_path(), ".ai-context/\n").unwrap();
        std::fs::write(layout.provider_path(ProviderKind::Claude), "x").unwrap();

        let report = StatusReport::collect(&layout, &ProvidersConfig::default()).unwrap();
        assert!(report.log_exists);
        assert_eq!(report.entry_count, 2);
        assert!(report.gitignored);
        assert!(report.secrets_suspected);
        assert!(report.providers[0].exists);
        assert!(!report.providers[1].exists);
    }
}
