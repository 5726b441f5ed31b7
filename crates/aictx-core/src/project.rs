//! Project root discovery and the fixed on-disk layout inside it.

use std::path::{Path, PathBuf};

use crate::types::ProviderKind;

/// Directory holding the context log, relative to the project root.
pub const CONTEXT_DIR: &str = ".ai-context";

/// File name of the context log inside [`CONTEXT_DIR`].
pub const LOG_FILE: &str = "memory.md";

/// Path of the log relative to the project root. Provider files reference this string.
pub const LOG_REFERENCE: &str = ".ai-context/memory.md";

/// Version-control marker directory.
pub const VCS_MARKER: &str = ".git";

/// Ignore-list file name.
pub const IGNORE_FILE: &str = ".gitignore";

/// Paths of everything aictx reads or writes in one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
}

impl ProjectLayout {
    /// Use `root` as the project root as-is.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Find the project root for `start`.
    ///
    /// Walks upward to the first directory holding a context directory or a
    /// `.git` marker. Falls back to `start` itself.
    pub fn discover(start: impl AsRef<Path>) -> Self {
        let start = start.as_ref();
        let found = start
            .ancestors()
            .find(|dir| dir.join(CONTEXT_DIR).is_dir() || dir.join(VCS_MARKER).exists());

        match found {
            Some(dir) => {
                tracing::debug!("Project root: {}", dir.display());
                Self::new(dir)
            }
            None => {
                tracing::debug!("No project marker found, using {}", start.display());
                Self::new(start)
            }
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn context_dir(&self) -> PathBuf {
        self.root.join(CONTEXT_DIR)
    }

    pub fn log_path(&self) -> PathBuf {
        self.context_dir().join(LOG_FILE)
    }

    pub fn ignore_path(&self) -> PathBuf {
        self.root.join(IGNORE_FILE)
    }

    /// True when the project is under version control.
    pub fn is_repository(&self) -> bool {
        self.root.join(VCS_MARKER).exists()
    }

    /// Absolute path of a provider's file or link.
    pub fn provider_path(&self, kind: ProviderKind) -> PathBuf {
        self.root.join(kind.relative_path())
    }

    /// Fallback project name: the root directory's name.
    pub fn dir_name(&self) -> String {
        self.root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "project".to_string())
    }

    /// Express `path` relative to the root when it lies inside the project.
    pub fn relative<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.root).unwrap_or(path)
    }
}
