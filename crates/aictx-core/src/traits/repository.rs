//! Repository information used to fill provider templates.

use std::path::Path;
use std::process::Command;

/// Supplies project name and branch for a project root.
pub trait RepositoryInfo {
    /// Name of the project, if the provider knows it.
    fn project_name(&self, root: &Path) -> Option<String>;

    /// Current branch, if any.
    fn branch(&self, root: &Path) -> Option<String>;
}

/// Reads repository information by running the `git` CLI.
///
/// Every failure (git missing, not a repository, detached HEAD) yields `None`.
#[derive(Debug, Clone, Default)]
pub struct GitCli;

impl GitCli {
    fn run(root: &Path, args: &[&str]) -> Option<String> {
        let output = Command::new("git")
            .arg("-C")
            .arg(root)
            .args(args)
            .output()
            .map_err(|e| tracing::debug!("git unavailable: {}", e))
            .ok()?;

        if !output.status.success() {
            return None;
        }

        let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
        (!value.is_empty()).then_some(value)
    }
}

impl RepositoryInfo for GitCli {
    fn project_name(&self, root: &Path) -> Option<String> {
        let toplevel = Self::run(root, &["rev-parse", "--show-toplevel"])?;
        Path::new(&toplevel)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
    }

    fn branch(&self, root: &Path) -> Option<String> {
        Self::run(root, &["rev-parse", "--abbrev-ref", "HEAD"]).filter(|b| b != "HEAD")
    }
}

/// Used when no repository tooling is available.
#[derive(Debug, Clone, Default)]
pub struct NoRepository;

impl RepositoryInfo for NoRepository {
    fn project_name(&self, _root: &Path) -> Option<String> {
        None
    }

    fn branch(&self, _root: &Path) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_repository() {
        let repo = NoRepository;
        assert!(repo.project_name(Path::new("/tmp")).is_none());
        assert!(repo.branch(Path::new("/tmp")).is_none());
    }

    #[test]
    fn test_git_cli_outside_repository() {
        let dir = tempfile::tempdir().unwrap();
        // Either git is missing or the directory is not a repository.
        assert!(GitCli.branch(dir.path()).is_none());
    }
}
