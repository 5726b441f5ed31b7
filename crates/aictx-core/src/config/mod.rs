//! Configuration system for aictx.
//!
//! Per-user settings live in `<config_dir>/config.toml`; the audit log lives
//! under `<data_dir>`. Both directories are disjoint from any project.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AictxError, AictxResult};
use crate::types::ProviderKind;

/// Application directory name under the platform config/data directories.
pub const APP_NAME: &str = "aictx";

/// Config file name inside the config directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Audit log file name inside the data directory.
pub const AUDIT_FILE: &str = "audit.log";

/// Which providers are kept in sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub claude: bool,
    pub cursor: bool,
    pub copilot: bool,
    pub windsurf: bool,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            claude: true,
            cursor: true,
            copilot: true,
            windsurf: true,
        }
    }
}

impl ProvidersConfig {
    pub fn is_enabled(&self, kind: ProviderKind) -> bool {
        match kind {
            ProviderKind::Claude => self.claude,
            ProviderKind::Cursor => self.cursor,
            ProviderKind::Copilot => self.copilot,
            ProviderKind::Windsurf => self.windsurf,
        }
    }
}

fn default_doc_extensions() -> Vec<String> {
    ["md", "markdown", "rst", "txt", "adoc"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Main configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Per-user configuration directory.
    #[serde(skip)]
    pub config_dir: PathBuf,
    /// Per-user data directory (audit log).
    #[serde(skip)]
    pub data_dir: PathBuf,
    /// Provider enable flags.
    pub providers: ProvidersConfig,
    /// File extensions counted as documentation by recent-docs.
    pub doc_extensions: Vec<String>,
    /// Default look-back window for recent-docs, in days.
    pub recent_days: u32,
    /// Whether mutating commands are recorded in the audit log.
    pub audit: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        let config_dir = dirs::config_dir()
            .map(|d| d.join(APP_NAME))
            .unwrap_or_else(|| PathBuf::from(".aictx"));
        let data_dir = dirs::data_dir()
            .map(|d| d.join(APP_NAME))
            .unwrap_or_else(|| config_dir.clone());

        Self {
            config_dir,
            data_dir,
            providers: ProvidersConfig::default(),
            doc_extensions: default_doc_extensions(),
            recent_days: 7,
            audit: true,
        }
    }
}

impl AppConfig {
    /// Load configuration from a file (TOML, JSON, or YAML).
    pub fn from_file(path: impl AsRef<Path>) -> AictxResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            AictxError::Configuration(format!("cannot read {}: {}", path.display(), e))
        })?;
        let ext = path.extension().and_then(|e| e.to_str());

        match ext {
            Some("toml") => {
                toml::from_str(&content).map_err(|e| AictxError::Configuration(e.to_string()))
            }
            Some("json") => {
                serde_json::from_str(&content).map_err(|e| AictxError::Configuration(e.to_string()))
            }
            Some("yaml" | "yml") => {
                serde_yaml::from_str(&content).map_err(|e| AictxError::Configuration(e.to_string()))
            }
            _ => Err(AictxError::Configuration(
                "Unsupported config file format. Use .toml, .json, or .yaml".to_string(),
            )),
        }
    }

    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Resolve directories, read `config.toml` if present, then apply the environment.
    pub fn load() -> AictxResult<Self> {
        let base = Self::from_env();
        let path = base.config_file();

        let mut config = if path.is_file() {
            tracing::debug!("Loading config from {}", path.display());
            Self::from_file(&path)?
        } else {
            Self::default()
        };
        config.config_dir = base.config_dir;
        config.data_dir = base.data_dir;
        config.apply_env();
        Ok(config)
    }

    /// Apply `AICTX_*` environment overrides.
    pub fn apply_env(&mut self) {
        if let Ok(dir) = std::env::var("AICTX_CONFIG_DIR") {
            self.config_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = std::env::var("AICTX_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
        if let Ok(value) = std::env::var("AICTX_AUDIT") {
            self.audit = !matches!(value.to_lowercase().as_str(), "0" | "false" | "off" | "no");
        }
        if let Ok(days) = std::env::var("AICTX_RECENT_DAYS") {
            match days.parse() {
                Ok(days) => self.recent_days = days,
                Err(_) => tracing::warn!("Ignoring invalid AICTX_RECENT_DAYS={}", days),
            }
        }
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE)
    }

    pub fn audit_log_path(&self) -> PathBuf {
        self.data_dir.join(AUDIT_FILE)
    }

    /// Create the config and data directories, owner-only.
    pub fn ensure_dirs(&self) -> AictxResult<()> {
        for dir in [&self.config_dir, &self.data_dir] {
            create_private_dir(dir)?;
        }
        Ok(())
    }

    /// Build configuration using builder pattern.
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }
}

#[cfg(unix)]
fn create_private_dir(dir: &Path) -> AictxResult<()> {
    use std::os::unix::fs::{DirBuilderExt, PermissionsExt};

    if dir.is_dir() {
        return Ok(());
    }
    std::fs::DirBuilder::new()
        .recursive(true)
        .mode(0o700)
        .create(dir)
        .and_then(|_| std::fs::set_permissions(dir, std::fs::Permissions::from_mode(0o700)))
        .map_err(|e| AictxError::Configuration(format!("cannot create {}: {}", dir.display(), e)))
}

#[cfg(not(unix))]
fn create_private_dir(dir: &Path) -> AictxResult<()> {
    std::fs::create_dir_all(dir)
        .map_err(|e| AictxError::Configuration(format!("cannot create {}: {}", dir.display(), e)))
}

/// Builder for AppConfig.
#[derive(Default)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    /// Set the per-user configuration directory.
    pub fn config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.config_dir = dir.into();
        self
    }

    /// Set the per-user data directory.
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.data_dir = dir.into();
        self
    }

    /// Set provider enable flags.
    pub fn providers(mut self, providers: ProvidersConfig) -> Self {
        self.config.providers = providers;
        self
    }

    /// Set documentation extensions.
    pub fn doc_extensions(mut self, extensions: Vec<String>) -> Self {
        self.config.doc_extensions = extensions;
        self
    }

    /// Set the default recent-docs window.
    pub fn recent_days(mut self, days: u32) -> Self {
        self.config.recent_days = days;
        self
    }

    /// Enable or disable the audit log.
    pub fn audit(mut self, enabled: bool) -> Self {
        self.config.audit = enabled;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> AppConfig {
        self.config
    }
}
