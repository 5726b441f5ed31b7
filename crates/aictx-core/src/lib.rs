//! aictx-core - Core library for aictx.
//!
//! Keeps a project-local, append-only context log at
//! `.ai-context/memory.md` and points the instruction files of AI coding
//! tools (`CLAUDE.md`, `.cursorrules`, Copilot instructions, Windsurf
//! rules) at it.
//!
//! # Example
//!
//! ```ignore
//! use aictx_core::{AppConfig, ContextStore, ProjectLayout, SecretPolicy};
//!
//! let config = AppConfig::load()?;
//! let store = ContextStore::new(ProjectLayout::discover(std::env::current_dir()?), &config);
//!
//! // Append an entry and sync provider files
//! store.store("architecture", "Microservices with event sourcing", &SecretPolicy::Deny)?;
//!
//! // Read matching entries back
//! let result = store.retrieve(Some("microservices"))?;
//! ```

pub mod audit;
pub mod config;
pub mod docs;
pub mod error;
pub mod gitignore;
pub mod import;
pub mod memory;
pub mod project;
pub mod retrieval;
pub mod secrets;
pub mod status;
pub mod store;
pub mod sync;
pub mod traits;
pub mod types;
pub mod validation;

// Re-export commonly used types
pub use audit::AuditLog;
pub use config::{AppConfig, ProvidersConfig};
pub use docs::RecentDoc;
pub use error::{AictxError, AictxResult, ErrorCode};
pub use import::{ImportReport, ImportStats};
pub use memory::MemoryLog;
pub use project::ProjectLayout;
pub use retrieval::Retrieval;
pub use secrets::SecretPolicy;
pub use status::{ProviderStatus, StatusReport};
pub use store::{ContextStore, StoreReceipt};
pub use sync::{SyncOutcome, SyncReport, Synchronizer};
pub use traits::{
    Confirmation, FileMetadataProvider, FileStat, GitCli, NoMetadata, NoRepository,
    RepositoryInfo, StdFileMetadata,
};
pub use types::{LogBlock, MemoryEntry, ProviderFormat, ProviderKind};
