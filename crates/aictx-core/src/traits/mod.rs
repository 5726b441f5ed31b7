//! Collaborator traits for aictx.
//!
//! External tools (git, file metadata, the terminal) sit behind these
//! traits so the core stays testable and degrades when they are absent.

pub mod confirmation;
pub mod metadata;
pub mod repository;

pub use confirmation::Confirmation;
pub use metadata::{FileMetadataProvider, FileStat, NoMetadata, StdFileMetadata};
pub use repository::{GitCli, NoRepository, RepositoryInfo};
