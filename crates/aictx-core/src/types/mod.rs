//! Core types for aictx.

mod entry;
mod provider;

pub(crate) use entry::ENTRY_HEADER_PATTERN;
pub use entry::{LogBlock, MemoryEntry, IMPORTED_CATEGORY, TIMESTAMP_FORMAT};
pub use provider::{ProviderFormat, ProviderKind};
