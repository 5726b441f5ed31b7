//! Reading the context log back, optionally filtered.

use regex::RegexBuilder;
use std::path::Path;

use crate::error::{AictxError, AictxResult};
use crate::memory::MemoryLog;
use crate::types::LogBlock;
use crate::validation::validate_filter;

/// What a retrieval returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Retrieval {
    /// The whole log, verbatim.
    Full(String),
    /// Entry blocks matching the filter, in log order.
    Matches(Vec<LogBlock>),
    /// The log exists but nothing matched.
    NoMatches,
}

/// Blocks whose text contains `filter`, ignoring case.
///
/// The filter is matched literally.
pub fn filter_blocks(log: &MemoryLog, filter: &str) -> AictxResult<Vec<LogBlock>> {
    let pattern = RegexBuilder::new(&regex::escape(filter))
        .case_insensitive(true)
        .build()
        .map_err(|e| AictxError::Configuration(format!("invalid filter: {}", e)))?;

    Ok(log
        .blocks()
        .into_iter()
        .filter(|block| pattern.is_match(&block.text))
        .collect())
}

/// Retrieve from an optional log.
pub fn retrieve(
    log: Option<&MemoryLog>,
    log_path: &Path,
    filter: Option<&str>,
) -> AictxResult<Retrieval> {
    let filter = filter.map(validate_filter).transpose()?;
    let log = log.ok_or_else(|| AictxError::log_not_found(log_path))?;

    let Some(filter) = filter else {
        return Ok(Retrieval::Full(log.as_str().to_string()));
    };

    let matches = filter_blocks(log, &filter)?;
    tracing::debug!("Filter '{}' matched {} entries", filter, matches.len());
    if matches.is_empty() {
        Ok(Retrieval::NoMatches)
    } else {
        Ok(Retrieval::Matches(matches))
    }
}
