//! Heuristic detection of credentials in stored text.
//!
//! This is an advisory check: it catches obvious `password: ...` style
//! assignments and a handful of sensitive category names, nothing more.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{AictxError, AictxResult, ErrorCode};
use crate::traits::Confirmation;

/// Categories that always require confirmation.
pub const DENIED_CATEGORIES: &[&str] = &["secrets", "credentials", "passwords", "api_keys"];

static SECRET_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(password|api_key|secret|token)\s*[:=]").unwrap());

/// Why an entry was flagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretFinding {
    /// The category is on the deny list.
    Category,
    /// The content looks like a credential assignment.
    Content,
}

impl SecretFinding {
    /// Error code reported when the finding is not overridden.
    pub fn code(&self) -> ErrorCode {
        match self {
            SecretFinding::Category => ErrorCode::SecDeniedCategory,
            SecretFinding::Content => ErrorCode::SecPatternMatch,
        }
    }

    /// Human-readable description used in prompts and errors.
    pub fn describe(&self, category: &str) -> String {
        match self {
            SecretFinding::Category => format!("category '{}' is reserved for sensitive data", category),
            SecretFinding::Content => "content looks like it contains a credential".to_string(),
        }
    }
}

/// How a flagged entry is handled.
pub enum SecretPolicy<'a> {
    /// Reject flagged entries.
    Deny,
    /// Store flagged entries without asking.
    Allow,
    /// Ask the operator.
    Prompt(&'a dyn Confirmation),
}

/// Returns true when `text` matches the credential heuristic.
pub fn contains_secret(text: &str) -> bool {
    SECRET_PATTERN.is_match(text)
}

/// Returns true when `category` is on the deny list (case-insensitive).
pub fn is_denied_category(category: &str) -> bool {
    DENIED_CATEGORIES
        .iter()
        .any(|denied| denied.eq_ignore_ascii_case(category))
}

/// Scan a candidate entry.
pub fn scan(category: &str, content: &str) -> Option<SecretFinding> {
    if is_denied_category(category) {
        Some(SecretFinding::Category)
    } else if contains_secret(content) {
        Some(SecretFinding::Content)
    } else {
        None
    }
}

/// Apply `policy` to a candidate entry, failing with `SecretDetected` when it is refused.
pub fn guard(category: &str, content: &str, policy: &SecretPolicy<'_>) -> AictxResult<()> {
    let Some(finding) = scan(category, content) else {
        return Ok(());
    };

    let description = finding.describe(category);
    match policy {
        SecretPolicy::Allow => {
            tracing::warn!("Storing entry despite warning: {}", description);
            Ok(())
        }
        SecretPolicy::Prompt(confirmation) => {
            if confirmation.confirm(&format!("{}. Store anyway?", description)) {
                Ok(())
            } else {
                Err(AictxError::secret(finding.code(), format!("{} (declined)", description)))
            }
        }
        SecretPolicy::Deny => Err(AictxError::secret(finding.code(), description)),
    }
}
