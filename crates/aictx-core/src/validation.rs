//! Input validation for free-form text and identifiers.
//!
//! All checks strip control characters first, so a value that only
//! differs by embedded NULs or newlines validates the same way.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{AictxError, AictxResult, ErrorCode};

/// Maximum length of stored entry content.
pub const MAX_CONTENT_LENGTH: usize = 2000;

/// Maximum length of a retrieval filter.
pub const MAX_FILTER_LENGTH: usize = 100;

/// Maximum length of a category or other identifier.
pub const MAX_IDENTIFIER_LENGTH: usize = 50;

/// Largest accepted look-back window for recent-docs, in days.
pub const MAX_DAYS: u32 = 365;

/// Punctuation accepted in free text, in addition to ASCII alphanumerics and space.
pub const ALLOWED_PUNCTUATION: &str = ".,;:!?'\"()[]{}<>/\\@#$%&*+=_~^|`-";

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_-]*$").unwrap());

/// Character class a text value is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    /// Alphanumerics, space, and [`ALLOWED_PUNCTUATION`].
    Text,
    /// Alphanumerics, `_` and `-`.
    Identifier,
}

impl CharClass {
    fn allows(&self, c: char) -> bool {
        match self {
            CharClass::Text => {
                c.is_ascii_alphanumeric() || c == ' ' || ALLOWED_PUNCTUATION.contains(c)
            }
            CharClass::Identifier => c.is_ascii_alphanumeric() || c == '_' || c == '-',
        }
    }
}

/// Remove control characters (NUL, tab, newline, escape...) from a string.
pub fn strip_control(s: &str) -> String {
    s.chars().filter(|c| !c.is_control()).collect()
}

/// Validate free text against a length bound and character class.
///
/// Returns the cleaned value. `field` names the input in error messages.
pub fn validate_text(field: &str, s: &str, max_len: usize, class: CharClass) -> AictxResult<String> {
    let cleaned = strip_control(s);
    let len = cleaned.chars().count();

    if len == 0 {
        return Err(AictxError::invalid_input(
            field,
            ErrorCode::ValEmpty,
            format!("{} must not be empty", field),
        ));
    }

    if len > max_len {
        return Err(AictxError::invalid_input(
            field,
            ErrorCode::ValTooLong,
            format!("{} is {} characters long (maximum {})", field, len, max_len),
        )
        .with_suggestion(format!("Shorten the {} to {} characters or fewer", field, max_len)));
    }

    if let Some(bad) = cleaned.chars().find(|c| !class.allows(*c)) {
        return Err(AictxError::invalid_input(
            field,
            ErrorCode::ValInvalidCharacters,
            format!("{} contains disallowed character {:?}", field, bad),
        )
        .with_suggestion(format!(
            "Use letters, digits, spaces and {}",
            ALLOWED_PUNCTUATION
        )));
    }

    Ok(cleaned)
}

/// Validate a short identifier such as a category name.
pub fn validate_identifier(field: &str, s: &str) -> AictxResult<String> {
    let cleaned = validate_text(field, s, MAX_IDENTIFIER_LENGTH, CharClass::Identifier)?;

    if !IDENTIFIER.is_match(&cleaned) {
        return Err(AictxError::invalid_input(
            field,
            ErrorCode::ValInvalidIdentifier,
            format!("{} '{}' must start with a letter", field, cleaned),
        )
        .with_suggestion("Use a name like 'architecture' or 'api-design'"));
    }

    Ok(cleaned)
}

/// Validate entry content.
pub fn validate_content(s: &str) -> AictxResult<String> {
    validate_text("content", s, MAX_CONTENT_LENGTH, CharClass::Text)
}

/// Validate a retrieval filter.
pub fn validate_filter(s: &str) -> AictxResult<String> {
    validate_text("filter", s, MAX_FILTER_LENGTH, CharClass::Text)
}

/// Validate a look-back window in days.
pub fn validate_days(days: u32) -> AictxResult<u32> {
    if days == 0 || days > MAX_DAYS {
        return Err(AictxError::invalid_input(
            "days",
            ErrorCode::ValOutOfRange,
            format!("days must be between 1 and {} (got {})", MAX_DAYS, days),
        ));
    }
    Ok(days)
}
