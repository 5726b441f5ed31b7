//! Error types for aictx operations.
//!
//! Every failure the tool can report maps onto one of a small set of
//! categories, each carrying a structured error code and, where useful,
//! a suggestion for the operator.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for aictx operations.
pub type AictxResult<T> = Result<T, AictxError>;

/// Main error type for all aictx operations.
#[derive(Error, Debug)]
pub enum AictxError {
    /// Input failed a length or character-class check.
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        code: ErrorCode,
        field: Option<String>,
        suggestion: Option<String>,
    },

    /// Input looked like it carries a credential and was not confirmed.
    #[error("Possible secret detected: {message}")]
    SecretDetected { message: String, code: ErrorCode },

    /// A required file does not exist.
    #[error("Not found: {message}")]
    NotFound {
        message: String,
        code: ErrorCode,
        path: Option<PathBuf>,
    },

    /// Filesystem operation failed.
    #[error("IO error: {message}")]
    Io {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Validation (VAL_xxx)
    ValTooLong,
    ValInvalidCharacters,
    ValInvalidIdentifier,
    ValOutOfRange,
    ValEmpty,

    // Secrets (SEC_xxx)
    SecPatternMatch,
    SecDeniedCategory,

    // Not found (NF_xxx)
    NfLog,
    NfFile,

    // IO (IO_xxx)
    IoRead,
    IoWrite,
    IoLink,

    // Configuration (CFG_xxx)
    CfgInvalid,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValTooLong => "VAL_001",
            ErrorCode::ValInvalidCharacters => "VAL_002",
            ErrorCode::ValInvalidIdentifier => "VAL_003",
            ErrorCode::ValOutOfRange => "VAL_004",
            ErrorCode::ValEmpty => "VAL_005",
            ErrorCode::SecPatternMatch => "SEC_001",
            ErrorCode::SecDeniedCategory => "SEC_002",
            ErrorCode::NfLog => "NF_001",
            ErrorCode::NfFile => "NF_002",
            ErrorCode::IoRead => "IO_001",
            ErrorCode::IoWrite => "IO_002",
            ErrorCode::IoLink => "IO_003",
            ErrorCode::CfgInvalid => "CFG_001",
        }
    }
}

impl AictxError {
    /// Create an invalid input error for a named field.
    pub fn invalid_input(
        field: impl Into<String>,
        code: ErrorCode,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidInput {
            message: message.into(),
            code,
            field: Some(field.into()),
            suggestion: None,
        }
    }

    /// Attach a suggestion to an invalid input error. Other variants are returned unchanged.
    pub fn with_suggestion(self, text: impl Into<String>) -> Self {
        match self {
            Self::InvalidInput {
                message,
                code,
                field,
                ..
            } => Self::InvalidInput {
                message,
                code,
                field,
                suggestion: Some(text.into()),
            },
            other => other,
        }
    }

    /// Create a secret-detected error.
    pub fn secret(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::SecretDetected {
            message: message.into(),
            code,
        }
    }

    /// Create a not found error for the context log.
    pub fn log_not_found(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::NotFound {
            message: format!("no context log at {}", path.display()),
            code: ErrorCode::NfLog,
            path: Some(path.to_path_buf()),
        }
    }

    /// Create a not found error for an arbitrary file.
    pub fn file_not_found(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::NotFound {
            message: format!("{} does not exist or is not a regular file", path.display()),
            code: ErrorCode::NfFile,
            path: Some(path.to_path_buf()),
        }
    }

    /// Create an IO error with context.
    pub fn io(code: ErrorCode, message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: format!("{}: {}", message.into(), source),
            code,
            source: Some(source),
        }
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidInput { code, .. } => *code,
            Self::SecretDetected { code, .. } => *code,
            Self::NotFound { code, .. } => *code,
            Self::Io { code, .. } => *code,
            Self::Configuration(_) => ErrorCode::CfgInvalid,
        }
    }

    /// Get a user-friendly suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::InvalidInput { suggestion, .. } => suggestion.as_deref(),
            Self::SecretDetected { .. } => {
                Some("Remove the credential, or pass --allow-secrets if this is intentional")
            }
            Self::NotFound { code: ErrorCode::NfLog, .. } => {
                Some("Store an entry first with `aictx store <category> <content>`")
            }
            _ => None,
        }
    }
}

impl From<std::io::Error> for AictxError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
            code: ErrorCode::IoWrite,
            source: Some(err),
        }
    }
}
