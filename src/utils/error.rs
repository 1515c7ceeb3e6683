//! blogmeta error handling
//!
//! Defines the error taxonomy shared by the repository and the scanner

use serde::Serialize;
use thiserror::Error;

/// Application error type
#[derive(Debug, Error)]
pub enum AppError {
    /// A required field is missing or a column constraint rejected the value
    #[error("validation failed: {0}")]
    Validation(String),

    /// A post references a tag that does not exist
    #[error("missing tag: {0}")]
    Reference(String),

    /// Uniqueness violation on insert
    #[error("already exists: {0}")]
    Conflict(String),

    /// Lookup or delete target is absent
    #[error("not found: {0}")]
    NotFound(String),

    /// A stored thumbnail blob failed to decode
    #[error("corrupt data: {0}")]
    CorruptData(String),

    /// Underlying storage engine failure
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory walk error
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Metadata file could not be read or parsed
    #[error("metadata error: {0}")]
    Metadata(String),

    /// Invalid path
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),
}

/// Error wrapper handed to a presentation layer
#[derive(Debug, Serialize)]
pub struct CommandError {
    pub code: String,
    pub message: String,
}

impl AppError {
    /// Stable machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "E_VALIDATION",
            AppError::Reference(_) => "E_REFERENCE",
            AppError::Conflict(_) => "E_CONFLICT",
            AppError::NotFound(_) => "E_NOT_FOUND",
            AppError::CorruptData(_) => "E_CORRUPT_DATA",
            AppError::Storage(_) => "E_STORAGE",
            AppError::Io(_) => "E_IO",
            AppError::Walk(_) => "E_WALK",
            AppError::Metadata(_) => "E_METADATA",
            AppError::InvalidPath(_) => "E_PATH_INVALID",
            AppError::Config(_) => "E_CONFIG",
        }
    }
}

impl From<AppError> for CommandError {
    fn from(err: AppError) -> Self {
        CommandError {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let cmd_error = CommandError {
            code: self.code().to_string(),
            message: self.to_string(),
        };
        cmd_error.serialize(serializer)
    }
}

/// Application result alias
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AppError::Reference("photos".to_string());
        assert_eq!(err.to_string(), "missing tag: photos");
    }

    #[test]
    fn test_command_error_conversion() {
        let err = AppError::NotFound("hi-post".to_string());
        let cmd_err: CommandError = err.into();
        assert_eq!(cmd_err.code, "E_NOT_FOUND");
        assert_eq!(cmd_err.message, "not found: hi-post");
    }

    #[test]
    fn test_error_serializes_with_code() {
        let err = AppError::Conflict("tag go".to_string());
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "E_CONFLICT");
        assert_eq!(json["message"], "already exists: tag go");
    }
}
