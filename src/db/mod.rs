//! blogmeta database module
//!
//! Connection management, schema and the post/tag data access layer

pub mod schema;
pub mod connection;
pub mod post_dao;
pub mod tag_dao;

pub use connection::{Database, DatabaseStats, default_db_path};
pub use post_dao::PHOTOS_TAG;

use rusqlite::{ffi, ErrorCode};

use crate::utils::error::AppError;

/// Translate a failed write into the error taxonomy.
///
/// UNIQUE / PRIMARY KEY violations become `Conflict`, CHECK / NOT NULL
/// violations become `Validation`, everything else stays `Storage`.
pub(crate) fn classify_write_error(err: rusqlite::Error, subject: &str) -> AppError {
    let extended_code = match &err {
        rusqlite::Error::SqliteFailure(failure, _) if failure.code == ErrorCode::ConstraintViolation => {
            Some(failure.extended_code)
        }
        _ => None,
    };

    match extended_code {
        Some(ffi::SQLITE_CONSTRAINT_UNIQUE) | Some(ffi::SQLITE_CONSTRAINT_PRIMARYKEY) => {
            AppError::Conflict(subject.to_string())
        }
        Some(ffi::SQLITE_CONSTRAINT_CHECK) | Some(ffi::SQLITE_CONSTRAINT_NOTNULL) => {
            AppError::Validation(format!("{} rejected by schema: {}", subject, err))
        }
        _ => AppError::Storage(err),
    }
}
