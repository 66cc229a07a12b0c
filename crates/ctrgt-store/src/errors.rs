//! Error handling for ctrgt-store
//!
//! Wraps the core `ExError` with store-specific constructors

use ctrgt_core::errors::{ExError, ExErrorKind};
use rusqlite::ErrorCode;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Classify a rusqlite error
///
/// UNIQUE and PRIMARY KEY violations become `Conflict`; the remaining
/// constraint failures (CHECK, NOT NULL, trigger aborts) are storage-level
/// validation and become `Validation`. Everything else is `Persistence`.
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    let kind = match &err {
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation => {
            match e.extended_code {
                rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                | rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY => ExErrorKind::Conflict,
                _ => ExErrorKind::Validation,
            }
        }
        _ => ExErrorKind::Persistence,
    };
    ExError::new(kind)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("migration")
        .with_message(format!("Migration {} failed: {}", migration_id, reason))
}

/// Create a checksum mismatch error for an already-applied migration
pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("migration_checksum")
        .with_message(format!(
            "Checksum mismatch for migration {}: expected {}, got {}",
            migration_id, expected, actual
        ))
}

/// Zero rows matched an identifier-scoped write
pub fn record_not_found(op: &str, collection: &str, id: &str) -> ExError {
    ExError::new(ExErrorKind::NotFound)
        .with_op(op.to_string())
        .with_collection(collection)
        .with_record_id(id)
        .with_message("no record matched the identifier")
}

/// Wrap a failure inside a multi-collection transaction
pub fn transaction_failed(op: &str, cause: ExError) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op(op.to_string())
        .with_message("transaction rolled back")
        .with_source(cause)
}
