//! Unified error type for the crate.
//!
//! Storage-layer constraint failures are classified from the SQLite result
//! codes into tagged variants (falling back to SQLite's fixed message
//! prefixes when only the generic constraint code is reported), so callers
//! branch on kind instead of matching error text. Every variant renders as
//! a one-line human-readable message the interface layer can show directly.

use rusqlite::ffi;
use thiserror::Error;

#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum Error {
    #[error("A record with this {field} already exists")]
    UniqueViolation { field: String },

    #[error("Operation rejected: {relation} still reference this record")]
    ForeignKeyViolation { relation: String },

    #[error("Stored value rejected by a {table} integrity check")]
    CheckViolation { table: String },

    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("AI service error: {0}")]
    Ai(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match &value {
            rusqlite::Error::SqliteFailure(ffi_err, message) => {
                classify_sqlite_failure(*ffi_err, message.as_deref())
                    .unwrap_or_else(|| Error::Database(value.to_string()))
            }
            _ => Error::Database(value.to_string()),
        }
    }
}

/// Maps a constraint failure to its tagged variant using the extended result
/// code. Non-constraint failures return `None` and fall back to `Database`.
fn classify_sqlite_failure(err: ffi::Error, message: Option<&str>) -> Option<Error> {
    match err.extended_code {
        ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
            Some(Error::UniqueViolation {
                field: constrained_name(message).unwrap_or_else(|| "value".to_string()),
            })
        }
        ffi::SQLITE_CONSTRAINT_FOREIGNKEY => Some(Error::ForeignKeyViolation {
            relation: "dependent rows".to_string(),
        }),
        ffi::SQLITE_CONSTRAINT_CHECK => Some(Error::CheckViolation {
            table: constrained_name(message).unwrap_or_else(|| "row".to_string()),
        }),
        // Statement-step errors (foreign-key enforcement in particular)
        // carry only the generic constraint code
        ffi::SQLITE_CONSTRAINT => classify_plain_constraint(message),
        _ => None,
    }
}

// With the generic code the message prefix is the only discriminator
// SQLite leaves us; the prefixes are fixed strings in the SQLite source.
fn classify_plain_constraint(message: Option<&str>) -> Option<Error> {
    let msg = message?;
    if msg.starts_with("FOREIGN KEY constraint failed") {
        Some(Error::ForeignKeyViolation {
            relation: "dependent rows".to_string(),
        })
    } else if msg.starts_with("UNIQUE constraint failed") {
        Some(Error::UniqueViolation {
            field: constrained_name(Some(msg)).unwrap_or_else(|| "value".to_string()),
        })
    } else if msg.starts_with("CHECK constraint failed") {
        Some(Error::CheckViolation {
            table: constrained_name(Some(msg)).unwrap_or_else(|| "row".to_string()),
        })
    } else {
        None
    }
}

/// Pulls the `table.column` (or constraint name) out of messages like
/// "UNIQUE constraint failed: customers.email". Display metadata only.
fn constrained_name(message: Option<&str>) -> Option<String> {
    let msg = message?;
    let (_, name) = msg.rsplit_once(": ")?;
    if name.is_empty() {
        None
    } else {
        Some(name.trim().to_string())
    }
}

// Convenience `Result` type
#[allow(missing_docs)]
pub type Result<T> = std::result::Result<T, Error>;
