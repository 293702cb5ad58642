//! Error types for table operations.

use std::path::PathBuf;

use relatable_core::error::BuildError;

/// Errors that can occur while executing table operations.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// Statement construction or type inference failed; nothing was
    /// executed.
    #[error(transparent)]
    Build(#[from] BuildError),

    /// The table already exists.
    #[error("table '{0}' already exists")]
    AlreadyExists(String),

    /// A column with this name already exists.
    #[error("column '{column}' already exists in table '{table}'")]
    DuplicateColumn {
        /// The table being altered.
        table: String,
        /// The conflicting column name.
        column: String,
    },

    /// The table does not exist.
    #[error("no such table: '{0}'")]
    NoSuchTable(String),

    /// The handle was closed; no further operations are possible.
    #[error("table handle is closed")]
    Closed,

    /// Database error the engine reported, passed through with its
    /// original message.
    #[error("database error: {0}")]
    Engine(#[from] sqlx::Error),

    /// IO error reading or writing a flat file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A flat file could not be parsed.
    #[error("malformed record in '{path}' at line {line}: {message}")]
    Flatfile {
        /// File being read.
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        /// What went wrong.
        message: String,
    },
}

/// Result type for table operations.
pub type Result<T> = std::result::Result<T, TableError>;
