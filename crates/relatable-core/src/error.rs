//! Error types for statement construction and type inference.

/// Errors produced while composing statements or inferring column types.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// A type description has no storage-type mapping.
    #[error("unsupported storage type for column '{column}': '{value}'")]
    UnsupportedType {
        /// The column the type was supplied for.
        column: String,
        /// The offending type text.
        value: String,
    },

    /// Parallel input lists disagree in length.
    #[error("{what}: expected {expected} entries, got {actual}")]
    ArityMismatch {
        /// What the lists describe.
        what: String,
        /// Expected entry count.
        expected: usize,
        /// Actual entry count.
        actual: usize,
    },

    /// The inputs describe nothing to do.
    #[error("nothing to do: {0}")]
    NoOp(String),

    /// A required input was missing.
    #[error("precondition failed: {0}")]
    Precondition(String),

    /// A table or column name fails the identifier grammar.
    #[error("invalid identifier: '{0}'")]
    InvalidIdentifier(String),
}

/// Result type for statement construction.
pub type Result<T> = std::result::Result<T, BuildError>;
