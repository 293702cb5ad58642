//! Column storage types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{BuildError, Result};

/// Storage types a column can be assigned at table creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SqlType {
    /// Floating-point number.
    Real,
    /// Variable-length text with a declared maximum length.
    Varchar(usize),
    /// Integer.
    Int,
    /// Boolean bit.
    Bool,
}

impl SqlType {
    /// Declared length for text columns inferred from sampled data.
    pub const DEFAULT_TEXT_LEN: usize = 200;

    /// Returns the column type name used in SQLite DDL.
    ///
    /// SQLite resolves these through type affinity; the declared form is
    /// kept verbatim so introspection reports the intended type.
    #[must_use]
    pub fn sqlite_name(&self) -> String {
        match self {
            Self::Real => String::from("REAL"),
            Self::Varchar(len) => format!("VARCHAR({len})"),
            Self::Int => String::from("INTEGER"),
            Self::Bool => String::from("BOOLEAN"),
        }
    }

    /// Parses a storage type from the text form a front-end collects:
    /// `real`, `varchar(200)`, `int`, `bit`.
    ///
    /// The failure names the column the type was supplied for.
    pub fn parse(column: &str, text: &str) -> Result<Self> {
        let unsupported = || BuildError::UnsupportedType {
            column: String::from(column),
            value: String::from(text),
        };

        let lower = text.trim().to_ascii_lowercase();
        match lower.as_str() {
            "real" | "float" | "double" => return Ok(Self::Real),
            "int" | "integer" | "bigint" => return Ok(Self::Int),
            "bit" | "bool" | "boolean" => return Ok(Self::Bool),
            "varchar" | "text" => return Ok(Self::Varchar(Self::DEFAULT_TEXT_LEN)),
            _ => {}
        }
        if let Some(len) = lower
            .strip_prefix("varchar(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let len: usize = len.trim().parse().map_err(|_| unsupported())?;
            return Ok(Self::Varchar(len));
        }
        Err(unsupported())
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Real => f.write_str("real"),
            Self::Varchar(len) => write!(f, "varchar({len})"),
            Self::Int => f.write_str("int"),
            Self::Bool => f.write_str("bit"),
        }
    }
}
