//! Identifier validation.
//!
//! Table and column names are embedded into command strings as-is, so they
//! are checked against a conservative identifier grammar first: an ASCII
//! letter or underscore, followed by letters, digits, or underscores.

use crate::error::{BuildError, Result};

/// Checks one identifier, returning it on success.
pub fn validate(name: &str) -> Result<&str> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };
    if valid {
        Ok(name)
    } else {
        Err(BuildError::InvalidIdentifier(String::from(name)))
    }
}

/// Checks every identifier in a list.
pub fn validate_all(names: &[String]) -> Result<()> {
    for name in names {
        validate(name)?;
    }
    Ok(())
}
