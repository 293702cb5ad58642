//! Column type inference from sampled data.

use crate::error::{BuildError, Result};
use crate::frame::Frame;
use crate::types::SqlType;
use crate::value::Value;

/// Infers one storage type per column from the frame's sampled rows.
///
/// Each column takes the type of its first non-null value, scanning rows in
/// order. A column that is null in every sampled row falls back to `Real`:
/// missing values carry a floating-point tag in the data this layer was
/// built around, so an all-null column codes as a number column. Callers
/// that know better should create with explicit types instead.
pub fn column_types(frame: &Frame) -> Result<Vec<SqlType>> {
    if frame.columns().is_empty() {
        return Err(BuildError::NoOp(String::from(
            "no columns to infer types for",
        )));
    }
    if frame.is_empty() {
        return Err(BuildError::NoOp(String::from(
            "no sample rows to infer column types from",
        )));
    }

    Ok((0..frame.width())
        .map(|i| match first_non_null(frame, i) {
            Some(Value::Text(_)) => SqlType::Varchar(SqlType::DEFAULT_TEXT_LEN),
            Some(Value::Int(_)) => SqlType::Int,
            Some(Value::Bool(_)) => SqlType::Bool,
            Some(Value::Float(_)) | Some(Value::Null) | None => SqlType::Real,
        })
        .collect())
}

/// Flags each column whose sampled kind is text.
///
/// Used to gate the null-to-sentinel substitution in the insert and update
/// paths: only text columns take the sentinel, numeric nulls stay NULL.
#[must_use]
pub fn text_columns(frame: &Frame) -> Vec<bool> {
    (0..frame.width())
        .map(|i| matches!(first_non_null(frame, i), Some(Value::Text(_))))
        .collect()
}

fn first_non_null(frame: &Frame, column: usize) -> Option<&Value> {
    frame
        .rows()
        .iter()
        .map(|row| &row[column])
        .find(|v| !v.is_null())
}
