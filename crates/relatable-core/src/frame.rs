//! In-memory tabular datasets.

use serde::{Deserialize, Serialize};

use crate::error::{BuildError, Result};
use crate::value::Value;

/// An ordered, rectangular block of values: named columns plus rows.
///
/// Column order is significant and every row holds exactly one value per
/// column; the invariant is enforced on construction and on every push.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Frame {
    /// Creates an empty frame over the given columns.
    #[must_use]
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Creates a frame from columns and rows, checking that every row is
    /// as wide as the column list.
    pub fn with_rows(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self> {
        let mut frame = Self::new(columns);
        for row in rows {
            frame.push_row(row)?;
        }
        Ok(frame)
    }

    /// Appends a row, rejecting width mismatches.
    pub fn push_row(&mut self, row: Vec<Value>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(BuildError::ArityMismatch {
                what: format!("row {}", self.rows.len()),
                expected: self.columns.len(),
                actual: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// The column names, in order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// The rows, in order.
    #[must_use]
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the frame holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Position of a column by name.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_rows_accepts_rectangular_data() {
        let frame = Frame::with_rows(
            vec!["name".into(), "score".into()],
            vec![
                vec![Value::Text("alice".into()), Value::Float(9.5)],
                vec![Value::Text("bob".into()), Value::Null],
            ],
        )
        .unwrap();

        assert_eq!(frame.len(), 2);
        assert_eq!(frame.width(), 2);
        assert_eq!(frame.column_index("score"), Some(1));
    }

    #[test]
    fn test_push_row_rejects_ragged_row() {
        let mut frame = Frame::new(vec!["a".into(), "b".into()]);
        let err = frame.push_row(vec![Value::Int(1)]).unwrap_err();
        assert!(matches!(
            err,
            BuildError::ArityMismatch {
                expected: 2,
                actual: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_empty_frame() {
        let frame = Frame::new(vec!["a".into()]);
        assert!(frame.is_empty());
        assert_eq!(frame.column_index("missing"), None);
    }
}
