//! Composable filter predicates and order fragments.
//!
//! Every constructor validates the column identifier and renders values
//! through the typed escape path, so text compares quoted and numerics
//! compare bare, in every builder alike. Fragments are composed, never
//! parsed; consuming operations join them with AND in the order given.

use std::fmt;

use crate::error::{BuildError, Result};
use crate::ident;
use crate::value::Value;

/// Whether a range condition includes its endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bounds {
    /// Strictly between: `>` and `<`.
    Exclusive,
    /// Endpoints included: `>=` and `<=`.
    Inclusive,
}

/// One boolean predicate clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition(String);

impl Condition {
    /// Matches rows where the column equals any of the given values:
    /// `( col = v1 OR col = v2 ... )`.
    ///
    /// A single value keeps the same OR-grouped shape. The value list must
    /// be non-empty.
    pub fn equal<V: Into<Value>>(
        column: &str,
        values: impl IntoIterator<Item = V>,
    ) -> Result<Self> {
        let column = ident::validate(column)?;
        let clauses: Vec<String> = values
            .into_iter()
            .map(|v| format!("{column} = {}", v.into().render()))
            .collect();
        if clauses.is_empty() {
            return Err(BuildError::Precondition(format!(
                "no values given to match '{column}' against"
            )));
        }
        Ok(Self(format!("( {} )", clauses.join(" OR "))))
    }

    /// `col != value`.
    pub fn not_equal(column: &str, value: impl Into<Value>) -> Result<Self> {
        let column = ident::validate(column)?;
        Ok(Self(format!("{column} != {}", value.into().render())))
    }

    /// `col > value`.
    pub fn greater_than(column: &str, value: impl Into<Value>) -> Result<Self> {
        let column = ident::validate(column)?;
        Ok(Self(format!("{column} > {}", value.into().render())))
    }

    /// `col < value`.
    pub fn less_than(column: &str, value: impl Into<Value>) -> Result<Self> {
        let column = ident::validate(column)?;
        Ok(Self(format!("{column} < {}", value.into().render())))
    }

    /// Strictly-between range: `col > start AND col < end`.
    ///
    /// Both bounds are exclusive; use [`Condition::between_bounds`] for an
    /// inclusive range.
    pub fn between(
        column: &str,
        start: impl Into<Value>,
        end: impl Into<Value>,
    ) -> Result<Self> {
        Self::between_bounds(column, start, end, Bounds::Exclusive)
    }

    /// Range with explicit endpoint handling.
    pub fn between_bounds(
        column: &str,
        start: impl Into<Value>,
        end: impl Into<Value>,
        bounds: Bounds,
    ) -> Result<Self> {
        let column = ident::validate(column)?;
        let (gt, lt) = match bounds {
            Bounds::Exclusive => (">", "<"),
            Bounds::Inclusive => (">=", "<="),
        };
        Ok(Self(format!(
            "{column} {gt} {} AND {column} {lt} {}",
            start.into().render(),
            end.into().render()
        )))
    }

    /// `col IS NULL`.
    pub fn is_null(column: &str) -> Result<Self> {
        let column = ident::validate(column)?;
        Ok(Self(format!("{column} IS NULL")))
    }

    /// `col IS NOT NULL`.
    pub fn not_null(column: &str) -> Result<Self> {
        let column = ident::validate(column)?;
        Ok(Self(format!("{column} IS NOT NULL")))
    }

    /// Wraps an already-formed predicate fragment.
    ///
    /// Nothing is validated or escaped; only use this for fragments that
    /// do not contain untrusted input.
    #[must_use]
    pub fn raw(sql: impl Into<String>) -> Self {
        Self(sql.into())
    }

    /// The fragment as SQL text.
    #[must_use]
    pub fn as_sql(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Ascending order (ASC).
    Asc,
    /// Descending order (DESC).
    Desc,
}

/// An ordering fragment: column plus direction.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    column: String,
    direction: Direction,
}

impl OrderBy {
    /// Ascending order on a column.
    pub fn asc(column: &str) -> Result<Self> {
        ident::validate(column)?;
        Ok(Self {
            column: String::from(column),
            direction: Direction::Asc,
        })
    }

    /// Descending order on a column.
    pub fn desc(column: &str) -> Result<Self> {
        ident::validate(column)?;
        Ok(Self {
            column: String::from(column),
            direction: Direction::Desc,
        })
    }

    /// The fragment as SQL text.
    #[must_use]
    pub fn to_sql(&self) -> String {
        match self.direction {
            Direction::Asc => format!("{} ASC", self.column),
            Direction::Desc => format!("{} DESC", self.column),
        }
    }
}
