//! Statement composition.
//!
//! `StatementBuilder` turns validated inputs into complete DDL/DML command
//! strings for one table. It never talks to the database: the execution
//! layer feeds each string to the engine exactly once.

use crate::condition::{Condition, OrderBy};
use crate::error::{BuildError, Result};
use crate::frame::Frame;
use crate::ident;
use crate::infer;
use crate::types::SqlType;
use crate::value::Value;

/// Name of the synthesized auto-incrementing identity column.
pub const ID_COLUMN: &str = "id";

/// Sentinel written in place of NULL in text columns, so equality filters
/// see the same literal for missing text as the source data uses for
/// missing numbers.
pub const NULL_TEXT_SENTINEL: &str = "nan";

/// Composes DDL/DML command strings for one table.
#[derive(Debug, Clone)]
pub struct StatementBuilder {
    table: String,
}

impl StatementBuilder {
    /// Creates a builder for the named table.
    pub fn new(table: impl Into<String>) -> Result<Self> {
        let table = table.into();
        ident::validate(&table)?;
        Ok(Self { table })
    }

    /// The table this builder composes commands for.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Composes a CREATE TABLE command.
    ///
    /// When `id_included` is false, an `id INTEGER PRIMARY KEY
    /// AUTOINCREMENT` identity column is synthesized ahead of the supplied
    /// columns; otherwise the supplied columns are taken as complete.
    /// Column order in the command mirrors input order exactly.
    pub fn create_table(
        &self,
        columns: &[String],
        types: &[SqlType],
        id_included: bool,
    ) -> Result<String> {
        if columns.is_empty() {
            return Err(BuildError::NoOp(format!(
                "no columns to create table '{}' from",
                self.table
            )));
        }
        if types.len() != columns.len() {
            return Err(BuildError::ArityMismatch {
                what: format!("column types for table '{}'", self.table),
                expected: columns.len(),
                actual: types.len(),
            });
        }
        ident::validate_all(columns)?;

        let mut defs: Vec<String> = Vec::with_capacity(columns.len() + 1);
        if !id_included {
            defs.push(format!("{ID_COLUMN} INTEGER PRIMARY KEY AUTOINCREMENT"));
        }
        for (column, sql_type) in columns.iter().zip(types) {
            defs.push(format!("{column} {}", sql_type.sqlite_name()));
        }

        Ok(format!("CREATE TABLE {} ({})", self.table, defs.join(", ")))
    }

    /// Composes one batched INSERT covering all of the frame's rows.
    ///
    /// Nulls in text-kind columns are rewritten to [`NULL_TEXT_SENTINEL`]
    /// on a private copy of the payload; the caller's frame is untouched
    /// and nulls in non-text columns stay NULL.
    pub fn insert(&self, frame: &Frame) -> Result<String> {
        if frame.columns().is_empty() {
            return Err(BuildError::NoOp(format!(
                "no columns to insert into '{}'",
                self.table
            )));
        }
        if frame.is_empty() {
            return Err(BuildError::NoOp(format!(
                "no rows to insert into '{}'",
                self.table
            )));
        }
        ident::validate_all(frame.columns())?;

        let rows = sentinel_nulls(frame);
        let tuples: Vec<String> = rows
            .iter()
            .map(|row| {
                let rendered: Vec<String> = row.iter().map(Value::render).collect();
                format!("({})", rendered.join(", "))
            })
            .collect();

        Ok(format!(
            "INSERT INTO {} ({}) VALUES {}",
            self.table,
            frame.columns().join(", "),
            tuples.join(", ")
        ))
    }

    /// Composes an UPDATE from a single-row payload, restricted by the
    /// AND-joined conditions.
    ///
    /// The condition list is mandatory: an empty list is an error, not an
    /// update of the whole table. Only the payload's first row is used;
    /// the sentinel substitution applies as for insert.
    pub fn update(&self, patch: &Frame, conditions: &[Condition]) -> Result<String> {
        if patch.columns().is_empty() {
            return Err(BuildError::NoOp(format!(
                "no columns to update in '{}'",
                self.table
            )));
        }
        if conditions.is_empty() {
            return Err(BuildError::Precondition(format!(
                "no conditions given, update would touch every row of '{}'",
                self.table
            )));
        }
        if patch.is_empty() {
            return Err(BuildError::Precondition(format!(
                "no row values given to update '{}' with",
                self.table
            )));
        }
        ident::validate_all(patch.columns())?;

        let row = sentinel_nulls(patch).swap_remove(0);
        let sets: Vec<String> = patch
            .columns()
            .iter()
            .zip(&row)
            .map(|(column, value)| format!("{column} = {}", value.render()))
            .collect();

        Ok(format!(
            "UPDATE {} SET {} WHERE {}",
            self.table,
            sets.join(", "),
            join_conditions(conditions)
        ))
    }

    /// Composes a SELECT of all columns, optionally filtered, ordered, and
    /// limited. No conditions means a full-table scan.
    #[must_use]
    pub fn select(
        &self,
        conditions: &[Condition],
        order: Option<&OrderBy>,
        limit: Option<i64>,
    ) -> String {
        let mut sql = format!("SELECT * FROM {}", self.table);
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&join_conditions(conditions));
        }
        if let Some(order) = order {
            sql.push_str(" ORDER BY ");
            sql.push_str(&order.to_sql());
        }
        if let Some(limit) = limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        sql
    }

    /// Composes a DELETE, optionally filtered.
    ///
    /// With no conditions the command removes every row; callers opt into
    /// that deliberately.
    #[must_use]
    pub fn delete(&self, conditions: &[Condition]) -> String {
        let mut sql = format!("DELETE FROM {}", self.table);
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&join_conditions(conditions));
        }
        sql
    }

    /// Composes an ALTER TABLE rename.
    pub fn rename_table(&self, new_name: &str) -> Result<String> {
        ident::validate(new_name)?;
        Ok(format!("ALTER TABLE {} RENAME TO {new_name}", self.table))
    }

    /// Composes one ADD COLUMN command per new column.
    ///
    /// Types are explicit here: inference only applies at creation time.
    pub fn add_columns(&self, names: &[String], types: &[SqlType]) -> Result<Vec<String>> {
        if names.is_empty() {
            return Err(BuildError::NoOp(format!(
                "no columns to add to '{}'",
                self.table
            )));
        }
        if types.len() != names.len() {
            return Err(BuildError::ArityMismatch {
                what: format!("column types for table '{}'", self.table),
                expected: names.len(),
                actual: types.len(),
            });
        }
        ident::validate_all(names)?;

        Ok(names
            .iter()
            .zip(types)
            .map(|(name, sql_type)| {
                format!(
                    "ALTER TABLE {} ADD COLUMN {name} {}",
                    self.table,
                    sql_type.sqlite_name()
                )
            })
            .collect())
    }

    /// Composes one RENAME COLUMN command per changed position.
    ///
    /// Positions where the old and new names already match are skipped, so
    /// re-running the same rename list is harmless; the rest rename in
    /// their given order.
    pub fn rename_columns(&self, old: &[String], new: &[String]) -> Result<Vec<String>> {
        if old.is_empty() {
            return Err(BuildError::NoOp(format!(
                "no columns to rename in '{}'",
                self.table
            )));
        }
        if new.len() != old.len() {
            return Err(BuildError::ArityMismatch {
                what: format!("new column names for table '{}'", self.table),
                expected: old.len(),
                actual: new.len(),
            });
        }
        ident::validate_all(old)?;
        ident::validate_all(new)?;

        Ok(old
            .iter()
            .zip(new)
            .filter(|(from, to)| from != to)
            .map(|(from, to)| {
                format!(
                    "ALTER TABLE {} RENAME COLUMN {from} TO {to}",
                    self.table
                )
            })
            .collect())
    }

    /// Composes one DROP COLUMN command per name.
    pub fn drop_columns(&self, names: &[String]) -> Result<Vec<String>> {
        if names.is_empty() {
            return Err(BuildError::NoOp(format!(
                "no columns to drop from '{}'",
                self.table
            )));
        }
        ident::validate_all(names)?;

        Ok(names
            .iter()
            .map(|name| format!("ALTER TABLE {} DROP COLUMN {name}", self.table))
            .collect())
    }

    /// Composes a DROP TABLE command.
    #[must_use]
    pub fn drop_table(&self) -> String {
        format!("DROP TABLE {}", self.table)
    }
}

fn join_conditions(conditions: &[Condition]) -> String {
    conditions
        .iter()
        .map(Condition::as_sql)
        .collect::<Vec<_>>()
        .join(" AND ")
}

/// Copies the frame's rows, rewriting NULL to the text sentinel in columns
/// whose sampled kind is text.
fn sentinel_nulls(frame: &Frame) -> Vec<Vec<Value>> {
    let text_column = infer::text_columns(frame);
    frame
        .rows()
        .iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(i, value)| {
                    if text_column[i] && value.is_null() {
                        Value::Text(String::from(NULL_TEXT_SENTINEL))
                    } else {
                        value.clone()
                    }
                })
                .collect()
        })
        .collect()
}
