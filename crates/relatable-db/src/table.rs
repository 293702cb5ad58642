//! Table-scoped database sessions.
//!
//! A [`Table`] binds one table name to one open SQLite session and exposes
//! one operation per command the statement layer composes. Every operation
//! issues exactly one statement (or one ordered statement list for the
//! multi-column alterations) and waits for it before returning; the handle
//! is meant for a single logical caller.

use std::path::Path;

use relatable_core::condition::{Condition, OrderBy};
use relatable_core::frame::Frame;
use relatable_core::infer;
use relatable_core::statement::StatementBuilder;
use relatable_core::types::SqlType;
use relatable_core::value::Value;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, TypeInfo, ValueRef};
use tracing::{debug, info};

use crate::error::{Result, TableError};
use crate::flatfile;

/// A caller-owned binding of a table name to an open database session.
///
/// The name may change in place through [`Table::rename`]; the session
/// stays the same until [`Table::close`] releases it, after which every
/// operation fails with [`TableError::Closed`].
pub struct Table {
    name: String,
    pool: SqlitePool,
    closed: bool,
}

impl Table {
    /// Opens a session against the database URL, scoped to the named
    /// table.
    ///
    /// The session holds a single connection: operations on one handle
    /// never overlap.
    pub async fn connect(url: &str, name: &str) -> Result<Self> {
        let builder = StatementBuilder::new(name)?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(url)
            .await?;
        info!(table = builder.table(), "session opened");
        Ok(Self {
            name: String::from(builder.table()),
            pool,
            closed: false,
        })
    }

    /// The table this handle is scoped to.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Creates the table, inferring column types from the sample frame.
    ///
    /// When `id_included` is false an auto-incrementing `id` identity
    /// column is synthesized ahead of the frame's columns. A
    /// duplicate-relation failure from the engine is reported as
    /// [`TableError::AlreadyExists`].
    pub async fn create(&self, sample: &Frame, id_included: bool) -> Result<()> {
        let types = infer::column_types(sample)?;
        self.create_with_types(sample.columns(), &types, id_included)
            .await
    }

    /// Creates the table with explicit column types.
    pub async fn create_with_types(
        &self,
        columns: &[String],
        types: &[SqlType],
        id_included: bool,
    ) -> Result<()> {
        let sql = self.builder()?.create_table(columns, types, id_included)?;
        self.execute(&sql).await?;
        info!(table = %self.name, columns = columns.len(), "table created");
        Ok(())
    }

    /// Inserts all of the frame's rows in one batched command, returning
    /// the inserted-row count. An empty frame is a no-op reporting zero.
    pub async fn insert(&self, frame: &Frame) -> Result<u64> {
        let builder = self.builder()?;
        if frame.is_empty() {
            info!(table = %self.name, "no rows to insert");
            return Ok(0);
        }
        let sql = builder.insert(frame)?;
        let inserted = self.execute(&sql).await?;
        info!(table = %self.name, rows = inserted, "rows inserted");
        Ok(inserted)
    }

    /// Fetches rows, optionally filtered, ordered, and limited.
    ///
    /// The result's column labels come from the live schema at call time,
    /// ordered by ordinal position, so they track renames and added
    /// columns.
    pub async fn query(
        &self,
        conditions: &[Condition],
        order: Option<&OrderBy>,
        limit: Option<i64>,
    ) -> Result<Frame> {
        let sql = self.builder()?.select(conditions, order, limit);
        debug!(sql = %sql, "executing");
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| classify(e, &self.name))?;

        let mut frame = Frame::new(self.columns().await?);
        for row in &rows {
            frame.push_row(decode_row(row)?)?;
        }
        info!(table = %self.name, rows = frame.len(), "query complete");
        Ok(frame)
    }

    /// Updates matching rows from a single-row payload, returning the
    /// affected-row count.
    ///
    /// Non-empty conditions and a payload row are required; the
    /// precondition failure surfaces before anything reaches the
    /// database.
    pub async fn update(&self, patch: &Frame, conditions: &[Condition]) -> Result<u64> {
        let sql = self.builder()?.update(patch, conditions)?;
        let updated = self.execute(&sql).await?;
        info!(table = %self.name, rows = updated, "rows updated");
        Ok(updated)
    }

    /// Deletes matching rows, returning the removed-row count.
    ///
    /// With no conditions every row is removed; that is the deliberate
    /// opt-in for clearing a table.
    pub async fn delete(&self, conditions: &[Condition]) -> Result<u64> {
        let sql = self.builder()?.delete(conditions);
        let removed = self.execute(&sql).await?;
        info!(table = %self.name, rows = removed, "rows deleted");
        Ok(removed)
    }

    /// Renames the table, keeping the handle's name in step.
    ///
    /// Renaming to the current name returns early without touching the
    /// database.
    pub async fn rename(&mut self, new_name: &str) -> Result<()> {
        let builder = self.builder()?;
        if new_name == self.name {
            info!(table = %self.name, "table already has this name");
            return Ok(());
        }
        let sql = builder.rename_table(new_name)?;
        self.execute(&sql).await?;
        self.name = String::from(new_name);
        info!(table = %self.name, "table renamed");
        Ok(())
    }

    /// Adds new columns with explicit types.
    pub async fn add_columns(&self, names: &[String], types: &[SqlType]) -> Result<()> {
        let statements = self.builder()?.add_columns(names, types)?;
        for sql in &statements {
            self.execute(sql).await?;
        }
        info!(table = %self.name, columns = names.len(), "columns added");
        Ok(())
    }

    /// Renames columns pairwise, skipping positions where the name is
    /// unchanged. Returns how many renames were actually issued.
    pub async fn rename_columns(&self, old: &[String], new: &[String]) -> Result<usize> {
        let statements = self.builder()?.rename_columns(old, new)?;
        for sql in &statements {
            self.execute(sql).await?;
        }
        info!(table = %self.name, renamed = statements.len(), "columns renamed");
        Ok(statements.len())
    }

    /// Drops the named columns.
    pub async fn drop_columns(&self, names: &[String]) -> Result<()> {
        let statements = self.builder()?.drop_columns(names)?;
        for sql in &statements {
            self.execute(sql).await?;
        }
        info!(table = %self.name, columns = names.len(), "columns dropped");
        Ok(())
    }

    /// Drops the whole table.
    pub async fn drop_table(&self) -> Result<()> {
        let sql = self.builder()?.drop_table();
        self.execute(&sql).await?;
        info!(table = %self.name, "table dropped");
        Ok(())
    }

    /// The table's column names from live schema metadata, ordered by
    /// ordinal position. Never cached.
    pub async fn columns(&self) -> Result<Vec<String>> {
        if self.closed {
            return Err(TableError::Closed);
        }
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT name FROM pragma_table_info(?) ORDER BY cid")
                .bind(&self.name)
                .fetch_all(&self.pool)
                .await?;
        if rows.is_empty() {
            return Err(TableError::NoSuchTable(self.name.clone()));
        }
        Ok(rows.into_iter().map(|(name,)| name).collect())
    }

    /// Exports the whole table to a delimited flat file, returning the
    /// row count written.
    pub async fn export(&self, path: &Path) -> Result<u64> {
        let frame = self.query(&[], None, None).await?;
        flatfile::write_frame(path, &frame, ',')?;
        info!(table = %self.name, path = %path.display(), rows = frame.len(), "table exported");
        Ok(frame.len() as u64)
    }

    /// Releases the session. Succeeds exactly once; afterwards every
    /// operation, including a second close, fails with
    /// [`TableError::Closed`].
    pub async fn close(&mut self) -> Result<()> {
        if self.closed {
            return Err(TableError::Closed);
        }
        self.pool.close().await;
        self.closed = true;
        info!(table = %self.name, "session closed");
        Ok(())
    }

    fn builder(&self) -> Result<StatementBuilder> {
        if self.closed {
            return Err(TableError::Closed);
        }
        Ok(StatementBuilder::new(&self.name)?)
    }

    async fn execute(&self, sql: &str) -> Result<u64> {
        debug!(sql = %sql, "executing");
        let done = sqlx::query(sql)
            .execute(&self.pool)
            .await
            .map_err(|e| classify(e, &self.name))?;
        Ok(done.rows_affected())
    }
}

/// Converts recognized structural engine failures into typed outcomes;
/// everything else passes through with the original message.
fn classify(err: sqlx::Error, table: &str) -> TableError {
    if let sqlx::Error::Database(db) = &err {
        let message = db.message();
        if let Some(column) = message.strip_prefix("duplicate column name: ") {
            return TableError::DuplicateColumn {
                table: String::from(table),
                column: String::from(column),
            };
        }
        if message.contains("already exists") {
            return TableError::AlreadyExists(String::from(table));
        }
        if message.contains("no such table") {
            return TableError::NoSuchTable(String::from(table));
        }
    }
    TableError::Engine(err)
}

/// Decodes one result row into scalar values, by each column's reported
/// type.
fn decode_row(row: &SqliteRow) -> Result<Vec<Value>> {
    (0..row.len())
        .map(|i| {
            let raw = row.try_get_raw(i)?;
            if raw.is_null() {
                return Ok(Value::Null);
            }
            let value = match raw.type_info().name() {
                "INTEGER" => Value::Int(row.try_get(i)?),
                "REAL" | "NUMERIC" => Value::Float(row.try_get(i)?),
                "BOOLEAN" => Value::Bool(row.try_get(i)?),
                _ => Value::Text(row.try_get(i)?),
            };
            Ok(value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use relatable_core::error::BuildError;

    async fn open(name: &str) -> Table {
        Table::connect("sqlite::memory:", name)
            .await
            .expect("failed to open in-memory session")
    }

    fn players_sample() -> Frame {
        Frame::with_rows(
            vec!["name".into(), "score".into()],
            vec![
                vec![Value::Text("alice".into()), Value::Float(9.5)],
                vec![Value::Text("bob".into()), Value::Float(7.0)],
                vec![Value::Text("carol".into()), Value::Float(8.25)],
            ],
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_synthesizes_identity_column() {
        let table = open("players").await;
        table.create(&players_sample(), false).await.unwrap();

        let columns = table.columns().await.unwrap();
        assert_eq!(columns, vec!["id", "name", "score"]);
    }

    #[tokio::test]
    async fn test_create_twice_reports_already_exists() {
        let table = open("players").await;
        table.create(&players_sample(), false).await.unwrap();

        let err = table.create(&players_sample(), false).await.unwrap_err();
        assert!(matches!(err, TableError::AlreadyExists(name) if name == "players"));
    }

    #[tokio::test]
    async fn test_insert_and_query_round_trip() {
        let table = open("players").await;
        let sample = players_sample();
        table.create(&sample, false).await.unwrap();

        assert_eq!(table.insert(&sample).await.unwrap(), 3);

        let frame = table.query(&[], None, None).await.unwrap();
        assert_eq!(frame.columns(), &["id", "name", "score"]);
        assert_eq!(frame.len(), 3);
        assert_eq!(frame.rows()[0][1], Value::Text("alice".into()));
        assert_eq!(frame.rows()[0][2], Value::Float(9.5));
    }

    #[tokio::test]
    async fn test_insert_empty_frame_is_zero_count_no_op() {
        let table = open("players").await;
        table.create(&players_sample(), false).await.unwrap();

        let empty = Frame::new(vec!["name".into(), "score".into()]);
        assert_eq!(table.insert(&empty).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_query_with_condition_order_and_limit() {
        let table = open("players").await;
        let sample = players_sample();
        table.create(&sample, false).await.unwrap();
        table.insert(&sample).await.unwrap();

        let conditions = [Condition::greater_than("score", 7.5_f64).unwrap()];
        let order = OrderBy::desc("score").unwrap();
        let frame = table
            .query(&conditions, Some(&order), Some(1))
            .await
            .unwrap();

        assert_eq!(frame.len(), 1);
        assert_eq!(frame.rows()[0][1], Value::Text("alice".into()));
    }

    #[tokio::test]
    async fn test_null_stays_null_in_number_column() {
        let table = open("readings").await;
        let sample = Frame::with_rows(
            vec!["x".into()],
            vec![vec![Value::Float(1.0)], vec![Value::Null]],
        )
        .unwrap();
        table.create(&sample, false).await.unwrap();
        table.insert(&sample).await.unwrap();

        let frame = table.query(&[], None, None).await.unwrap();
        assert_eq!(frame.rows()[0][1], Value::Float(1.0));
        assert_eq!(frame.rows()[1][1], Value::Null);
    }

    #[tokio::test]
    async fn test_null_becomes_sentinel_in_text_column() {
        let table = open("people").await;
        let sample = Frame::with_rows(
            vec!["name".into()],
            vec![vec![Value::Text("alice".into())], vec![Value::Null]],
        )
        .unwrap();
        table.create(&sample, false).await.unwrap();
        table.insert(&sample).await.unwrap();

        let frame = table.query(&[], None, None).await.unwrap();
        assert_eq!(frame.rows()[1][1], Value::Text("nan".into()));
    }

    #[tokio::test]
    async fn test_update_requires_conditions_and_touches_nothing() {
        let table = open("players").await;
        let sample = players_sample();
        table.create(&sample, false).await.unwrap();
        table.insert(&sample).await.unwrap();

        let patch = Frame::with_rows(
            vec!["score".into()],
            vec![vec![Value::Float(0.0)]],
        )
        .unwrap();
        let err = table.update(&patch, &[]).await.unwrap_err();
        assert!(matches!(
            err,
            TableError::Build(BuildError::Precondition(_))
        ));

        // Data is untouched.
        let frame = table.query(&[], None, None).await.unwrap();
        assert!(frame.rows().iter().all(|r| r[2] != Value::Float(0.0)));
    }

    #[tokio::test]
    async fn test_update_changes_matching_rows() {
        let table = open("players").await;
        let sample = players_sample();
        table.create(&sample, false).await.unwrap();
        table.insert(&sample).await.unwrap();

        let patch = Frame::with_rows(
            vec!["score".into()],
            vec![vec![Value::Float(10.0)]],
        )
        .unwrap();
        let conditions = [Condition::equal("name", ["alice"]).unwrap()];
        assert_eq!(table.update(&patch, &conditions).await.unwrap(), 1);

        let frame = table.query(&conditions, None, None).await.unwrap();
        assert_eq!(frame.rows()[0][2], Value::Float(10.0));
    }

    #[tokio::test]
    async fn test_delete_with_condition_removes_only_matches() {
        let table = open("players").await;
        let sample = players_sample();
        table.create(&sample, false).await.unwrap();
        table.insert(&sample).await.unwrap();

        let conditions = [Condition::equal("name", ["bob"]).unwrap()];
        assert_eq!(table.delete(&conditions).await.unwrap(), 1);

        let frame = table.query(&[], None, None).await.unwrap();
        assert_eq!(frame.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_without_conditions_clears_table() {
        let table = open("players").await;
        let sample = players_sample();
        table.create(&sample, false).await.unwrap();
        table.insert(&sample).await.unwrap();

        assert_eq!(table.delete(&[]).await.unwrap(), 3);
        assert!(table.query(&[], None, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rename_table_updates_handle() {
        let mut table = open("players").await;
        table.create(&players_sample(), false).await.unwrap();

        table.rename("people").await.unwrap();
        assert_eq!(table.name(), "people");
        assert_eq!(
            table.columns().await.unwrap(),
            vec!["id", "name", "score"]
        );
    }

    #[tokio::test]
    async fn test_rename_to_same_name_is_early_no_op() {
        // No table was ever created, so a real rename would fail; the
        // early return means the database is never consulted.
        let mut table = open("players").await;
        table.rename("players").await.unwrap();
        assert_eq!(table.name(), "players");
    }

    #[tokio::test]
    async fn test_add_columns_appends_in_order() {
        let table = open("players").await;
        table.create(&players_sample(), false).await.unwrap();

        table
            .add_columns(
                &["team".into(), "active".into()],
                &[SqlType::Varchar(80), SqlType::Bool],
            )
            .await
            .unwrap();

        assert_eq!(
            table.columns().await.unwrap(),
            vec!["id", "name", "score", "team", "active"]
        );
    }

    #[tokio::test]
    async fn test_add_existing_column_reports_duplicate() {
        let table = open("players").await;
        table.create(&players_sample(), false).await.unwrap();

        let err = table
            .add_columns(&["name".into()], &[SqlType::Varchar(80)])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TableError::DuplicateColumn { column, .. } if column == "name"
        ));
    }

    #[tokio::test]
    async fn test_rename_columns_skips_unchanged() {
        let table = open("players").await;
        table.create(&players_sample(), false).await.unwrap();

        let renamed = table
            .rename_columns(
                &["id".into(), "name".into(), "score".into()],
                &["id".into(), "handle".into(), "score".into()],
            )
            .await
            .unwrap();

        assert_eq!(renamed, 1);
        assert_eq!(
            table.columns().await.unwrap(),
            vec!["id", "handle", "score"]
        );
    }

    #[tokio::test]
    async fn test_drop_columns() {
        let table = open("players").await;
        table.create(&players_sample(), false).await.unwrap();

        table.drop_columns(&["score".into()]).await.unwrap();
        assert_eq!(table.columns().await.unwrap(), vec!["id", "name"]);
    }

    #[tokio::test]
    async fn test_drop_table_then_columns_reports_missing() {
        let table = open("players").await;
        table.create(&players_sample(), false).await.unwrap();
        table.drop_table().await.unwrap();

        let err = table.columns().await.unwrap_err();
        assert!(matches!(err, TableError::NoSuchTable(name) if name == "players"));
    }

    #[tokio::test]
    async fn test_query_missing_table_is_typed() {
        let table = open("ghosts").await;
        let err = table.query(&[], None, None).await.unwrap_err();
        assert!(matches!(err, TableError::NoSuchTable(_)));
    }

    #[tokio::test]
    async fn test_closed_handle_rejects_everything() {
        let mut table = open("players").await;
        table.create(&players_sample(), false).await.unwrap();
        table.close().await.unwrap();

        assert!(matches!(
            table.query(&[], None, None).await.unwrap_err(),
            TableError::Closed
        ));
        assert!(matches!(
            table.insert(&players_sample()).await.unwrap_err(),
            TableError::Closed
        ));
        assert!(matches!(
            table.columns().await.unwrap_err(),
            TableError::Closed
        ));
        assert!(matches!(table.close().await.unwrap_err(), TableError::Closed));
    }

    #[tokio::test]
    async fn test_bit_column_round_trips_as_bool() {
        let table = open("flags").await;
        let sample = Frame::with_rows(
            vec!["active".into()],
            vec![vec![Value::Bool(true)], vec![Value::Bool(false)]],
        )
        .unwrap();
        table.create(&sample, false).await.unwrap();
        table.insert(&sample).await.unwrap();

        let frame = table.query(&[], None, None).await.unwrap();
        assert_eq!(frame.rows()[0][1], Value::Bool(true));
        assert_eq!(frame.rows()[1][1], Value::Bool(false));
    }
}
