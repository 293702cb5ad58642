//! Table-scoped database sessions for tabular data.
//!
//! `relatable-db` is the executing half of the `relatable` workspace: it
//! binds a table name to one SQLite session and exposes one operation per
//! command the core statement layer composes, marshaling results back into
//! frames.
//!
//! # Architecture
//!
//! - **[`table`]** - `Table`, the caller-owned handle: create, insert,
//!   query, update, delete, schema alterations, export, close
//! - **[`flatfile`]** - delimited-file import/export of frames
//! - **[`error`]** - typed outcomes for recognized engine failures, with
//!   an opaque passthrough for everything else
//!
//! # Example
//!
//! ```ignore
//! use relatable_core::prelude::*;
//! use relatable_db::table::Table;
//!
//! let mut table = Table::connect("sqlite:db.sqlite3", "players").await?;
//! let frame = Frame::with_rows(
//!     vec!["name".into(), "score".into()],
//!     vec![vec![Value::Text("alice".into()), Value::Float(9.5)]],
//! )?;
//! table.create(&frame, false).await?;
//! table.insert(&frame).await?;
//! let rows = table.query(&[], None, None).await?;
//! table.close().await?;
//! ```

pub mod error;
pub mod flatfile;
pub mod table;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{Result, TableError};
    pub use crate::flatfile;
    pub use crate::table::Table;
}
