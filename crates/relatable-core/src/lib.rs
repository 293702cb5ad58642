//! Typed SQL statement construction and schema inference for tabular data.
//!
//! `relatable-core` is the pure half of the `relatable` workspace: it turns
//! in-memory tabular datasets and structured filter/order descriptors into
//! complete DDL/DML command strings, and infers column storage types from
//! sampled values. Nothing in this crate talks to a database.
//!
//! # Architecture
//!
//! - **[`frame`]** - `Frame`, the ordered columns + ordered rows dataset
//!   every operation consumes or produces
//! - **[`value`]** - the closed set of scalar kinds a cell can hold, with
//!   escaped SQL rendering
//! - **[`types`]** - the column storage-type enumeration assigned at table
//!   creation
//! - **[`infer`]** - first-non-null type sampling over a frame
//! - **[`condition`]** - composable filter predicates and order fragments
//! - **[`statement`]** - `StatementBuilder`, composing one command string
//!   per table operation
//!
//! # Example
//!
//! ```
//! use relatable_core::prelude::*;
//!
//! let frame = Frame::with_rows(
//!     vec!["name".into(), "score".into()],
//!     vec![vec![Value::Text("alice".into()), Value::Float(9.5)]],
//! )?;
//!
//! let types = infer::column_types(&frame)?;
//! let builder = StatementBuilder::new("players")?;
//! let sql = builder.create_table(frame.columns(), &types, false)?;
//! assert!(sql.starts_with("CREATE TABLE players"));
//! # Ok::<(), relatable_core::error::BuildError>(())
//! ```

pub mod condition;
pub mod error;
pub mod frame;
pub mod ident;
pub mod infer;
pub mod statement;
pub mod types;
pub mod value;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::condition::{Bounds, Condition, Direction, OrderBy};
    pub use crate::error::{BuildError, Result};
    pub use crate::frame::Frame;
    pub use crate::infer;
    pub use crate::statement::{StatementBuilder, ID_COLUMN, NULL_TEXT_SENTINEL};
    pub use crate::types::SqlType;
    pub use crate::value::Value;
}
