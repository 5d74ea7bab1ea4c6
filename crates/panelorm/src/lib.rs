//! # panelorm
//!
//! A field-mapped, single-shot SQL query builder for admin-panel CRUD screens.
//!
//! ## Features
//!
//! - **Logical field maps**: screens talk logical names, the builder maps them
//!   to physical columns (and aliases results back to logical names)
//! - **Single-shot chains**: one builder per logical query — chain, `get()`,
//!   discard
//! - **Explicit dispatch**: `get()` routes on the recorded operation tag to
//!   the matching finisher; an empty chain is an error, never a silent
//!   fallback
//! - **Safe defaults**: every value is a bound parameter, every identifier is
//!   validated, update/delete without an id is rejected before any I/O
//! - **Injected execution**: the [`Executor`] trait is the sole I/O boundary —
//!   a `tokio-postgres` client in production, a scripted [`MockExecutor`] in
//!   tests
//!
//! ## Usage
//!
//! ```ignore
//! use panelorm::{Direction, FieldMap, QueryBuilder, row};
//!
//! let users = QueryBuilder::new(
//!     "users",
//!     FieldMap::new([("id", "id"), ("name", "full_name")])?,
//! )?;
//!
//! // INSERT
//! let created = users
//!     .clone()
//!     .create(row! { "name" => "Ana" })
//!     .get(&exec)
//!     .await?;
//!
//! // SELECT
//! let rows = users
//!     .clone()
//!     .read(row! { "name" => "Ana" })
//!     .order_by("full_name", Direction::Asc)
//!     .fetch(&exec)
//!     .await?;
//!
//! // UPDATE
//! users
//!     .clone()
//!     .update(row! { "id" => 1, "name" => "Bea" })
//!     .get(&exec)
//!     .await?;
//!
//! // upsert-with-diff-check
//! let row = users.get_or_create(row! { "id" => 1, "name" => "Bea" }, &exec).await?;
//! ```

pub mod builder;
pub mod error;
pub mod executor;
pub mod field_map;
mod ident;
pub mod row;
pub mod value;

pub use builder::{Direction, Op, Operation, Outcome, QueryBuilder};
pub use error::{OrmError, OrmResult};
pub use executor::{Executor, MockExecutor, RecordedStatement, StatementKind};
pub use field_map::{ColumnSpec, FieldMap};
pub use row::Row;
pub use value::Value;

#[cfg(feature = "postgres")]
pub mod pg;

#[cfg(feature = "postgres")]
pub use pg::PgExecutor;
