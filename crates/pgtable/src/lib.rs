//! # pgtable
//!
//! Precomputed PostgreSQL statements for single-table entities.
//!
//! ## Features
//!
//! - **Reflect once**: an entity description becomes a [`Table`] holding its
//!   CREATE/DROP/INSERT/UPSERT/UPDATE/SELECT/DELETE statements
//! - **Dynamic clauses**: WHERE from [`Filters`] (plus one [`RawClause`]),
//!   ORDER BY, LIMIT/OFFSET and SET lists, all with `$n` placeholders
//! - **Deterministic**: filters and assignments are always visited in
//!   ascending field-name order, text and parameters line up
//! - **No I/O**: statements come back as text; [`BuiltQuery`] bundles the
//!   values as `tokio_postgres` parameters
//!
//! ## Example
//!
//! ```ignore
//! use pgtable::{Entity, Filters, Op, Options, Table};
//!
//! #[derive(Entity, Default)]
//! struct User {
//!     id: i64,
//!     #[orm(sql = "uniq type:varchar(320)")]
//!     email: String,
//!     age: i32,
//! }
//!
//! let users = Table::of::<User>(&Options::default());
//! let query = users.select_query(
//!     &["Age", "desc"],
//!     10,
//!     0,
//!     &Filters::new().filter("Email", Op::Like, "%@example.com"),
//! )?;
//! let rows = client.query(&query.sql, &query.params_ref()).await?;
//! ```

pub mod clause;
pub mod entity;
pub mod error;
pub mod naming;
pub mod options;
pub mod params;
pub mod prelude;
pub mod query;
pub mod schema;
pub mod table;
pub mod templates;
pub mod value;

pub use clause::{Assignments, Conjunction, Filter, Filters, Op, RawClause, limit_offset_clause};
pub use entity::{Entity, EntityDef, FieldDef, FieldKind};
pub use error::{BuilderError, BuilderResult};
pub use naming::prettify_create_table;
pub use options::{DEFAULT_TAG_NAME, Options};
pub use query::BuiltQuery;
pub use schema::{ColumnMeta, Schema};
pub use table::Table;
pub use templates::QueryTemplates;
pub use value::{Arg, FromValue, Value};

#[cfg(feature = "derive")]
pub use pgtable_derive::Entity;
