//! Convenient imports for typical `pgtable` usage.
//!
//! ```ignore
//! use pgtable::prelude::*;
//! ```

pub use crate::{
    Assignments, BuilderError, BuilderResult, BuiltQuery, Conjunction, Entity, Filters, Op,
    Options, RawClause, Table, Value,
};
