//! Reflected table schema.
//!
//! A [`Schema`] is built once per entity from its [`EntityDef`](crate::EntityDef)
//! and is immutable afterwards. It keeps the columns in declaration order and
//! both field→column and column→field lookups.

mod column;
mod reflect;

pub use column::{ColumnFlags, ColumnMeta, ColumnRole, FieldOptions, is_allowed_sql_type};

use crate::error::BuilderError;
use crate::naming::quote_ident;
use std::collections::HashMap;

/// Column name of the identity primary key.
pub const KEY_COLUMN: &str = "id";

/// Field names that make up the audit set.
pub const AUDIT_FIELDS: [&str; 4] = ["CreatedAt", "CreatedBy", "ModifiedAt", "ModifiedBy"];

/// Column metadata and table-level flags of one entity.
#[derive(Debug, Clone)]
pub struct Schema {
    table: String,
    columns: Vec<ColumnMeta>,
    by_field: HashMap<String, usize>,
    by_column: HashMap<String, usize>,
    key: Option<usize>,
    has_audit_fields: bool,
    error: Option<BuilderError>,
}

impl Schema {
    /// The double-quoted table name.
    pub fn table_name(&self) -> &str {
        &self.table
    }

    /// Columns in declaration order.
    pub fn columns(&self) -> &[ColumnMeta] {
        &self.columns
    }

    /// Column metadata for a field name.
    pub fn column(&self, field: &str) -> Option<&ColumnMeta> {
        self.by_field.get(field).map(|&i| &self.columns[i])
    }

    /// Column name for a field name.
    pub fn field_to_column(&self, field: &str) -> Option<&str> {
        self.column(field).map(|c| c.column.as_str())
    }

    /// Field name for a column name.
    pub fn column_to_field(&self, column: &str) -> Option<&str> {
        self.by_column
            .get(column)
            .map(|&i| self.columns[i].field.as_str())
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.by_field.contains_key(field)
    }

    /// The identity column, if the entity declares one.
    pub fn key(&self) -> Option<&ColumnMeta> {
        self.key.map(|i| &self.columns[i])
    }

    /// The double-quoted primary key column.
    pub fn key_quoted(&self) -> String {
        self.key()
            .map(ColumnMeta::quoted)
            .unwrap_or_else(|| quote_ident(KEY_COLUMN))
    }

    /// Columns other than the identity column, in declaration order.
    pub fn non_key_columns(&self) -> impl Iterator<Item = &ColumnMeta> {
        self.columns.iter().filter(|c| !c.is_identity())
    }

    /// Whether all of `CreatedAt`, `CreatedBy`, `ModifiedAt` and `ModifiedBy`
    /// are present as `i64` fields.
    pub fn has_audit_fields(&self) -> bool {
        self.has_audit_fields
    }

    /// Fields with the `uniq` option, in declaration order.
    pub fn unique_fields(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.flags.unique)
            .map(|c| c.field.as_str())
            .collect()
    }

    /// Fields with the `pass` option, in declaration order.
    pub fn password_fields(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.flags.password)
            .map(|c| c.field.as_str())
            .collect()
    }

    /// The error recorded while reflecting, if any.
    pub fn err(&self) -> Option<&BuilderError> {
        self.error.as_ref()
    }
}
