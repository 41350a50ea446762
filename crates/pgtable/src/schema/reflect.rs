use super::{AUDIT_FIELDS, ColumnFlags, ColumnMeta, ColumnRole, FieldOptions, Schema};
use crate::entity::{EntityDef, FieldKind};
use crate::error::BuilderError;
use crate::naming::{field_to_column, quote_ident, table_name};
use crate::options::Options;
use std::collections::HashMap;

impl Schema {
    /// Reflect an entity description.
    ///
    /// Never fails: problems with the description are recorded and reported by
    /// [`Schema::err`], the columns that could be reflected are kept.
    pub fn reflect(def: &EntityDef, options: &Options) -> Self {
        let entity_name = options.struct_name.as_deref().unwrap_or(&def.name);
        let table = quote_ident(&table_name(entity_name, &options.table_name_prefix));
        let val_tag = options.default_tag_name();

        let mut error: Option<BuilderError> = None;
        let mut record = |err: BuilderError| {
            tracing::warn!(entity = %def.name, error = %err, "invalid entity description");
            error.get_or_insert(err);
        };

        if entity_name.is_empty() {
            record(BuilderError::construction("entity name is empty"));
        }

        let mut columns: Vec<ColumnMeta> = Vec::with_capacity(def.fields.len());
        let mut by_field = HashMap::with_capacity(def.fields.len());
        let mut by_column = HashMap::with_capacity(def.fields.len());
        let mut key = None;
        let mut audit_fields = 0;

        for field in &def.fields {
            if !field.kind.is_supported() {
                tracing::debug!(field = %field.name, kind = %field.kind, "skipping unsupported field");
                continue;
            }

            let column = field_to_column(&field.name);
            if by_field.contains_key(&field.name) || by_column.contains_key(&column) {
                record(BuilderError::construction(format!(
                    "duplicate field '{}' (column \"{}\")",
                    field.name, column
                )));
                continue;
            }

            let opts = FieldOptions::parse(field.tag_value(&options.tag_name).unwrap_or_default());
            for rejected in &opts.rejected_types {
                tracing::debug!(field = %field.name, sql_type = %rejected, "ignoring type override");
            }

            let role = match field.name.as_str() {
                "Id" | "ID" => ColumnRole::Identity,
                "Flags" => ColumnRole::Flags,
                _ => ColumnRole::Regular,
            };
            if role == ColumnRole::Identity {
                key = Some(columns.len());
            }

            if AUDIT_FIELDS.contains(&field.name.as_str()) && field.kind == FieldKind::I64 {
                audit_fields += 1;
            }

            by_field.insert(field.name.clone(), columns.len());
            by_column.insert(column.clone(), columns.len());
            columns.push(ColumnMeta {
                field: field.name.clone(),
                column,
                kind: field.kind.clone(),
                role,
                sql_type: opts.sql_type,
                flags: ColumnFlags {
                    unique: opts.unique,
                    password: opts.password,
                    non_text: field.kind != FieldKind::String,
                },
                default: field
                    .tag_value(&val_tag)
                    .filter(|v| !v.is_empty())
                    .map(str::to_string),
            });
        }

        if columns.is_empty() {
            record(BuilderError::construction(format!(
                "entity '{}' has no supported fields",
                def.name
            )));
        } else if key.is_none() {
            record(BuilderError::construction(format!(
                "entity '{}' has no Id field",
                def.name
            )));
        }

        tracing::debug!(table = %table, columns = columns.len(), "reflected entity schema");

        Schema {
            table,
            columns,
            by_field,
            by_column,
            key,
            has_audit_fields: audit_fields == AUDIT_FIELDS.len(),
            error,
        }
    }
}
