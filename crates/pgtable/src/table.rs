//! The per-entity facade: reflected schema plus precomputed statements.

use crate::clause::{Assignments, Filters, limit_offset_clause};
use crate::entity::{Entity, EntityDef};
use crate::error::{BuilderError, BuilderResult};
use crate::options::Options;
use crate::params::{filter_values, set_values, update_values};
use crate::query::BuiltQuery;
use crate::schema::{ColumnMeta, Schema};
use crate::templates::QueryTemplates;
use crate::value::Value;

/// Statements for one entity's table.
///
/// Built once, immutable afterwards and safe to share between threads. A
/// description problem does not prevent construction: the fixed statements
/// stay available, while [`Table::err`] reports the problem and every
/// dynamic builder returns it.
///
/// # Example
///
/// ```
/// use pgtable::{EntityDef, FieldDef, FieldKind, Filters, Op, Options, Table};
///
/// let def = EntityDef::new("Product")
///     .field(FieldDef::new("ID", FieldKind::I64))
///     .field(FieldDef::new("Price", FieldKind::I64))
///     .field(FieldDef::new("Age", FieldKind::I32));
/// let table = Table::new(&def, &Options::default());
/// assert!(table.err().is_none());
///
/// let sql = table
///     .select(&["Age", "desc"], 5, 0, &Filters::new().filter("Price", Op::Equal, 10))
///     .unwrap();
/// assert_eq!(
///     sql,
///     r#"SELECT "id","price","age" FROM "product" WHERE "price"=$1 ORDER BY "age" DESC LIMIT 5;"#
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Table {
    schema: Schema,
    templates: QueryTemplates,
}

impl Table {
    /// Reflect `def` and precompute its statements.
    pub fn new(def: &EntityDef, options: &Options) -> Self {
        let schema = Schema::reflect(def, options);
        let templates = QueryTemplates::build(&schema);
        Self { schema, templates }
    }

    /// Reflect a type implementing [`Entity`].
    pub fn of<T: Entity>(options: &Options) -> Self {
        Self::new(&T::entity_def(), options)
    }

    /// The error recorded while reflecting the entity, if any.
    pub fn err(&self) -> Option<&BuilderError> {
        self.schema.err()
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn templates(&self) -> &QueryTemplates {
        &self.templates
    }

    fn check(&self) -> BuilderResult<()> {
        match self.schema.err() {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    // ==================== Fixed statements ====================

    pub fn drop_table(&self) -> String {
        self.templates.drop_table()
    }

    pub fn create_table(&self) -> String {
        self.templates.create_table()
    }

    pub fn insert(&self) -> String {
        self.templates.insert()
    }

    pub fn update_by_id(&self) -> String {
        self.templates.update_by_id()
    }

    pub fn insert_on_conflict_update(&self) -> String {
        self.templates.insert_on_conflict_update()
    }

    pub fn select_by_id(&self) -> String {
        self.templates.select_by_id()
    }

    pub fn delete_by_id(&self) -> String {
        self.templates.delete_by_id()
    }

    // ==================== Dynamic statements ====================

    /// SELECT with WHERE built from `filters`, then ORDER BY and LIMIT/OFFSET.
    ///
    /// Columns are listed in declaration order; filter placeholders follow
    /// ascending field-name order, see [`Table::filter_values`].
    pub fn select(
        &self,
        order: &[&str],
        limit: u64,
        offset: u64,
        filters: &Filters,
    ) -> BuilderResult<String> {
        self.check()?;

        let order_sql = self.schema.order_clause(order).map_err(|e| e.in_op("Select"))?;
        let where_sql = self
            .schema
            .filter_clause(filters, 1)
            .map_err(|e| e.in_op("Select"))?;
        let limit_sql = limit_offset_clause(limit, offset);

        let mut sql = self.templates.select_prefix().to_string();
        push_clause(&mut sql, "WHERE", &where_sql);
        push_clause(&mut sql, "ORDER BY", &order_sql);
        if !limit_sql.is_empty() {
            sql.push(' ');
            sql.push_str(&limit_sql);
        }
        sql.push(';');
        tracing::trace!(sql = %sql, "built select");
        Ok(sql)
    }

    /// `SELECT COUNT(*) AS cnt` with WHERE built from `filters`.
    pub fn select_count(&self, filters: &Filters) -> BuilderResult<String> {
        self.check()?;
        let where_sql = self
            .schema
            .filter_clause(filters, 1)
            .map_err(|e| e.in_op("SelectCount"))?;

        let mut sql = self.templates.select_count_prefix().to_string();
        push_clause(&mut sql, "WHERE", &where_sql);
        sql.push(';');
        Ok(sql)
    }

    /// DELETE with WHERE built from `filters`.
    pub fn delete(&self, filters: &Filters) -> BuilderResult<String> {
        let mut sql = self.delete_unterminated(filters, "Delete")?;
        sql.push(';');
        Ok(sql)
    }

    /// DELETE with WHERE built from `filters`, `RETURNING` the key.
    pub fn delete_returning_id(&self, filters: &Filters) -> BuilderResult<String> {
        let mut sql = self.delete_unterminated(filters, "DeleteReturningId")?;
        sql.push_str(" RETURNING ");
        sql.push_str(&self.schema.key_quoted());
        sql.push(';');
        Ok(sql)
    }

    fn delete_unterminated(&self, filters: &Filters, op: &'static str) -> BuilderResult<String> {
        self.check()?;
        let where_sql = self
            .schema
            .filter_clause(filters, 1)
            .map_err(|e| e.in_op(op))?;

        let mut sql = self.templates.delete_prefix().to_string();
        push_clause(&mut sql, "WHERE", &where_sql);
        Ok(sql)
    }

    /// UPDATE of the fields in `values` (sorted by name, numbered from `$1`)
    /// with WHERE built from `filters`, numbered after the SET list.
    pub fn update(&self, values: &Assignments, filters: &Filters) -> BuilderResult<String> {
        self.check()?;
        let (set_sql, used) = self
            .schema
            .set_clause(values)
            .map_err(|e| e.in_op("Update"))?;
        let where_sql = self
            .schema
            .filter_clause(filters, used + 1)
            .map_err(|e| e.in_op("Update"))?;

        let mut sql = self.templates.update_prefix().to_string();
        sql.push(' ');
        sql.push_str(&set_sql);
        push_clause(&mut sql, "WHERE", &where_sql);
        sql.push(';');
        Ok(sql)
    }

    // ==================== Statements with parameters ====================

    pub fn select_query(
        &self,
        order: &[&str],
        limit: u64,
        offset: u64,
        filters: &Filters,
    ) -> BuilderResult<BuiltQuery> {
        let sql = self.select(order, limit, offset, filters)?;
        Ok(BuiltQuery::new(sql, filter_values(filters)))
    }

    pub fn select_count_query(&self, filters: &Filters) -> BuilderResult<BuiltQuery> {
        let sql = self.select_count(filters)?;
        Ok(BuiltQuery::new(sql, filter_values(filters)))
    }

    pub fn delete_query(&self, filters: &Filters) -> BuilderResult<BuiltQuery> {
        let sql = self.delete(filters)?;
        Ok(BuiltQuery::new(sql, filter_values(filters)))
    }

    pub fn delete_returning_id_query(&self, filters: &Filters) -> BuilderResult<BuiltQuery> {
        let sql = self.delete_returning_id(filters)?;
        Ok(BuiltQuery::new(sql, filter_values(filters)))
    }

    pub fn update_query(&self, values: &Assignments, filters: &Filters) -> BuilderResult<BuiltQuery> {
        let sql = self.update(values, filters)?;
        Ok(BuiltQuery::new(sql, update_values(values, filters)))
    }

    /// Values for the placeholders of any filter-driven statement.
    pub fn filter_values(&self, filters: &Filters) -> Vec<Value> {
        filter_values(filters)
    }

    /// Values for the SET list of [`Table::update`].
    pub fn set_values(&self, values: &Assignments) -> Vec<Value> {
        set_values(values)
    }

    /// Values for [`Table::update`]: the SET values, then the WHERE values.
    pub fn update_values(&self, values: &Assignments, filters: &Filters) -> Vec<Value> {
        update_values(values, filters)
    }

    // ==================== Entity values ====================

    fn entity_values<'a, T: Entity>(
        &self,
        entity: &T,
        columns: impl Iterator<Item = &'a ColumnMeta>,
    ) -> BuilderResult<Vec<Value>> {
        columns
            .map(|c| {
                entity
                    .field_value(&c.field)
                    .ok_or_else(|| BuilderError::invalid_field("entity", &c.field))
            })
            .collect()
    }

    /// Values for [`Table::insert`]: every non-key field in declaration order.
    pub fn insert_values<T: Entity>(&self, entity: &T) -> BuilderResult<Vec<Value>> {
        self.entity_values(entity, self.schema.non_key_columns())
    }

    /// Values for [`Table::update_by_id`]: the non-key fields, then the key.
    pub fn update_by_id_values<T: Entity>(&self, entity: &T) -> BuilderResult<Vec<Value>> {
        let mut values = self.entity_values(entity, self.schema.non_key_columns())?;
        values.extend(self.entity_values(entity, self.schema.key().into_iter())?);
        Ok(values)
    }

    /// Values for [`Table::insert_on_conflict_update`]: every field, then the
    /// non-key fields again for the update list.
    pub fn insert_on_conflict_update_values<T: Entity>(
        &self,
        entity: &T,
    ) -> BuilderResult<Vec<Value>> {
        let mut values = self.entity_values(entity, self.schema.columns().iter())?;
        values.extend(self.entity_values(entity, self.schema.non_key_columns())?);
        Ok(values)
    }

    /// Assign `values` onto `entity`.
    ///
    /// Fields that are not columns of this table are skipped. Every
    /// assignable field is set; the first mismatch is returned afterwards.
    pub fn apply_values<T: Entity>(&self, entity: &mut T, values: &Assignments) -> BuilderResult<()> {
        let mut first_err = None;
        for (field, value) in values.iter() {
            if !self.schema.has_field(field) {
                continue;
            }
            if let Err(err) = entity.set_field(field, value.clone()) {
                first_err.get_or_insert(err);
            }
        }
        match first_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Parse `input` as a value of `field`'s kind.
    pub fn value_from_str(&self, field: &str, input: &str) -> Option<Value> {
        let column = self.schema.column(field)?;
        Value::parse(&column.kind, input)
    }

    // ==================== Introspection ====================

    /// The double-quoted table name.
    pub fn table_name(&self) -> &str {
        self.schema.table_name()
    }

    /// Supported columns in declaration order.
    pub fn columns(&self) -> &[ColumnMeta] {
        self.schema.columns()
    }

    pub fn field_to_column(&self, field: &str) -> Option<&str> {
        self.schema.field_to_column(field)
    }

    pub fn column_to_field(&self, column: &str) -> Option<&str> {
        self.schema.column_to_field(column)
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.schema.has_field(field)
    }

    pub fn unique_fields(&self) -> Vec<&str> {
        self.schema.unique_fields()
    }

    pub fn password_fields(&self) -> Vec<&str> {
        self.schema.password_fields()
    }

    pub fn has_audit_fields(&self) -> bool {
        self.schema.has_audit_fields()
    }
}

fn push_clause(sql: &mut String, keyword: &str, clause: &str) {
    if clause.is_empty() {
        return;
    }
    sql.push(' ');
    sql.push_str(keyword);
    sql.push(' ');
    sql.push_str(clause);
}
