//! Precomputed statement text.
//!
//! Templates are stored without the `;` terminator; every accessor appends it
//! exactly once.

use crate::schema::Schema;

/// Fixed statements and open prefixes for one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTemplates {
    create_table: String,
    drop_table: String,
    insert: String,
    insert_on_conflict_update: String,
    update_by_id: String,
    select_by_id: String,
    delete_by_id: String,
    select_prefix: String,
    select_count_prefix: String,
    delete_prefix: String,
    update_prefix: String,
}

/// Comma-joined `$start,$start+1,...` run of `count` placeholders.
pub(crate) fn placeholders(start: usize, count: usize) -> String {
    (start..start + count)
        .map(|n| format!("${n}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Comma-joined `"col"=$n` assignments numbered from `start`.
fn assignments<'a>(columns: impl Iterator<Item = &'a str>, start: usize) -> String {
    columns
        .enumerate()
        .map(|(i, col)| format!("{col}=${}", start + i))
        .collect::<Vec<_>>()
        .join(",")
}

impl QueryTemplates {
    /// Render every template in one pass over the schema's columns.
    pub fn build(schema: &Schema) -> Self {
        let table = schema.table_name();
        let key = schema.key_quoted();

        let definitions: Vec<String> = schema
            .columns()
            .iter()
            .map(|c| format!("{} {}", c.quoted(), c.definition()))
            .collect();
        let all: Vec<String> = schema.columns().iter().map(|c| c.quoted()).collect();
        let non_key: Vec<String> = schema.non_key_columns().map(|c| c.quoted()).collect();

        let all_list = all.join(",");
        let non_key_list = non_key.join(",");

        Self {
            create_table: format!(
                "CREATE TABLE IF NOT EXISTS {table} ({})",
                definitions.join(",")
            ),
            drop_table: format!("DROP TABLE IF EXISTS {table}"),
            insert: format!(
                "INSERT INTO {table}({non_key_list}) VALUES ({}) RETURNING {key}",
                placeholders(1, non_key.len())
            ),
            insert_on_conflict_update: format!(
                "INSERT INTO {table}({all_list}) VALUES ({}) ON CONFLICT ({key}) DO UPDATE SET {} RETURNING {key}",
                placeholders(1, all.len()),
                assignments(non_key.iter().map(String::as_str), all.len() + 1)
            ),
            update_by_id: format!(
                "UPDATE {table} SET {} WHERE {key} = ${}",
                assignments(non_key.iter().map(String::as_str), 1),
                non_key.len() + 1
            ),
            select_by_id: format!("SELECT {all_list} FROM {table} WHERE {key} = $1"),
            delete_by_id: format!("DELETE FROM {table} WHERE {key} = $1"),
            select_prefix: format!("SELECT {all_list} FROM {table}"),
            select_count_prefix: format!("SELECT COUNT(*) AS cnt FROM {table}"),
            delete_prefix: format!("DELETE FROM {table}"),
            update_prefix: format!("UPDATE {table} SET"),
        }
    }

    pub fn create_table(&self) -> String {
        terminate(&self.create_table)
    }

    pub fn drop_table(&self) -> String {
        terminate(&self.drop_table)
    }

    /// INSERT of every non-key column, `RETURNING` the key.
    pub fn insert(&self) -> String {
        terminate(&self.insert)
    }

    pub fn insert_on_conflict_update(&self) -> String {
        terminate(&self.insert_on_conflict_update)
    }

    pub fn update_by_id(&self) -> String {
        terminate(&self.update_by_id)
    }

    pub fn select_by_id(&self) -> String {
        terminate(&self.select_by_id)
    }

    pub fn delete_by_id(&self) -> String {
        terminate(&self.delete_by_id)
    }

    /// `SELECT <columns> FROM <table>`, unterminated.
    pub fn select_prefix(&self) -> &str {
        &self.select_prefix
    }

    /// `SELECT COUNT(*) AS cnt FROM <table>`, unterminated.
    pub fn select_count_prefix(&self) -> &str {
        &self.select_count_prefix
    }

    /// `DELETE FROM <table>`, unterminated.
    pub fn delete_prefix(&self) -> &str {
        &self.delete_prefix
    }

    /// `UPDATE <table> SET`, unterminated.
    pub fn update_prefix(&self) -> &str {
        &self.update_prefix
    }
}

fn terminate(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len() + 1);
    out.push_str(sql);
    out.push(';');
    out
}
