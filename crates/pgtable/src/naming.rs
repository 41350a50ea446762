//! Field, column and table name conversions.
//!
//! Field names are UpperCamelCase (`PostCode`, `UserID`), column names are
//! lower snake_case (`post_code`, `user_id`). The `ID` acronym is kept as a
//! single word in both directions.

use heck::ToSnakeCase;

/// Convert a field name to its column name.
///
/// ```
/// use pgtable::naming::field_to_column;
///
/// assert_eq!(field_to_column("PostCode2"), "post_code2");
/// assert_eq!(field_to_column("UserID"), "user_id");
/// assert_eq!(field_to_column("ID"), "id");
/// ```
pub fn field_to_column(field: &str) -> String {
    if field == "ID" {
        return "id".to_string();
    }

    let mut out = String::with_capacity(field.len() + 4);
    let mut prev: Option<char> = None;
    for ch in field.chars() {
        match prev {
            None => out.extend(ch.to_lowercase()),
            Some('I') if ch == 'D' => out.push('d'),
            Some(_) if ch.is_uppercase() => {
                out.push('_');
                out.extend(ch.to_lowercase());
            }
            Some(_) => out.push(ch),
        }
        prev = Some(ch);
    }
    out
}

/// Convert a column name back to its field name.
///
/// ```
/// use pgtable::naming::column_to_field;
///
/// assert_eq!(column_to_field("post_code2"), "PostCode2");
/// assert_eq!(column_to_field("user_id"), "UserID");
/// ```
pub fn column_to_field(column: &str) -> String {
    let mut out = String::with_capacity(column.len());
    for part in column.split('_') {
        if part == "id" {
            out.push_str("ID");
            continue;
        }
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

/// Derive the unquoted table name for an entity type name.
///
/// Everything from the first `_` on is dropped so that variants such as
/// `User_Register` share the `user` table.
pub fn table_name(entity: &str, prefix: &str) -> String {
    let base = entity.split('_').next().unwrap_or(entity);
    format!("{prefix}{}", base.to_snake_case())
}

/// Double-quote an identifier, escaping embedded quotes.
pub fn quote_ident(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    out.push('"');
    for ch in name.chars() {
        if ch == '"' {
            out.push('"');
        }
        out.push(ch);
    }
    out.push('"');
    out
}

/// Break a `CREATE TABLE` statement into one column per line.
pub fn prettify_create_table(sql: &str) -> String {
    sql.replacen('(', "(\n  ", 1).replace(',', ",\n  ")
}
