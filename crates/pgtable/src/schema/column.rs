//! Per-field column metadata and SQL type mapping.

use crate::entity::FieldKind;
use crate::naming::quote_ident;
use std::sync::OnceLock;

/// Flags attached to a column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnFlags {
    /// `uniq` option: the column gets a UNIQUE constraint.
    pub unique: bool,
    /// `pass` option: the field holds a password.
    pub password: bool,
    /// The field is not a string; LIKE and `~` cast it to TEXT.
    pub non_text: bool,
}

/// Special meaning of a column, decided by its field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    /// `Id` / `ID`: auto-increment primary key.
    Identity,
    /// `Flags`: bit set stored as BIGINT.
    Flags,
    Regular,
}

/// SQL description of one entity field.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMeta {
    pub field: String,
    pub column: String,
    pub kind: FieldKind,
    pub role: ColumnRole,
    /// Validated `type:` override, upper-cased.
    pub sql_type: Option<String>,
    pub flags: ColumnFlags,
    /// Literal default expression from the `<tag>_val` tag.
    pub default: Option<String>,
}

impl ColumnMeta {
    /// The double-quoted column name.
    pub fn quoted(&self) -> String {
        quote_ident(&self.column)
    }

    pub fn is_identity(&self) -> bool {
        self.role == ColumnRole::Identity
    }

    /// Column definition as it appears in CREATE TABLE, without the name.
    pub fn definition(&self) -> String {
        match self.role {
            ColumnRole::Identity => return "SERIAL PRIMARY KEY".to_string(),
            ColumnRole::Flags => return "BIGINT NOT NULL DEFAULT 0".to_string(),
            ColumnRole::Regular => {}
        }

        let (sql_type, default) = match &self.sql_type {
            Some(sql_type) => (sql_type.as_str(), "''"),
            None => kind_sql_type(&self.kind),
        };
        let default = self.default.as_deref().unwrap_or(default);

        let mut definition = format!("{sql_type} NOT NULL DEFAULT {default}");
        if self.flags.unique {
            definition.push_str(" UNIQUE");
        }
        definition
    }
}

/// Default SQL type and default expression for a field kind.
fn kind_sql_type(kind: &FieldKind) -> (&'static str, &'static str) {
    match kind {
        FieldKind::Bool => ("BOOLEAN", "false"),
        FieldKind::I64 | FieldKind::Isize | FieldKind::U64 | FieldKind::Usize => ("BIGINT", "0"),
        FieldKind::I32 | FieldKind::U32 => ("INTEGER", "0"),
        FieldKind::I16 | FieldKind::I8 | FieldKind::U16 | FieldKind::U8 => ("SMALLINT", "0"),
        FieldKind::F32 => ("REAL", "0"),
        FieldKind::F64 => ("DOUBLE PRECISION", "0"),
        FieldKind::String | FieldKind::Other(_) => ("VARCHAR(255)", "''"),
    }
}

/// Options parsed from a field's option tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldOptions {
    pub unique: bool,
    pub password: bool,
    pub sql_type: Option<String>,
    /// `type:` values that were not on the allow-list.
    pub rejected_types: Vec<String>,
}

impl FieldOptions {
    /// Parse a space-separated option string (`uniq pass type:varchar(64)`).
    ///
    /// Unknown tokens are ignored. `type:character varying(n)` may span two
    /// tokens.
    pub fn parse(tag: &str) -> Self {
        let mut opts = Self::default();
        let mut tokens = tag.split_whitespace().peekable();

        while let Some(token) = tokens.next() {
            match token {
                "uniq" => opts.unique = true,
                "pass" => opts.password = true,
                _ => {
                    let Some(value) = token.strip_prefix("type:") else {
                        continue;
                    };
                    let mut value = value.to_uppercase();
                    if value == "CHARACTER" {
                        if let Some(next) = tokens.next_if(|t| t.to_uppercase().starts_with("VARYING(")) {
                            value.push(' ');
                            value.push_str(&next.to_uppercase());
                        }
                    }
                    if is_allowed_sql_type(&value) {
                        opts.sql_type = Some(value);
                    } else {
                        opts.rejected_types.push(value);
                    }
                }
            }
        }
        opts
    }
}

/// Whether an upper-cased type name is an accepted `type:` override.
pub fn is_allowed_sql_type(value: &str) -> bool {
    static SIZED_RE: OnceLock<regex::Regex> = OnceLock::new();

    if value == "TEXT" || value == "BPCHAR" {
        return true;
    }

    let re = SIZED_RE.get_or_init(|| {
        regex::Regex::new(r"^(?:VARCHAR|CHARACTER VARYING|BPCHAR|CHAR|CHARACTER)\(([0-9]+)\)$")
            .expect("invalid built-in sql type regex")
    });
    re.captures(value)
        .and_then(|caps| caps[1].parse::<u32>().ok())
        .is_some_and(|n| n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(kind: FieldKind) -> ColumnMeta {
        ColumnMeta {
            field: "Field".to_string(),
            column: "field".to_string(),
            kind,
            role: ColumnRole::Regular,
            sql_type: None,
            flags: ColumnFlags::default(),
            default: None,
        }
    }

    #[test]
    fn allow_list() {
        assert!(is_allowed_sql_type("TEXT"));
        assert!(is_allowed_sql_type("BPCHAR"));
        assert!(is_allowed_sql_type("VARCHAR(2000)"));
        assert!(is_allowed_sql_type("CHARACTER VARYING(10)"));
        assert!(is_allowed_sql_type("CHAR(2)"));
        assert!(!is_allowed_sql_type("VARCHAR(0)"));
        assert!(!is_allowed_sql_type("VARCHAR"));
        assert!(!is_allowed_sql_type("INTEGER"));
        assert!(!is_allowed_sql_type("TEXT; DROP TABLE x"));
    }

    #[test]
    fn parse_options() {
        let opts = FieldOptions::parse("uniq type:varchar(2000)");
        assert!(opts.unique);
        assert!(!opts.password);
        assert_eq!(opts.sql_type.as_deref(), Some("VARCHAR(2000)"));

        let opts = FieldOptions::parse("pass  type:character varying(64)");
        assert!(opts.password);
        assert_eq!(opts.sql_type.as_deref(), Some("CHARACTER VARYING(64)"));

        let opts = FieldOptions::parse("type:jsonb uniq");
        assert!(opts.unique);
        assert_eq!(opts.sql_type, None);
        assert_eq!(opts.rejected_types, vec!["JSONB".to_string()]);
    }

    #[test]
    fn definitions_by_kind() {
        assert_eq!(
            column(FieldKind::String).definition(),
            "VARCHAR(255) NOT NULL DEFAULT ''"
        );
        assert_eq!(
            column(FieldKind::Bool).definition(),
            "BOOLEAN NOT NULL DEFAULT false"
        );
        assert_eq!(column(FieldKind::U8).definition(), "SMALLINT NOT NULL DEFAULT 0");
        assert_eq!(column(FieldKind::I32).definition(), "INTEGER NOT NULL DEFAULT 0");
        assert_eq!(column(FieldKind::Usize).definition(), "BIGINT NOT NULL DEFAULT 0");
        assert_eq!(column(FieldKind::F32).definition(), "REAL NOT NULL DEFAULT 0");
        assert_eq!(
            column(FieldKind::F64).definition(),
            "DOUBLE PRECISION NOT NULL DEFAULT 0"
        );
    }

    #[test]
    fn definition_with_override_default_and_unique() {
        let mut col = column(FieldKind::String);
        col.sql_type = Some("TEXT".to_string());
        col.flags.unique = true;
        assert_eq!(col.definition(), "TEXT NOT NULL DEFAULT '' UNIQUE");

        col.default = Some("'PL'".to_string());
        assert_eq!(col.definition(), "TEXT NOT NULL DEFAULT 'PL' UNIQUE");

        let mut col = column(FieldKind::I64);
        col.role = ColumnRole::Identity;
        col.flags.unique = true;
        col.sql_type = Some("TEXT".to_string());
        assert_eq!(col.definition(), "SERIAL PRIMARY KEY");

        col.role = ColumnRole::Flags;
        assert_eq!(col.definition(), "BIGINT NOT NULL DEFAULT 0");
    }
}
