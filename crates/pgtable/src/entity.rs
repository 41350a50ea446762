//! Entity descriptions.
//!
//! An [`EntityDef`] is the ordered list of fields a table is reflected from.
//! It can be written by hand, deserialized from a config file, or produced by
//! `#[derive(Entity)]`.
//!
//! ```
//! use pgtable::{EntityDef, FieldDef, FieldKind};
//!
//! let def = EntityDef::new("User")
//!     .field(FieldDef::new("ID", FieldKind::I64))
//!     .field(FieldDef::new("Email", FieldKind::String).tag("sql", "uniq"));
//! assert_eq!(def.fields.len(), 2);
//! ```

use crate::error::BuilderResult;
use crate::value::Value;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

/// Primitive kind of an entity field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum FieldKind {
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
    Bool,
    String,
    /// Any other type; never becomes a column.
    Other(String),
}

impl FieldKind {
    /// Parse a Rust scalar type name (`i64`, `String`, `bool`, ...).
    pub fn parse(name: &str) -> Self {
        match name {
            "i8" => Self::I8,
            "i16" => Self::I16,
            "i32" => Self::I32,
            "i64" => Self::I64,
            "isize" => Self::Isize,
            "u8" => Self::U8,
            "u16" => Self::U16,
            "u32" => Self::U32,
            "u64" => Self::U64,
            "usize" => Self::Usize,
            "f32" => Self::F32,
            "f64" => Self::F64,
            "bool" => Self::Bool,
            "String" | "string" | "str" => Self::String,
            other => Self::Other(other.to_string()),
        }
    }

    /// Whether fields of this kind become table columns.
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            Self::I8
                | Self::I16
                | Self::I32
                | Self::I64
                | Self::Isize
                | Self::U8
                | Self::U16
                | Self::U32
                | Self::U64
                | Self::Usize
        )
    }

    pub fn is_unsigned(&self) -> bool {
        matches!(
            self,
            Self::U8 | Self::U16 | Self::U32 | Self::U64 | Self::Usize
        )
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }

    /// Rust spelling of the kind.
    pub fn as_str(&self) -> &str {
        match self {
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::Isize => "isize",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::Usize => "usize",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Bool => "bool",
            Self::String => "String",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for FieldKind {
    fn from(name: String) -> Self {
        Self::parse(&name)
    }
}

impl From<&str> for FieldKind {
    fn from(name: &str) -> Self {
        Self::parse(name)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One field of an entity: name, kind and tag strings.
///
/// Tags play the role of struct tags: the option string for tag name `sql`
/// is read from `tags["sql"]`, its literal default from `tags["sql_val"]`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldDef {
    pub name: String,
    pub kind: FieldKind,
    #[serde(flatten)]
    pub tags: BTreeMap<String, String>,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, kind: impl Into<FieldKind>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            tags: BTreeMap::new(),
        }
    }

    /// Attach a tag value.
    pub fn tag(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(name.into(), value.into());
        self
    }

    pub fn tag_value(&self, name: &str) -> Option<&str> {
        self.tags.get(name).map(String::as_str)
    }
}

/// Ordered description of an entity type.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct EntityDef {
    pub name: String,
    #[serde(default, rename = "field")]
    pub fields: Vec<FieldDef>,
}

impl EntityDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field; declaration order is preserved.
    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }
}

/// A Rust type that describes itself as a table entity.
///
/// Usually implemented with `#[derive(Entity)]`:
///
/// ```ignore
/// use pgtable::Entity;
///
/// #[derive(Entity, Default)]
/// struct User {
///     id: i64,
///     #[orm(sql = "uniq type:varchar(320)")]
///     email: String,
/// }
/// ```
pub trait Entity {
    /// The ordered field description.
    fn entity_def() -> EntityDef;

    /// Read the current value of a field by name.
    fn field_value(&self, field: &str) -> Option<Value>;

    /// Assign a value to a field by name.
    ///
    /// Returns `Ok(false)` when the entity has no such (supported) field.
    fn set_field(&mut self, field: &str, value: Value) -> BuilderResult<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_kinds() {
        assert_eq!(FieldKind::parse("u16"), FieldKind::U16);
        assert_eq!(FieldKind::parse("String"), FieldKind::String);
        assert_eq!(
            FieldKind::parse("Vec<u8>"),
            FieldKind::Other("Vec<u8>".to_string())
        );
        assert!(!FieldKind::parse("Vec<u8>").is_supported());
        assert!(FieldKind::F32.is_float());
        assert!(FieldKind::Usize.is_integer());
    }

    #[test]
    fn deserialize_from_toml() {
        let def: EntityDef = toml::from_str(
            r#"
            name = "User"

            [[field]]
            name = "ID"
            kind = "i64"

            [[field]]
            name = "Email"
            kind = "string"
            sql = "uniq type:varchar(320)"
            sql_val = "'nobody@example.com'"
            "#,
        )
        .unwrap();

        assert_eq!(def.name, "User");
        assert_eq!(def.fields[0].kind, FieldKind::I64);
        assert_eq!(def.fields[1].tag_value("sql"), Some("uniq type:varchar(320)"));
        assert_eq!(
            def.fields[1].tag_value("sql_val"),
            Some("'nobody@example.com'")
        );
    }
}
