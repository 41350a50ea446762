//! Reflection options.

/// Tag name used when none is configured.
pub const DEFAULT_TAG_NAME: &str = "sql";

/// Options that change how an entity is reflected.
///
/// # Example
///
/// ```
/// use pgtable::Options;
///
/// let options = Options::new().table_name_prefix("app_").tag_name("db");
/// assert_eq!(options.default_tag_name(), "db_val");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Tag carrying the field options; `<tag_name>_val` carries the default literal.
    pub tag_name: String,
    /// Prepended to the derived table name.
    pub table_name_prefix: String,
    /// Replaces the entity name as the source of the table name.
    pub struct_name: Option<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            tag_name: DEFAULT_TAG_NAME.to_string(),
            table_name_prefix: String::new(),
            struct_name: None,
        }
    }
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read field options from another tag. An empty name keeps the default.
    pub fn tag_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !name.is_empty() {
            self.tag_name = name;
        }
        self
    }

    pub fn table_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.table_name_prefix = prefix.into();
        self
    }

    pub fn struct_name(mut self, name: impl Into<String>) -> Self {
        self.struct_name = Some(name.into());
        self
    }

    /// Tag carrying the literal default expression.
    pub fn default_tag_name(&self) -> String {
        format!("{}_val", self.tag_name)
    }
}
