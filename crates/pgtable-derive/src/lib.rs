//! Derive macros for pgtable
//!
//! Provides `#[derive(Entity)]`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod attrs;
mod entity;

/// Derive the `Entity` trait for a struct with named fields.
///
/// # Example
///
/// ```ignore
/// use pgtable::Entity;
///
/// #[derive(Entity, Default)]
/// struct TestStruct {
///     id: i64,
///     #[orm(sql = "uniq type:varchar(320)")]
///     primary_email: String,
///     #[orm(name = "PostCode2")]
///     post_code_2: String,
///     #[orm(skip)]
///     cache: Vec<u8>,
/// }
/// ```
///
/// # Generated
///
/// - `entity_def()` - fields in declaration order, named in UpperCamelCase
///   (`primary_email` becomes `PrimaryEmail`)
/// - `field_value()` / `set_field()` - by-name access to every field of a
///   scalar kind (`i8`..`usize`, `f32`, `f64`, `bool`, `String`)
///
/// # Attributes
///
/// - `#[orm(name = "Name")]` - on the struct or a field, replaces the derived name
/// - `#[orm(skip)]` - leave the field out of the description
/// - `#[orm(key = "value")]` - any other pair becomes a field tag, e.g.
///   `sql = "uniq"` or `sql_val = "'PL'"`
#[proc_macro_derive(Entity, attributes(orm))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    entity::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
