//! Parsing of `#[orm(...)]` attributes.

use syn::{Attribute, LitStr, Result};

/// Contents of every `#[orm(...)]` attribute on one item.
#[derive(Default)]
pub(crate) struct OrmAttrs {
    /// `name = "..."`
    pub name: Option<String>,
    /// `skip`
    pub skip: bool,
    /// Every other `key = "value"` pair, in source order.
    pub tags: Vec<(String, String)>,
}

impl OrmAttrs {
    pub(crate) fn from_attrs(attrs: &[Attribute]) -> Result<Self> {
        let mut out = Self::default();
        for attr in attrs {
            if !attr.path().is_ident("orm") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                let Some(ident) = meta.path.get_ident() else {
                    return Err(meta.error("expected an identifier"));
                };
                let key = ident.to_string();

                if key == "skip" {
                    out.skip = true;
                    return Ok(());
                }

                let value: LitStr = meta.value()?.parse()?;
                if key == "name" {
                    if value.value().is_empty() {
                        return Err(syn::Error::new_spanned(&value, "name must not be empty"));
                    }
                    out.name = Some(value.value());
                } else if let Some(slot) = out.tags.iter_mut().find(|(k, _)| *k == key) {
                    slot.1 = value.value();
                } else {
                    out.tags.push((key, value.value()));
                }
                Ok(())
            })?;
        }
        Ok(out)
    }
}
