//! Entity derive macro implementation

use crate::attrs::OrmAttrs;
use heck::ToUpperCamelCase;
use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, Result};

/// Scalar kinds that become columns and get by-name accessors.
const SUPPORTED_KINDS: [&str; 14] = [
    "i8", "i16", "i32", "i64", "isize", "u8", "u16", "u32", "u64", "usize", "f32", "f64", "bool",
    "String",
];

/// Kind name of a field type: the last path segment for plain paths, the full
/// type text otherwise.
fn kind_name(ty: &syn::Type) -> String {
    if let syn::Type::Path(type_path) = ty
        && type_path.qself.is_none()
        && let Some(seg) = type_path.path.segments.last()
        && seg.arguments.is_empty()
    {
        return seg.ident.to_string();
    }
    ty.to_token_stream().to_string().replace(' ', "")
}

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Entity can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Entity can only be derived for structs",
            ));
        }
    };

    let struct_attrs = OrmAttrs::from_attrs(&input.attrs)?;
    let entity_name = struct_attrs
        .name
        .unwrap_or_else(|| name.unraw().to_string());

    let mut defs = Vec::new();
    let mut getters = Vec::new();
    let mut setters = Vec::new();

    for field in fields {
        let attrs = OrmAttrs::from_attrs(&field.attrs)?;
        if attrs.skip {
            continue;
        }
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let ty = &field.ty;
        let field_name = attrs
            .name
            .unwrap_or_else(|| ident.unraw().to_string().to_upper_camel_case());
        let kind = kind_name(ty);

        let tags = attrs.tags.iter().map(|(k, v)| quote! { .tag(#k, #v) });
        defs.push(quote! {
            .field(::pgtable::FieldDef::new(#field_name, #kind) #(#tags)*)
        });

        if !SUPPORTED_KINDS.contains(&kind.as_str()) {
            continue;
        }

        getters.push(quote! {
            #field_name => ::core::option::Option::Some(
                ::pgtable::Value::from(::core::clone::Clone::clone(&self.#ident))
            ),
        });
        setters.push(quote! {
            #field_name => {
                let found = value.kind_name();
                self.#ident = <#ty as ::pgtable::FromValue>::from_value(value).ok_or_else(|| {
                    ::pgtable::BuilderError::ValueType {
                        field: ::std::string::String::from(#field_name),
                        expected: <#ty as ::pgtable::FromValue>::EXPECTED,
                        found,
                    }
                })?;
                ::core::result::Result::Ok(true)
            }
        });
    }

    Ok(quote! {
        impl #impl_generics ::pgtable::Entity for #name #ty_generics #where_clause {
            fn entity_def() -> ::pgtable::EntityDef {
                ::pgtable::EntityDef::new(#entity_name)
                    #(#defs)*
            }

            fn field_value(&self, field: &str) -> ::core::option::Option<::pgtable::Value> {
                match field {
                    #(#getters)*
                    _ => ::core::option::Option::None,
                }
            }

            #[allow(unused_variables)]
            fn set_field(
                &mut self,
                field: &str,
                value: ::pgtable::Value,
            ) -> ::pgtable::BuilderResult<bool> {
                match field {
                    #(#setters)*
                    _ => ::core::result::Result::Ok(false),
                }
            }
        }
    })
}
