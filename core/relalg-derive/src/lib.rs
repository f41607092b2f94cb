//! relalg Derive: procedural macros for the relalg engine.
//!
//! Provides `#[derive(Row)]`, mapping a struct onto a table schema.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Data, DeriveInput, Fields, LitStr, parse_macro_input};

/// Derive macro mapping a struct with named fields onto a table row.
///
/// # Example
///
/// ```ignore
/// #[derive(Row)]
/// #[relalg(name = "movie")]
/// pub struct Movie {
///     #[relalg(key)]
///     pub title: String,
///     #[relalg(key)]
///     pub year: i32,
///     #[relalg(rename = "studioName")]
///     pub studio: String,
/// }
/// ```
///
/// Generates a `relalg_core::Row` implementation:
/// - `RELATION`: `name` or the lowercased struct name
/// - `schema()`: one attribute per field, domain from `IntoDomain`;
///   the key is the `#[relalg(key)]` fields, or every field when none is marked
/// - `into_tuple()`: field values in declaration order
#[proc_macro_derive(Row, attributes(relalg))]
pub fn derive_row(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

struct Column<'a> {
    ident: &'a syn::Ident,
    ty: &'a syn::Type,
    attribute: String,
    key: bool,
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let relation = extract_relation_name(input)?.unwrap_or_else(|| name.to_string().to_lowercase());

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "Row can only be derived for structs with named fields",
                ));
            }
        },
        _ => return Err(syn::Error::new_spanned(name, "Row can only be derived for structs")),
    };

    let mut columns = Vec::with_capacity(fields.len());
    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let mut column = Column {
            ident,
            ty: &field.ty,
            attribute: ident.to_string(),
            key: false,
        };
        parse_field_attrs(field, &mut column)?;
        columns.push(column);
    }
    if columns.is_empty() {
        return Err(syn::Error::new_spanned(name, "Row needs at least one field"));
    }

    let attributes = columns.iter().map(|c| &c.attribute);
    let domains = columns.iter().map(|c| {
        let ty = c.ty;
        quote! { <#ty as ::relalg_core::IntoDomain>::domain() }
    });
    let key: Vec<&String> = if columns.iter().any(|c| c.key) {
        columns.iter().filter(|c| c.key).map(|c| &c.attribute).collect()
    } else {
        columns.iter().map(|c| &c.attribute).collect()
    };
    let values = columns.iter().map(|c| {
        let ident = c.ident;
        quote! { ::core::convert::Into::<::relalg_core::Value>::into(self.#ident) }
    });

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::relalg_core::Row for #name #ty_generics #where_clause {
            const RELATION: &'static str = #relation;

            fn schema() -> ::relalg_core::RelResult<::relalg_core::Schema> {
                ::relalg_core::Schema::new(
                    vec![#(::std::string::String::from(#attributes)),*],
                    vec![#(#domains),*],
                    vec![#(::std::string::String::from(#key)),*],
                )
            }

            fn into_tuple(self) -> ::relalg_core::Tuple {
                vec![#(#values),*]
            }
        }
    })
}

fn extract_relation_name(input: &DeriveInput) -> syn::Result<Option<String>> {
    let mut relation = None;
    for attr in &input.attrs {
        if !attr.path().is_ident("relalg") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let lit: LitStr = meta.value()?.parse()?;
                relation = Some(lit.value());
                Ok(())
            } else {
                Err(meta.error("expected `name = \"...\"`"))
            }
        })?;
    }
    Ok(relation)
}

fn parse_field_attrs(field: &syn::Field, column: &mut Column<'_>) -> syn::Result<()> {
    for attr in &field.attrs {
        if !attr.path().is_ident("relalg") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("key") {
                column.key = true;
                Ok(())
            } else if meta.path.is_ident("rename") {
                let lit: LitStr = meta.value()?.parse()?;
                column.attribute = lit.value();
                Ok(())
            } else {
                Err(meta.error("expected `key` or `rename = \"...\"`"))
            }
        })?;
    }
    Ok(())
}
