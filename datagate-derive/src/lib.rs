//! Derive macros for datagate.
//!
//! This crate provides `#[derive(Columns)]`, which builds the schema a
//! predicate is type-checked against from a plain struct.
//!
//! ## Usage
//!
//! Add to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! datagate = { version = "0.1", features = ["derive"] }
//! ```
//!
//! ## Examples
//!
//! ```rust,ignore
//! use datagate::{Columns, DataType};
//!
//! #[derive(Columns)]
//! #[columns(rename_all = "camelCase")]
//! struct Customer {
//!     id: i64,
//!     display_name: String,
//!     #[column(type = "DATE")]
//!     birthday: String,
//!     #[column(skip)]
//!     cache_key: u64,
//! }
//!
//! let columns = Customer::columns();
//! assert_eq!(columns[1].name(), "displayName");
//! assert_eq!(columns[2].data_type(), DataType::Date);
//! ```

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    Data, DeriveInput, Error, Fields, GenericArgument, LitStr, PathArguments, Result, Type,
    parse_macro_input,
};

/// Derive macro for implementing the `Columns` trait.
///
/// ## Attributes
///
/// - `#[columns(rename_all = "camelCase")]` - Optional. Renames every field to camelCase.
/// - `#[column(name = "...")]` - Optional. Overrides the column name of a field.
/// - `#[column(type = "...")]` - Optional. Sets the data type by its wire name
///   (`STRING`, `LONG`, `DOUBLE`, `BOOLEAN`, `DATE`, `TIME`, `DATE_TIME`,
///   `LIST_OF_STRINGS`). Required when the field type has no default mapping.
/// - `#[column(skip)]` - Optional. Leaves the field out of the schema.
///
/// ## Type Mapping
///
/// | Rust type | Data type |
/// |-----------|-----------|
/// | `String`, `&str` | `STRING` |
/// | integers | `LONG` |
/// | `f32`, `f64` | `DOUBLE` |
/// | `bool` | `BOOLEAN` |
/// | `NaiveDate` | `DATE` |
/// | `NaiveTime` | `TIME` |
/// | `DateTime<_>`, `NaiveDateTime` | `DATE_TIME` |
/// | `Vec<String>` | `LIST_OF_STRINGS` |
/// | `Option<T>` | mapping of `T` |
#[proc_macro_derive(Columns, attributes(columns, column))]
pub fn derive_columns(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match derive_columns_impl(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn derive_columns_impl(input: DeriveInput) -> Result<TokenStream2> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let camel_case = parse_rename_all(&input)?;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            Fields::Unnamed(_) => {
                return Err(Error::new(
                    proc_macro2::Span::call_site(),
                    "tuple structs are not supported",
                ));
            },
            Fields::Unit => {
                return Err(Error::new(
                    proc_macro2::Span::call_site(),
                    "unit structs are not supported",
                ));
            },
        },
        Data::Enum(_) => {
            return Err(Error::new(proc_macro2::Span::call_site(), "enums are not supported"));
        },
        Data::Union(_) => {
            return Err(Error::new(proc_macro2::Span::call_site(), "unions are not supported"));
        },
    };

    let mut columns = Vec::new();
    for field in fields {
        let options = parse_column_attr(field)?;
        if options.skip {
            continue;
        }

        let ident = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new_spanned(field, "expected named field"))?;
        let field_name = ident.to_string();
        let field_name = field_name.strip_prefix("r#").unwrap_or(&field_name);
        let column_name = match options.name {
            Some(name) => name,
            None if camel_case => to_camel_case(field_name),
            None => field_name.to_string(),
        };

        let data_type = match options.data_type {
            Some(lit) => data_type_from_name(&lit.value())
                .ok_or_else(|| Error::new_spanned(&lit, "unknown data type"))?,
            None => data_type_from_rust(&field.ty).ok_or_else(|| {
                Error::new_spanned(
                    &field.ty,
                    "cannot infer a column type, add #[column(type = \"...\")]",
                )
            })?,
        };
        let variant = syn::Ident::new(data_type, proc_macro2::Span::call_site());

        columns.push(quote! {
            ::datagate::Column::new(#column_name, ::datagate::DataType::#variant)
        });
    }

    Ok(quote! {
        impl #impl_generics ::datagate::Columns for #name #ty_generics #where_clause {
            fn columns() -> ::std::vec::Vec<::datagate::Column> {
                ::std::vec![#(#columns),*]
            }
        }
    })
}

#[derive(Default)]
struct ColumnOptions {
    name: Option<String>,
    data_type: Option<LitStr>,
    skip: bool,
}

/// Parse `#[column(name = "...", type = "...", skip)]` from a field.
fn parse_column_attr(field: &syn::Field) -> Result<ColumnOptions> {
    let mut options = ColumnOptions::default();
    for attr in &field.attrs {
        if !attr.path().is_ident("column") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let value: LitStr = meta.value()?.parse()?;
                options.name = Some(value.value());
            } else if meta.path.is_ident("type") {
                options.data_type = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("skip") {
                options.skip = true;
            } else {
                return Err(meta.error("expected `name`, `type` or `skip`"));
            }
            Ok(())
        })?;
    }
    Ok(options)
}

/// Parse `#[columns(rename_all = "camelCase")]` from the struct.
fn parse_rename_all(input: &DeriveInput) -> Result<bool> {
    let mut camel_case = false;
    for attr in &input.attrs {
        if !attr.path().is_ident("columns") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                let value: LitStr = meta.value()?.parse()?;
                if value.value() != "camelCase" {
                    return Err(Error::new_spanned(value, "only \"camelCase\" is supported"));
                }
                camel_case = true;
                Ok(())
            } else {
                Err(meta.error("expected `rename_all`"))
            }
        })?;
    }
    Ok(camel_case)
}

fn data_type_from_name(name: &str) -> Option<&'static str> {
    Some(match name {
        "STRING" => "String",
        "LONG" => "Long",
        "DOUBLE" => "Double",
        "BOOLEAN" => "Boolean",
        "DATE" => "Date",
        "TIME" => "Time",
        "DATE_TIME" => "DateTime",
        "LIST_OF_STRINGS" => "ListOfStrings",
        _ => return None,
    })
}

fn data_type_from_rust(ty: &Type) -> Option<&'static str> {
    match ty {
        Type::Reference(reference) => data_type_from_rust(&reference.elem),
        Type::Path(path) => {
            let segment = path.path.segments.last()?;
            let ident = segment.ident.to_string();
            match ident.as_str() {
                "String" | "str" => Some("String"),
                "i8" | "i16" | "i32" | "i64" | "u8" | "u16" | "u32" | "isize" => Some("Long"),
                "f32" | "f64" => Some("Double"),
                "bool" => Some("Boolean"),
                "NaiveDate" => Some("Date"),
                "NaiveTime" => Some("Time"),
                "DateTime" | "NaiveDateTime" => Some("DateTime"),
                "Option" => data_type_from_rust(first_type_argument(&segment.arguments)?),
                "Vec" => match data_type_from_rust(first_type_argument(&segment.arguments)?) {
                    Some("String") => Some("ListOfStrings"),
                    _ => None,
                },
                _ => None,
            }
        },
        _ => None,
    }
}

fn first_type_argument(arguments: &PathArguments) -> Option<&Type> {
    let PathArguments::AngleBracketed(arguments) = arguments else {
        return None;
    };
    arguments.args.iter().find_map(|arg| match arg {
        GenericArgument::Type(ty) => Some(ty),
        _ => None,
    })
}

fn to_camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for c in name.chars() {
        if c == '_' {
            upper = !out.is_empty();
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
