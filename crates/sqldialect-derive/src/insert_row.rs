//! InsertRow derive macro implementation

use heck::{ToLowerCamelCase, ToShoutySnakeCase, ToSnakeCase, ToUpperCamelCase};
use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::{Data, DeriveInput, Fields, LitStr, Result};

use crate::sql_ident::{parse_sql_ident, parse_sql_ident_with_span};

/// Container-level `#[sqldialect(...)]` options.
#[derive(Default)]
struct StructAttrs {
    rename_all: Option<RenameRule>,
}

#[derive(Clone, Copy)]
enum RenameRule {
    Snake,
    LowerCamel,
    UpperCamel,
    ScreamingSnake,
    Lower,
}

impl RenameRule {
    fn parse(lit: &LitStr) -> Result<Self> {
        match lit.value().as_str() {
            "snake_case" => Ok(RenameRule::Snake),
            "camelCase" => Ok(RenameRule::LowerCamel),
            "PascalCase" => Ok(RenameRule::UpperCamel),
            "SCREAMING_SNAKE_CASE" => Ok(RenameRule::ScreamingSnake),
            "lowercase" => Ok(RenameRule::Lower),
            other => Err(syn::Error::new(
                lit.span(),
                format!(
                    "unsupported rename_all rule '{other}' (expected snake_case, camelCase, \
                     PascalCase, SCREAMING_SNAKE_CASE or lowercase)"
                ),
            )),
        }
    }

    fn apply(self, name: &str) -> String {
        match self {
            RenameRule::Snake => name.to_snake_case(),
            RenameRule::LowerCamel => name.to_lower_camel_case(),
            RenameRule::UpperCamel => name.to_upper_camel_case(),
            RenameRule::ScreamingSnake => name.to_shouty_snake_case(),
            RenameRule::Lower => name.to_lowercase(),
        }
    }
}

/// Field-level `#[sqldialect(...)]` options.
#[derive(Default)]
struct FieldAttrs {
    column: Option<String>,
    skip: bool,
}

struct AttrList {
    pairs: Vec<(syn::Ident, Option<LitStr>)>,
}

impl syn::parse::Parse for AttrList {
    fn parse(input: syn::parse::ParseStream) -> Result<Self> {
        let mut pairs = Vec::new();
        loop {
            if input.is_empty() {
                break;
            }

            let ident: syn::Ident = input.parse()?;
            if input.peek(syn::token::Paren) {
                return Err(syn::Error::new(
                    ident.span(),
                    "unexpected function-style attribute",
                ));
            }

            let value = if input.peek(syn::Token![=]) {
                let _: syn::Token![=] = input.parse()?;
                Some(input.parse::<LitStr>()?)
            } else {
                None
            };
            pairs.push((ident, value));

            if input.is_empty() {
                break;
            }
            let _: syn::Token![,] = input.parse()?;
        }
        Ok(Self { pairs })
    }
}

fn sqldialect_attrs(attrs: &[syn::Attribute]) -> Result<Vec<(syn::Ident, Option<LitStr>)>> {
    let mut out = Vec::new();
    for attr in attrs {
        if attr.path().is_ident("sqldialect") {
            out.extend(attr.parse_args::<AttrList>()?.pairs);
        }
    }
    Ok(out)
}

fn parse_struct_attrs(attrs: &[syn::Attribute]) -> Result<StructAttrs> {
    let mut parsed = StructAttrs::default();
    for (key, value) in sqldialect_attrs(attrs)? {
        match (key.to_string().as_str(), value) {
            ("rename_all", Some(lit)) => parsed.rename_all = Some(RenameRule::parse(&lit)?),
            _ => {
                return Err(syn::Error::new(
                    key.span(),
                    format!("unknown InsertRow attribute '{key}'"),
                ));
            }
        }
    }
    Ok(parsed)
}

fn parse_field_attrs(attrs: &[syn::Attribute]) -> Result<FieldAttrs> {
    let mut parsed = FieldAttrs::default();
    for (key, value) in sqldialect_attrs(attrs)? {
        match (key.to_string().as_str(), value) {
            ("column", Some(lit)) => parsed.column = Some(parse_sql_ident(&lit, "column")?),
            ("skip", None) => parsed.skip = true,
            _ => {
                return Err(syn::Error::new(
                    key.span(),
                    format!("unknown InsertRow field attribute '{key}'"),
                ));
            }
        }
    }
    Ok(parsed)
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
                    "InsertRow can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "InsertRow can only be derived for structs",
            ));
        }
    };

    let struct_attrs = parse_struct_attrs(&input.attrs)?;

    let mut columns = Vec::new();
    let mut values = Vec::new();
    for field in fields {
        let attrs = parse_field_attrs(&field.attrs)?;
        if attrs.skip {
            continue;
        }
        let Some(field_ident) = field.ident.as_ref() else {
            continue;
        };

        let column = match attrs.column {
            Some(c) => c,
            None => {
                let raw = field_ident.to_string();
                let raw = raw.strip_prefix("r#").unwrap_or(&raw);
                let renamed = match struct_attrs.rename_all {
                    Some(rule) => rule.apply(raw),
                    None => raw.to_string(),
                };
                parse_sql_ident_with_span(&renamed, field_ident.span(), "column")?
            }
        };

        if columns.contains(&column) {
            return Err(syn::Error::new(
                field_ident.span(),
                format!("duplicate column '{column}'"),
            ));
        }
        columns.push(column);
        values.push(quote! {
            ::sqldialect::Value::from(::core::clone::Clone::clone(&self.#field_ident))
        });
    }

    if columns.is_empty() {
        return Err(syn::Error::new(
            Span::call_site(),
            "InsertRow requires at least one non-skipped field",
        ));
    }

    Ok(quote! {
        impl #impl_generics ::sqldialect::InsertRow for #name #ty_generics #where_clause {
            fn columns() -> &'static [&'static str] {
                &[#(#columns),*]
            }

            fn values(&self) -> ::std::vec::Vec<::sqldialect::Value> {
                ::std::vec![#(#values),*]
            }
        }
    })
}
