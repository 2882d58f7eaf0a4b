//! Derive macros for sqldialect
//!
//! Provides `#[derive(InsertRow)]`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod insert_row;
mod sql_ident;

/// Derive `InsertRow` for a struct with named fields.
///
/// # Example
///
/// ```ignore
/// use sqldialect::InsertRow;
///
/// #[derive(InsertRow)]
/// struct NewUser {
///     username: String,
///     #[sqldialect(column = "email_address")]
///     email: Option<String>,
///     #[sqldialect(skip)]
///     password_confirmation: String,
/// }
/// ```
///
/// # Attributes
///
/// - `#[sqldialect(rename_all = "camelCase")]` - Rename every column (`snake_case`,
///   `camelCase`, `PascalCase`, `SCREAMING_SNAKE_CASE`, `lowercase`)
/// - `#[sqldialect(column = "name")]` - Map field to a different column name
/// - `#[sqldialect(skip)]` - Leave the field out of the row
///
/// Every field type must be `Clone` and convertible into `sqldialect::Value`;
/// `Option<T>` fields become NULL when `None`.
#[proc_macro_derive(InsertRow, attributes(sqldialect))]
pub fn derive_insert_row(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    insert_row::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
