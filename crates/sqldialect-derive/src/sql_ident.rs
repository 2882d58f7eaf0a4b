use proc_macro2::Span;
use syn::{Error, LitStr, Result};

pub(crate) fn is_valid_sql_ident(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return false;
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

pub(crate) fn parse_sql_ident(lit: &LitStr, what: &str) -> Result<String> {
    parse_sql_ident_with_span(lit.value().trim(), lit.span(), what)
}

pub(crate) fn parse_sql_ident_with_span(s: &str, span: Span, what: &str) -> Result<String> {
    let s = s.trim();
    if s.is_empty() {
        return Err(Error::new(span, format!("{what} must not be empty")));
    }
    if !is_valid_sql_ident(s) {
        return Err(Error::new(
            span,
            format!("{what} '{s}' must be a valid SQL identifier (expected [A-Za-z_][A-Za-z0-9_$]*)"),
        ));
    }
    Ok(s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_identifiers() {
        assert!(is_valid_sql_ident("user_id"));
        assert!(is_valid_sql_ident("_x1$"));
    }

    #[test]
    fn rejects_bad_identifiers() {
        assert!(!is_valid_sql_ident(""));
        assert!(!is_valid_sql_ident("1abc"));
        assert!(!is_valid_sql_ident("a-b"));
        assert!(!is_valid_sql_ident("a.b"));
    }

    #[test]
    fn parse_trims_and_reports() {
        let span = Span::call_site();
        assert_eq!(parse_sql_ident_with_span(" id ", span, "column").unwrap(), "id");
        assert!(parse_sql_ident_with_span("", span, "column").is_err());
    }
}
