//! Dotted SQL identifiers.
//!
//! [`Ident::parse`] accepts `name`, `schema.table`, `t.*` and `"Quoted Name"`
//! parts. Unquoted parts must match `[A-Za-z_][A-Za-z0-9_$]*`; quoted parts take
//! anything but NUL, with `""` for a literal quote.
//!
//! Each part is quoted on its own at render time with the dialect's quote
//! character:
//!
//! ```
//! use sqldialect::Ident;
//!
//! let t = Ident::parse("public.users")?;
//! assert_eq!(t.to_sql('`'), "`public`.`users`");
//! assert_eq!(t.to_sql('"'), r#""public"."users""#);
//! # Ok::<(), sqldialect::SqlError>(())
//! ```

use std::iter::Peekable;
use std::str::Chars;

use serde::{Deserialize, Serialize};

use crate::error::{SqlError, SqlResult};

/// How a quote character inside an identifier part is escaped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentEscape {
    /// `"a""b"`
    #[default]
    Double,
    /// `` `a\`b` ``; backslashes are escaped too.
    Backslash,
}

/// One segment of an [`Ident`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IdentPart {
    /// Stored unescaped.
    Name(String),
    /// `*`, never quoted.
    Star,
}

/// A schema, table or column reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ident {
    pub parts: Vec<IdentPart>,
}

impl Ident {
    /// Single-part identifier taken as-is: dots and quotes are part of the name.
    pub fn name(name: &str) -> SqlResult<Self> {
        check_raw(name)?;
        Ok(Self {
            parts: vec![IdentPart::Name(name.to_string())],
        })
    }

    /// The `*` identifier.
    pub fn star() -> Self {
        Self {
            parts: vec![IdentPart::Star],
        }
    }

    /// Parse a possibly dotted, possibly quoted identifier.
    pub fn parse(s: &str) -> SqlResult<Self> {
        check_raw(s)?;

        let mut chars = s.chars().peekable();
        let mut parts = Vec::new();
        loop {
            let part = match chars.peek() {
                Some('*') => {
                    chars.next();
                    IdentPart::Star
                }
                Some('"') => {
                    chars.next();
                    IdentPart::Name(quoted_part(&mut chars)?)
                }
                _ => IdentPart::Name(bare_part(&mut chars, s)?),
            };
            parts.push(part);

            match chars.next() {
                None => break,
                Some('.') if parts.last() == Some(&IdentPart::Star) => {
                    return Err(SqlError::invalid(format!(
                        "'*' must be the last part of '{s}'"
                    )));
                }
                Some('.') if chars.peek().is_none() => {
                    return Err(SqlError::invalid(format!("trailing '.' in '{s}'")));
                }
                Some('.') => {}
                Some(c) => {
                    return Err(SqlError::invalid(format!(
                        "unexpected '{c}' after identifier part in '{s}'"
                    )));
                }
            }
        }

        Ok(Self { parts })
    }

    /// Append the parts of `other`, e.g. `excluded` + `email`.
    pub(crate) fn join(mut self, other: &Ident) -> Self {
        self.parts.extend(other.parts.iter().cloned());
        self
    }

    /// Render with `quote` around every named part, doubling embedded quotes.
    pub fn to_sql(&self, quote: char) -> String {
        let mut out = String::new();
        self.write_sql(&mut out, quote, IdentEscape::Double);
        out
    }

    /// Reject parts that could not have come out of [`Ident::parse`].
    ///
    /// `parts` is public, so a hand-built identifier is checked again before
    /// it is written.
    pub(crate) fn check(&self) -> SqlResult<()> {
        if self.parts.is_empty() {
            return Err(SqlError::invalid("identifier has no parts"));
        }
        let last = self.parts.len() - 1;
        for (i, part) in self.parts.iter().enumerate() {
            match part {
                IdentPart::Star if i != last => {
                    return Err(SqlError::invalid("'*' must be the last identifier part"));
                }
                IdentPart::Star => {}
                IdentPart::Name(name) => check_raw(name)?,
            }
        }
        Ok(())
    }

    pub(crate) fn write_sql(&self, out: &mut String, quote: char, escape: IdentEscape) {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            let IdentPart::Name(name) = part else {
                out.push('*');
                continue;
            };
            out.push(quote);
            for ch in name.chars() {
                match escape {
                    IdentEscape::Double if ch == quote => out.push(quote),
                    IdentEscape::Backslash if ch == quote || ch == '\\' => out.push('\\'),
                    _ => {}
                }
                out.push(ch);
            }
            out.push(quote);
        }
    }
}

fn check_raw(s: &str) -> SqlResult<()> {
    if s.is_empty() {
        return Err(SqlError::invalid("identifier cannot be empty"));
    }
    if s.contains('\0') {
        return Err(SqlError::invalid("identifier cannot contain NUL"));
    }
    Ok(())
}

/// Read up to the closing quote; the opening one is already consumed.
fn quoted_part(chars: &mut Peekable<Chars<'_>>) -> SqlResult<String> {
    let mut name = String::new();
    loop {
        match chars.next() {
            Some('"') if chars.peek() == Some(&'"') => {
                chars.next();
                name.push('"');
            }
            Some('"') => break,
            Some(c) => name.push(c),
            None => return Err(SqlError::invalid("unclosed quoted identifier")),
        }
    }
    if name.is_empty() {
        return Err(SqlError::invalid("empty quoted identifier"));
    }
    Ok(name)
}

fn bare_part(chars: &mut Peekable<Chars<'_>>, whole: &str) -> SqlResult<String> {
    let mut name = String::new();
    while let Some(&c) = chars.peek() {
        if c == '.' {
            break;
        }
        let valid = c == '_'
            || if name.is_empty() {
                c.is_ascii_alphabetic()
            } else {
                c == '$' || c.is_ascii_alphanumeric()
            };
        if !valid {
            return Err(SqlError::invalid(format!(
                "invalid character '{c}' in identifier '{whole}'"
            )));
        }
        name.push(c);
        chars.next();
    }
    if name.is_empty() {
        return Err(SqlError::invalid(format!("empty part in identifier '{whole}'")));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parts_are_quoted_separately() {
        let cases = [
            ("users", "`users`"),
            ("public.users", "`public`.`users`"),
            ("a.b.c", "`a`.`b`.`c`"),
            (r#"public."UserTable".id"#, "`public`.`UserTable`.`id`"),
            (r#""Camel Case""#, "`Camel Case`"),
            ("my_var$1", "`my_var$1`"),
            ("*", "*"),
            ("t.*", "`t`.*"),
        ];
        for (input, expected) in cases {
            assert_eq!(Ident::parse(input).unwrap().to_sql('`'), expected, "{input}");
        }
    }

    #[test]
    fn embedded_quote_is_doubled() {
        let ident = Ident::parse(r#""has""quote""#).unwrap();
        assert_eq!(ident.to_sql('"'), r#""has""quote""#);
        assert_eq!(Ident::name("we`ird").unwrap().to_sql('`'), "`we``ird`");
    }

    #[test]
    fn backslash_escape_rule() {
        let mut out = String::new();
        Ident::name(r"we`i\rd")
            .unwrap()
            .write_sql(&mut out, '`', IdentEscape::Backslash);
        assert_eq!(out, r"`we\`i\\rd`");
    }

    #[test]
    fn hand_built_parts_are_checked() {
        let empty = Ident {
            parts: vec![IdentPart::Name(String::new())],
        };
        assert!(empty.check().unwrap_err().is_invalid_expression());

        let star_first = Ident {
            parts: vec![IdentPart::Star, IdentPart::Name("a".into())],
        };
        assert!(star_first.check().is_err());
        assert!(Ident { parts: vec![] }.check().is_err());
        assert!(Ident::parse("t.*").unwrap().check().is_ok());
    }

    #[test]
    fn name_keeps_dots() {
        assert_eq!(Ident::name("a.b").unwrap().to_sql('"'), r#""a.b""#);
    }

    #[test]
    fn malformed_identifiers() {
        for bad in [
            "", "1table", "my table", "schema..table", "schema.", "*.t", "t.*.x", "\"unclosed",
            "\"\"", "a\0b", "x;drop",
        ] {
            let err = Ident::parse(bad).unwrap_err();
            assert!(err.is_invalid_expression(), "{bad:?}");
        }
        assert!(Ident::name("").is_err());
    }
}
