use std::fmt::Write;

use crate::dialect::{BytesFormat, Dialect};
use crate::error::{SqlError, SqlResult};
use crate::ident::Ident;
use crate::qb::{BuiltQuery, ParamList};
use crate::value::Value;

/// Accumulates SQL text and bound parameters for one statement.
///
/// Every placeholder is written in the same call that pushes its value, so
/// the params always line up with the placeholders in the text.
pub struct SqlWriter<'d> {
    dialect: &'d Dialect,
    sql: String,
    params: ParamList,
    prepared: bool,
}

impl<'d> SqlWriter<'d> {
    /// Create a writer. With `prepared`, non-NULL values are bound instead of inlined.
    pub fn new(dialect: &'d Dialect, prepared: bool) -> Self {
        Self {
            dialect,
            sql: String::with_capacity(128),
            params: ParamList::new(),
            prepared,
        }
    }

    pub fn dialect(&self) -> &'d Dialect {
        self.dialect
    }

    pub fn is_prepared(&self) -> bool {
        self.prepared
    }

    /// Append raw SQL.
    pub fn push(&mut self, sql: &str) -> &mut Self {
        self.sql.push_str(sql);
        self
    }

    pub fn push_char(&mut self, c: char) -> &mut Self {
        self.sql.push(c);
        self
    }

    /// Append an identifier quoted and escaped per the dialect.
    pub fn push_ident(&mut self, ident: &Ident) -> SqlResult<()> {
        ident.check()?;
        let dialect = self.dialect;
        let opts = dialect.options();
        ident.write_sql(&mut self.sql, opts.quote_char, opts.ident_escape);
        Ok(())
    }

    /// Append a placeholder and bind `value`.
    pub fn push_bind(&mut self, value: Value) -> &mut Self {
        let idx = self.params.push(value);
        let dialect = self.dialect;
        let style = &dialect.options().placeholder;
        self.sql.push_str(&style.fragment);
        if style.numbered {
            let _ = write!(self.sql, "{idx}");
        }
        self
    }

    /// Append `(p1, p2, ...)`, one placeholder per element.
    pub fn push_bind_list(&mut self, values: &[Value]) -> SqlResult<()> {
        if values.is_empty() {
            return Err(empty_list());
        }
        self.sql.push('(');
        for (i, v) in values.iter().enumerate() {
            if i > 0 {
                self.sql.push_str(", ");
            }
            self.push_bind(v.clone());
        }
        self.sql.push(')');
        Ok(())
    }

    /// Append a value: inline, or bound in prepared mode.
    ///
    /// NULL is always inline. Lists expand element by element.
    pub fn push_value(&mut self, value: &Value) -> SqlResult<()> {
        match value {
            Value::Null => {
                let dialect = self.dialect;
                self.sql.push_str(&dialect.options().literals.null);
                Ok(())
            }
            Value::List(items) if items.is_empty() => Err(empty_list()),
            Value::List(items) => {
                self.sql.push('(');
                for (i, v) in items.iter().enumerate() {
                    if i > 0 {
                        self.sql.push_str(", ");
                    }
                    self.push_value(v)?;
                }
                self.sql.push(')');
                Ok(())
            }
            v if self.prepared => {
                self.push_bind(v.clone());
                Ok(())
            }
            v => self.push_literal(v),
        }
    }

    /// Append a value as inline literal text.
    pub fn push_literal(&mut self, value: &Value) -> SqlResult<()> {
        let dialect = self.dialect;
        let lits = &dialect.options().literals;
        match value {
            Value::Null => self.sql.push_str(&lits.null),
            Value::Bool(true) => self.sql.push_str(&lits.true_literal),
            Value::Bool(false) => self.sql.push_str(&lits.false_literal),
            Value::Int(n) => {
                let _ = write!(self.sql, "{n}");
            }
            Value::UInt(n) => {
                let _ = write!(self.sql, "{n}");
            }
            Value::Float(f) => {
                if !f.is_finite() {
                    return Err(SqlError::invalid(format!(
                        "Cannot render non-finite float {f} as a literal"
                    )));
                }
                let _ = write!(self.sql, "{f}");
            }
            Value::String(s) => self.push_quoted(s),
            Value::Bytes(b) => self.push_bytes(b),
            Value::List(_) => return self.push_value(value),
            Value::Timestamp(ts) => {
                let mut text = String::new();
                write!(text, "{}", ts.format(&lits.time_format)).map_err(|_| {
                    SqlError::invalid(format!("Invalid time format '{}'", lits.time_format))
                })?;
                self.push_quoted(&text);
            }
            Value::Uuid(u) => self.push_quoted(&u.hyphenated().to_string()),
            Value::Json(j) => self.push_quoted(&j.to_string()),
        }
        Ok(())
    }

    fn push_quoted(&mut self, s: &str) {
        let dialect = self.dialect;
        let lits = &dialect.options().literals;
        self.sql.push(lits.string_quote);
        for ch in s.chars() {
            match lits.string_escapes.iter().find(|(c, _)| *c == ch) {
                Some((_, rep)) => self.sql.push_str(rep),
                None => self.sql.push(ch),
            }
        }
        self.sql.push(lits.string_quote);
    }

    fn push_bytes(&mut self, bytes: &[u8]) {
        let dialect = self.dialect;
        match &dialect.options().literals.bytes {
            BytesFormat::Hex => {
                self.sql.push_str("X'");
                for b in bytes {
                    let _ = write!(self.sql, "{b:02x}");
                }
                self.sql.push('\'');
            }
            BytesFormat::EscapedHex { prefix } => {
                self.sql.push_str(prefix);
                self.sql.push('\'');
                for b in bytes {
                    let _ = write!(self.sql, "\\x{b:02x}");
                }
                self.sql.push('\'');
            }
            BytesFormat::Bytea => {
                self.sql.push_str("'\\x");
                for b in bytes {
                    let _ = write!(self.sql, "{b:02x}");
                }
                self.sql.push('\'');
            }
        }
    }

    /// SQL written so far.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    pub fn finish(self) -> BuiltQuery {
        BuiltQuery::new(self.sql, self.params.into_vec())
    }
}

/// `()` is never valid SQL; `IN` handles its empty list before getting here.
fn empty_list() -> SqlError {
    SqlError::invalid("Empty list cannot be rendered outside IN / NOT IN")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::DialectOptions;
    use chrono::{TimeZone, Utc};

    fn render(dialect: &Dialect, value: &Value) -> String {
        let mut w = SqlWriter::new(dialect, false);
        w.push_value(value).unwrap();
        w.finish().sql
    }

    #[test]
    fn strings_use_escape_table() {
        let d = Dialect::default_dialect();
        assert_eq!(render(&d, &Value::from("it's")), "'it''s'");

        let s = Dialect::spanner();
        assert_eq!(render(&s, &Value::from(r"it's a \ test")), r"'it\'s a \\ test'");
        assert_eq!(
            render(&s, &Value::from("line1\nline2\r\tend\0")),
            r"'line1\nline2\r\tend\x00'"
        );
        // The baseline keeps control characters as they are.
        assert_eq!(render(&d, &Value::from("a\nb")), "'a\nb'");
    }

    #[test]
    fn empty_list_is_rejected() {
        let d = Dialect::default_dialect();
        let mut w = SqlWriter::new(&d, false);
        let err = w.push_value(&Value::List(vec![])).unwrap_err();
        assert!(err.is_invalid_expression());

        let mut w = SqlWriter::new(&d, true);
        assert!(w.push_bind_list(&[]).is_err());
    }

    #[test]
    fn bad_time_format_is_an_error() {
        let opts = DialectOptions::from_toml_str(
            r#"
            [literals]
            time_format = "%Y-%"
            "#,
        )
        .unwrap();
        let d = Dialect::new("bad_time", opts);
        let ts = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();

        let mut w = SqlWriter::new(&d, false);
        let err = w.push_value(&Value::from(ts)).unwrap_err();
        assert!(err.is_invalid_expression());
        assert!(err.to_string().contains("%Y-%"), "{err}");
    }

    #[test]
    fn identifier_escape_follows_dialect() {
        let ident = Ident::name("we`ird").unwrap();

        let spanner = Dialect::spanner();
        let mut w = SqlWriter::new(&spanner, false);
        w.push_ident(&ident).unwrap();
        assert_eq!(w.sql(), r"`we\`ird`");

        let bt = Dialect::new("bt", DialectOptions::default().quote_char('`'));
        let mut w = SqlWriter::new(&bt, false);
        w.push_ident(&ident).unwrap();
        assert_eq!(w.sql(), "`we``ird`");
    }

    #[test]
    fn numbers_are_bare() {
        let d = Dialect::default_dialect();
        assert_eq!(render(&d, &Value::Int(-3)), "-3");
        assert_eq!(render(&d, &Value::UInt(u64::MAX)), "18446744073709551615");
        assert_eq!(render(&d, &Value::Float(1.5)), "1.5");
        assert_eq!(render(&d, &Value::Float(3.0)), "3");
    }

    #[test]
    fn non_finite_float_is_rejected() {
        let d = Dialect::default_dialect();
        let mut w = SqlWriter::new(&d, false);
        let err = w.push_value(&Value::Float(f64::NAN)).unwrap_err();
        assert!(err.is_invalid_expression());
    }

    #[test]
    fn bytes_follow_dialect_format() {
        let bytes = Value::bytes(vec![0x0a, 0xff]);
        assert_eq!(render(&Dialect::default_dialect(), &bytes), "X'0aff'");
        assert_eq!(render(&Dialect::spanner(), &bytes), r"b'\x0a\xff'");
        assert_eq!(render(&Dialect::postgres(), &bytes), r"'\x0aff'");
    }

    #[test]
    fn bool_and_null_keywords() {
        let d = Dialect::new("x", DialectOptions::default().bool_literals("1", "0"));
        assert_eq!(render(&d, &Value::Bool(true)), "1");
        assert_eq!(render(&d, &Value::Null), "NULL");
    }

    #[test]
    fn timestamps_are_quoted() {
        let d = Dialect::default_dialect();
        let ts = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(render(&d, &Value::from(ts)), "'2024-01-02T03:04:05Z'");
    }

    #[test]
    fn json_is_a_quoted_string() {
        let d = Dialect::default_dialect();
        let v = Value::from(serde_json::json!({"k": "it's"}));
        assert_eq!(render(&d, &v), r#"'{"k":"it''s"}'"#);
    }

    #[test]
    fn numbered_placeholders() {
        let d = Dialect::postgres();
        let mut w = SqlWriter::new(&d, true);
        w.push_value(&Value::list(["a", "b"])).unwrap();
        w.push(" ");
        w.push_value(&Value::Null).unwrap();
        let built = w.finish();
        assert_eq!(built.sql, "($1, $2) NULL");
        assert_eq!(built.params.len(), 2);
    }
}
