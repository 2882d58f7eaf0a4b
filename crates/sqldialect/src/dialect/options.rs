use serde::{Deserialize, Serialize};

use crate::dialect::Capability;
use crate::error::SqlResult;
use crate::ident::IdentEscape;

/// Rendering rules and capability flags of one SQL dialect.
///
/// Start from [`DialectOptions::default`] (every construct supported, `"`
/// quoting, `?` placeholders) and override only what differs:
///
/// ```
/// use sqldialect::DialectOptions;
///
/// let opts = DialectOptions::default()
///     .quote_char('`')
///     .supports_distinct_on(false);
/// assert!(opts.capabilities.supports_returning);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialectOptions {
    /// Character wrapped around every identifier part.
    pub quote_char: char,
    /// How a quote character inside an identifier is escaped.
    pub ident_escape: IdentEscape,
    /// How bound parameters are marked in SQL text.
    pub placeholder: PlaceholderStyle,
    /// Per-type literal formatting.
    pub literals: LiteralFormat,
    /// Which gated constructs may be emitted.
    pub capabilities: Capabilities,
}

/// Placeholder marker for bound parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaceholderStyle {
    /// Marker text, e.g. `?`, `$` or `@p`.
    pub fragment: String,
    /// Append the 1-based parameter index (`$1`, `@p2`).
    pub numbered: bool,
}

/// How literal values are written inline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiteralFormat {
    pub null: String,
    pub true_literal: String,
    pub false_literal: String,
    /// Quote character around string literals.
    pub string_quote: char,
    /// Replacements applied to string contents, checked in order.
    pub string_escapes: Vec<(char, String)>,
    pub bytes: BytesFormat,
    /// `chrono` format string for timestamps (rendered in UTC, then quoted).
    pub time_format: String,
}

/// Byte-string literal styles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "style", rename_all = "snake_case")]
pub enum BytesFormat {
    /// `X'0a1b'`
    Hex,
    /// `<prefix>'\x0a\x1b'`
    EscapedHex { prefix: String },
    /// `'\x0a1b'`
    Bytea,
}

/// Capability flags checked by the guard before rendering gated constructs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Capabilities {
    pub supports_conflict_target: bool,
    pub supports_conflict_update_where: bool,
    pub supports_distinct_on: bool,
    pub supports_multiple_update_tables: bool,
    pub supports_returning: bool,
    pub supports_window_function: bool,
    pub supports_order_by_on_update: bool,
    pub supports_limit_on_update: bool,
    pub supports_order_by_on_delete: bool,
    pub supports_limit_on_delete: bool,
}

impl Default for PlaceholderStyle {
    fn default() -> Self {
        Self {
            fragment: "?".to_string(),
            numbered: false,
        }
    }
}

impl Default for LiteralFormat {
    fn default() -> Self {
        Self {
            null: "NULL".to_string(),
            true_literal: "TRUE".to_string(),
            false_literal: "FALSE".to_string(),
            string_quote: '\'',
            string_escapes: vec![('\'', "''".to_string())],
            bytes: BytesFormat::Hex,
            time_format: "%Y-%m-%dT%H:%M:%S%.fZ".to_string(),
        }
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            supports_conflict_target: true,
            supports_conflict_update_where: true,
            supports_distinct_on: true,
            supports_multiple_update_tables: true,
            supports_returning: true,
            supports_window_function: true,
            supports_order_by_on_update: true,
            supports_limit_on_update: true,
            supports_order_by_on_delete: true,
            supports_limit_on_delete: true,
        }
    }
}

impl Capabilities {
    /// Check a single capability flag.
    pub fn supports(&self, cap: Capability) -> bool {
        match cap {
            Capability::ConflictTarget => self.supports_conflict_target,
            Capability::ConflictUpdateWhere => self.supports_conflict_update_where,
            Capability::DistinctOn => self.supports_distinct_on,
            Capability::MultipleUpdateTables => self.supports_multiple_update_tables,
            Capability::Returning => self.supports_returning,
            Capability::WindowFunction => self.supports_window_function,
            Capability::OrderByOnUpdate => self.supports_order_by_on_update,
            Capability::LimitOnUpdate => self.supports_limit_on_update,
            Capability::OrderByOnDelete => self.supports_order_by_on_delete,
            Capability::LimitOnDelete => self.supports_limit_on_delete,
        }
    }
}

impl Default for DialectOptions {
    fn default() -> Self {
        Self {
            quote_char: '"',
            ident_escape: IdentEscape::Double,
            placeholder: PlaceholderStyle::default(),
            literals: LiteralFormat::default(),
            capabilities: Capabilities::default(),
        }
    }
}

impl DialectOptions {
    /// Create options with the baseline defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from TOML. Omitted keys keep their baseline values.
    ///
    /// ```
    /// let opts = sqldialect::DialectOptions::from_toml_str(r#"
    ///     quote_char = "`"
    ///     [capabilities]
    ///     supports_returning = false
    /// "#)?;
    /// assert_eq!(opts.quote_char, '`');
    /// assert!(!opts.capabilities.supports_returning);
    /// assert!(opts.capabilities.supports_distinct_on);
    /// # Ok::<(), sqldialect::SqlError>(())
    /// ```
    pub fn from_toml_str(s: &str) -> SqlResult<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Options for Cloud Spanner (GoogleSQL).
    pub fn spanner() -> Self {
        Self::default()
            .quote_char('`')
            .ident_escape(IdentEscape::Backslash)
            .string_escapes(vec![
                ('\\', "\\\\".to_string()),
                ('\'', "\\'".to_string()),
                ('\n', "\\n".to_string()),
                ('\r', "\\r".to_string()),
                ('\t', "\\t".to_string()),
                ('\0', "\\x00".to_string()),
            ])
            .bytes_format(BytesFormat::EscapedHex {
                prefix: "b".to_string(),
            })
            .supports_distinct_on(false)
            .supports_conflict_target(false)
            .supports_conflict_update_where(false)
            .supports_returning(false)
            .supports_multiple_update_tables(false)
            .supports_order_by_on_update(false)
            .supports_limit_on_update(false)
            .supports_order_by_on_delete(false)
            .supports_limit_on_delete(false)
    }

    /// Options for PostgreSQL.
    pub fn postgres() -> Self {
        Self::default()
            .placeholder("$", true)
            .bytes_format(BytesFormat::Bytea)
            .supports_order_by_on_update(false)
            .supports_limit_on_update(false)
            .supports_order_by_on_delete(false)
            .supports_limit_on_delete(false)
    }

    /// Set the identifier quote character.
    pub fn quote_char(mut self, quote: char) -> Self {
        self.quote_char = quote;
        self
    }

    /// Set how quote characters inside identifiers are escaped.
    pub fn ident_escape(mut self, escape: IdentEscape) -> Self {
        self.ident_escape = escape;
        self
    }

    /// Set the placeholder marker and whether it is numbered.
    pub fn placeholder(mut self, fragment: &str, numbered: bool) -> Self {
        self.placeholder = PlaceholderStyle {
            fragment: fragment.to_string(),
            numbered,
        };
        self
    }

    /// Set the boolean keywords.
    pub fn bool_literals(mut self, true_literal: &str, false_literal: &str) -> Self {
        self.literals.true_literal = true_literal.to_string();
        self.literals.false_literal = false_literal.to_string();
        self
    }

    /// Replace the string escape table.
    pub fn string_escapes(mut self, escapes: Vec<(char, String)>) -> Self {
        self.literals.string_escapes = escapes;
        self
    }

    /// Set the byte-string literal style.
    pub fn bytes_format(mut self, format: BytesFormat) -> Self {
        self.literals.bytes = format;
        self
    }

    /// Set the timestamp format string.
    pub fn time_format(mut self, format: &str) -> Self {
        self.literals.time_format = format.to_string();
        self
    }

    pub fn supports_conflict_target(mut self, yes: bool) -> Self {
        self.capabilities.supports_conflict_target = yes;
        self
    }

    pub fn supports_conflict_update_where(mut self, yes: bool) -> Self {
        self.capabilities.supports_conflict_update_where = yes;
        self
    }

    pub fn supports_distinct_on(mut self, yes: bool) -> Self {
        self.capabilities.supports_distinct_on = yes;
        self
    }

    pub fn supports_multiple_update_tables(mut self, yes: bool) -> Self {
        self.capabilities.supports_multiple_update_tables = yes;
        self
    }

    pub fn supports_returning(mut self, yes: bool) -> Self {
        self.capabilities.supports_returning = yes;
        self
    }

    pub fn supports_window_function(mut self, yes: bool) -> Self {
        self.capabilities.supports_window_function = yes;
        self
    }

    pub fn supports_order_by_on_update(mut self, yes: bool) -> Self {
        self.capabilities.supports_order_by_on_update = yes;
        self
    }

    pub fn supports_limit_on_update(mut self, yes: bool) -> Self {
        self.capabilities.supports_limit_on_update = yes;
        self
    }

    pub fn supports_order_by_on_delete(mut self, yes: bool) -> Self {
        self.capabilities.supports_order_by_on_delete = yes;
        self
    }

    pub fn supports_limit_on_delete(mut self, yes: bool) -> Self {
        self.capabilities.supports_limit_on_delete = yes;
        self
    }
}

/// The baseline capability set a dialect author narrows from.
pub fn default_dialect_options() -> DialectOptions {
    DialectOptions::default()
}
