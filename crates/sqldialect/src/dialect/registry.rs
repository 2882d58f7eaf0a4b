//! Named dialect registry and the top-level build entry point.

use std::collections::HashMap;

use crate::dialect::{Dialect, DialectOptions};
use crate::error::{SqlError, SqlResult};
use crate::qb::{BuiltQuery, Statement};

/// Name of the baseline dialect.
pub const DEFAULT_DIALECT: &str = "default";
/// Name of the Cloud Spanner dialect.
pub const SPANNER_DIALECT: &str = "spanner";
/// Name of the PostgreSQL dialect.
pub const POSTGRES_DIALECT: &str = "postgres";

/// Registry mapping dialect names to their configuration.
///
/// Populate it once during start-up (registration takes `&mut self`), then
/// share it read-only, e.g. behind an `Arc`. Tests can build isolated
/// registries freely since nothing here is global.
///
/// ```
/// use sqldialect::{DialectOptions, DialectRegistry, qb};
///
/// let mut registry = DialectRegistry::new();
/// registry.register("spanner", DialectOptions::default().quote_char('`'))?;
///
/// let built = registry.build(qb::select("table"), "spanner")?;
/// assert_eq!(built.sql, "SELECT * FROM `table`");
/// # Ok::<(), sqldialect::SqlError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct DialectRegistry {
    dialects: HashMap<String, Dialect>,
}

impl DialectRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the `default`, `spanner` and `postgres` dialects.
    pub fn with_builtin_dialects() -> Self {
        let mut dialects = HashMap::new();
        for d in [
            Dialect::default_dialect(),
            Dialect::spanner(),
            Dialect::postgres(),
        ] {
            dialects.insert(d.name().to_string(), d);
        }
        Self { dialects }
    }

    /// Register a dialect. Names are unique; re-registration is an error.
    pub fn register(&mut self, name: &str, options: DialectOptions) -> SqlResult<()> {
        if self.dialects.contains_key(name) {
            return Err(SqlError::DialectAlreadyRegistered(name.to_string()));
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "sqldialect.registry",
            dialect = name,
            quote_char = %options.quote_char,
            "registered dialect"
        );

        self.dialects
            .insert(name.to_string(), Dialect::new(name, options));
        Ok(())
    }

    /// Look up a dialect by name.
    pub fn resolve(&self, name: &str) -> SqlResult<Dialect> {
        self.get(name)
            .cloned()
            .ok_or_else(|| SqlError::DialectNotFound(name.to_string()))
    }

    /// Borrow a dialect by name.
    pub fn get(&self, name: &str) -> Option<&Dialect> {
        self.dialects.get(name)
    }

    /// Check if a dialect is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.dialects.contains_key(name)
    }

    /// Registered dialect names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.dialects.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.dialects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dialects.is_empty()
    }

    /// Resolve `dialect` and render `statement` with it.
    pub fn build(&self, statement: impl Into<Statement>, dialect: &str) -> SqlResult<BuiltQuery> {
        let dialect = self
            .get(dialect)
            .ok_or_else(|| SqlError::DialectNotFound(dialect.to_string()))?;
        dialect.build(statement)
    }
}

/// Build a statement against a named dialect from `registry`.
///
/// Returns either a complete statement or an error; never partial SQL.
pub fn build_statement(
    registry: &DialectRegistry,
    statement: impl Into<Statement>,
    dialect: &str,
) -> SqlResult<BuiltQuery> {
    registry.build(statement, dialect)
}
