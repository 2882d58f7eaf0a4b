//! Trait definitions for statement builders.

use crate::dialect::Dialect;
use crate::error::{SqlError, SqlResult};
use crate::render::SqlWriter;
use crate::value::Value;

/// Base trait for all statement builders.
///
/// Implementors only describe how to write themselves; building, validation
/// and logging are shared.
pub trait SqlQb {
    /// Statement keyword (`SELECT`, `INSERT`, ...).
    fn verb(&self) -> &'static str;

    /// First construction error recorded by the builder, if any.
    fn build_error(&self) -> Option<&SqlError> {
        None
    }

    /// Whether values are bound as parameters instead of inlined.
    fn is_prepared(&self) -> bool {
        false
    }

    /// Write the statement. Callers run [`SqlQb::validate`] first.
    fn write_sql(&self, w: &mut SqlWriter<'_>) -> SqlResult<()>;

    /// Validate builder state before rendering.
    fn validate(&self) -> SqlResult<()> {
        match self.build_error() {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    /// Render against `dialect`: complete SQL and params, or an error.
    fn build(&self, dialect: &Dialect) -> SqlResult<BuiltQuery> {
        self.validate()?;
        let mut w = SqlWriter::new(dialect, self.is_prepared());
        self.write_sql(&mut w)?;
        let built = w.finish();
        crate::qb::statement::log_built(dialect, self.verb(), &built);
        Ok(built)
    }

    /// Debug helper returning only the SQL text.
    fn to_sql(&self, dialect: &Dialect) -> SqlResult<String> {
        self.build(dialect).map(|b| b.sql)
    }
}

/// The result of building a statement.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    pub sql: String,
    /// Bound values, in placeholder order. Empty (never absent) when nothing is bound.
    pub params: Vec<Value>,
}

impl BuiltQuery {
    /// Create a new built query.
    pub fn new(sql: String, params: Vec<Value>) -> Self {
        Self { sql, params }
    }

    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.sql, self.params)
    }
}
