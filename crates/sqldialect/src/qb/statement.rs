//! The statement enum handed to dialects and the registry.

use crate::dialect::Dialect;
use crate::error::{SqlError, SqlResult};
use crate::qb::delete::DeleteQb;
use crate::qb::insert::InsertQb;
use crate::qb::select::SelectQb;
use crate::qb::traits::{BuiltQuery, SqlQb};
use crate::qb::update::UpdateQb;
use crate::render::SqlWriter;

/// Any buildable statement.
#[derive(Clone, Debug, PartialEq)]
pub enum Statement {
    Select(SelectQb),
    Insert(InsertQb),
    Update(UpdateQb),
    Delete(DeleteQb),
}

impl Statement {
    fn inner(&self) -> &dyn SqlQb {
        match self {
            Statement::Select(q) => q,
            Statement::Insert(q) => q,
            Statement::Update(q) => q,
            Statement::Delete(q) => q,
        }
    }
}

impl SqlQb for Statement {
    fn verb(&self) -> &'static str {
        self.inner().verb()
    }

    fn build_error(&self) -> Option<&SqlError> {
        self.inner().build_error()
    }

    fn is_prepared(&self) -> bool {
        self.inner().is_prepared()
    }

    fn validate(&self) -> SqlResult<()> {
        self.inner().validate()
    }

    fn write_sql(&self, w: &mut SqlWriter<'_>) -> SqlResult<()> {
        self.inner().write_sql(w)
    }
}

impl From<SelectQb> for Statement {
    fn from(q: SelectQb) -> Self {
        Statement::Select(q)
    }
}

impl From<InsertQb> for Statement {
    fn from(q: InsertQb) -> Self {
        Statement::Insert(q)
    }
}

impl From<UpdateQb> for Statement {
    fn from(q: UpdateQb) -> Self {
        Statement::Update(q)
    }
}

impl From<DeleteQb> for Statement {
    fn from(q: DeleteQb) -> Self {
        Statement::Delete(q)
    }
}

#[cfg(feature = "tracing")]
const MAX_LOGGED_SQL: usize = 200;

pub(crate) fn log_built(dialect: &Dialect, verb: &'static str, built: &BuiltQuery) {
    #[cfg(feature = "tracing")]
    {
        let sql = truncate_for_log(&built.sql, MAX_LOGGED_SQL);
        tracing::debug!(
            target: "sqldialect.build",
            dialect = dialect.name(),
            verb,
            param_count = built.params.len(),
            sql = %sql,
            "built statement"
        );
    }
    #[cfg(not(feature = "tracing"))]
    let _ = (dialect, verb, built);
}

/// Cut `s` to at most `max` bytes on a char boundary.
#[cfg(feature = "tracing")]
fn truncate_for_log(s: &str, max: usize) -> std::borrow::Cow<'_, str> {
    if s.len() <= max {
        return std::borrow::Cow::Borrowed(s);
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    std::borrow::Cow::Owned(format!("{}...", &s[..end]))
}
