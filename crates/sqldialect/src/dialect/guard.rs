//! Capability checks run before a gated construct is rendered.

use std::fmt;

use crate::dialect::Dialect;
use crate::error::{SqlError, SqlResult};

/// A SQL construct that only some dialects can express.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// `ON CONFLICT (target)`
    ConflictTarget,
    /// `ON CONFLICT ... DO UPDATE ... WHERE`
    ConflictUpdateWhere,
    /// `SELECT DISTINCT ON (...)`
    DistinctOn,
    /// `UPDATE a ... FROM b`
    MultipleUpdateTables,
    /// `RETURNING ...`
    Returning,
    /// `fn(...) OVER (...)`
    WindowFunction,
    /// `UPDATE ... ORDER BY`
    OrderByOnUpdate,
    /// `UPDATE ... LIMIT`
    LimitOnUpdate,
    /// `DELETE ... ORDER BY`
    OrderByOnDelete,
    /// `DELETE ... LIMIT`
    LimitOnDelete,
}

impl Capability {
    pub const ALL: [Capability; 10] = [
        Capability::ConflictTarget,
        Capability::ConflictUpdateWhere,
        Capability::DistinctOn,
        Capability::MultipleUpdateTables,
        Capability::Returning,
        Capability::WindowFunction,
        Capability::OrderByOnUpdate,
        Capability::LimitOnUpdate,
        Capability::OrderByOnDelete,
        Capability::LimitOnDelete,
    ];
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Capability::ConflictTarget => "ON CONFLICT target",
            Capability::ConflictUpdateWhere => "ON CONFLICT DO UPDATE WHERE",
            Capability::DistinctOn => "DISTINCT ON",
            Capability::MultipleUpdateTables => "multi-table UPDATE",
            Capability::Returning => "RETURNING",
            Capability::WindowFunction => "window functions",
            Capability::OrderByOnUpdate => "ORDER BY on UPDATE",
            Capability::LimitOnUpdate => "LIMIT on UPDATE",
            Capability::OrderByOnDelete => "ORDER BY on DELETE",
            Capability::LimitOnDelete => "LIMIT on DELETE",
        };
        f.write_str(s)
    }
}

/// Fail with `UnsupportedConstruct` unless `dialect` supports `cap`.
pub fn require(dialect: &Dialect, cap: Capability) -> SqlResult<()> {
    if dialect.supports(cap) {
        return Ok(());
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        target: "sqldialect.guard",
        dialect = dialect.name(),
        construct = %cap,
        "rejected unsupported construct"
    );

    Err(SqlError::unsupported(cap, dialect.name()))
}
