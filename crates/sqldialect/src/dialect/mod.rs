//! Dialect configuration, capability guard and the dialect registry.
//!
//! A [`Dialect`] is a name plus an immutable, shared [`DialectOptions`]. It is
//! cheap to clone and safe to use from any number of threads at once.

mod guard;
mod options;
mod registry;

use std::sync::Arc;

pub use guard::{Capability, require};
pub use options::{
    BytesFormat, Capabilities, DialectOptions, LiteralFormat, PlaceholderStyle,
    default_dialect_options,
};
pub use registry::{
    DEFAULT_DIALECT, DialectRegistry, POSTGRES_DIALECT, SPANNER_DIALECT, build_statement,
};

use crate::error::SqlResult;
use crate::qb::{BuiltQuery, SqlQb, Statement};

/// A named, immutable dialect configuration.
#[derive(Debug, Clone)]
pub struct Dialect {
    name: Arc<str>,
    options: Arc<DialectOptions>,
}

impl Dialect {
    /// Create a dialect. The options are frozen from here on.
    pub fn new(name: impl Into<String>, options: DialectOptions) -> Self {
        Self {
            name: Arc::from(name.into()),
            options: Arc::new(options),
        }
    }

    /// The baseline dialect (`default`).
    pub fn default_dialect() -> Self {
        Self::new(DEFAULT_DIALECT, DialectOptions::default())
    }

    /// The Cloud Spanner dialect (`spanner`).
    pub fn spanner() -> Self {
        Self::new(SPANNER_DIALECT, DialectOptions::spanner())
    }

    /// The PostgreSQL dialect (`postgres`).
    pub fn postgres() -> Self {
        Self::new(POSTGRES_DIALECT, DialectOptions::postgres())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> &DialectOptions {
        &self.options
    }

    /// Check whether this dialect can emit `cap`.
    pub fn supports(&self, cap: Capability) -> bool {
        self.options.capabilities.supports(cap)
    }

    /// Render a statement into SQL text and ordered params.
    pub fn build(&self, statement: impl Into<Statement>) -> SqlResult<BuiltQuery> {
        statement.into().build(self)
    }
}
