//! Error types for sqldialect

use crate::dialect::Capability;
use thiserror::Error;

/// Result type alias for sqldialect operations
pub type SqlResult<T> = Result<T, SqlError>;

/// Error types for statement construction and rendering.
///
/// Every variant is deterministic: the same input always produces the same
/// error, so nothing here is worth retrying.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SqlError {
    /// Malformed expression tree (bad identifier, arity mismatch, ...)
    #[error("Invalid expression: {0}")]
    InvalidExpression(String),

    /// No dialect registered under this name
    #[error("Dialect not found: {0}")]
    DialectNotFound(String),

    /// A dialect with this name is already registered
    #[error("Dialect already registered: {0}")]
    DialectAlreadyRegistered(String),

    /// The resolved dialect cannot express the requested construct
    #[error("Dialect '{dialect}' does not support {construct}")]
    UnsupportedConstruct {
        construct: Capability,
        dialect: String,
    },

    /// Multi-row insert rows disagree with the declared column list
    #[error("Inconsistent row shape: {0}")]
    InconsistentRowShape(String),

    /// Dialect configuration could not be loaded
    #[error("Config error: {0}")]
    Config(String),
}

impl SqlError {
    /// Create an invalid expression error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidExpression(message.into())
    }

    /// Create an unsupported construct error
    pub fn unsupported(construct: Capability, dialect: impl Into<String>) -> Self {
        Self::UnsupportedConstruct {
            construct,
            dialect: dialect.into(),
        }
    }

    /// Create a row shape error
    pub fn row_shape(message: impl Into<String>) -> Self {
        Self::InconsistentRowShape(message.into())
    }

    /// Check if this is an invalid expression error
    pub fn is_invalid_expression(&self) -> bool {
        matches!(self, Self::InvalidExpression(_))
    }

    /// Check if this is an unsupported construct error
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::UnsupportedConstruct { .. })
    }

    /// Check if this is a row shape error
    pub fn is_row_shape(&self) -> bool {
        matches!(self, Self::InconsistentRowShape(_))
    }
}

impl From<toml::de::Error> for SqlError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}
