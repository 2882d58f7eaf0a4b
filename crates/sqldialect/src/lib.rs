//! # sqldialect
//!
//! A dialect-aware SQL statement builder: expression trees in, SQL text and
//! ordered params out.
//!
//! ## Features
//!
//! - **Per-dialect rendering**: identifier quoting, placeholder style and
//!   literal formatting come from [`DialectOptions`]
//! - **Capability guard**: constructs a dialect cannot express (DISTINCT ON,
//!   RETURNING, window functions, ...) fail with
//!   [`SqlError::UnsupportedConstruct`]; no partial SQL is ever returned
//! - **Inline or prepared**: values render as literals, or as placeholders
//!   with params in text order
//! - **Explicit registry**: [`DialectRegistry`] is a plain value, populated
//!   once and shared read-only
//! - **Typed rows**: `#[derive(InsertRow)]` for multi-row inserts
//!
//! ## Query Builder (qb)
//!
//! ```
//! use sqldialect::{DialectRegistry, qb};
//! use sqldialect::qb::{col, count, star};
//!
//! let registry = DialectRegistry::with_builtin_dialects();
//!
//! let query = qb::select("orders")
//!     .select_exprs(vec![col("customer_id")?, count(star()).alias("n")?])
//!     .in_list("status", ["paid", "shipped"])
//!     .group_by(&["customer_id"])
//!     .order_by(count(star()).desc());
//!
//! let built = registry.build(query, "spanner")?;
//! assert_eq!(
//!     built.sql,
//!     "SELECT `customer_id`, COUNT(*) AS `n` FROM `orders` \
//!      WHERE (`status` IN ('paid', 'shipped')) GROUP BY `customer_id` ORDER BY COUNT(*) DESC"
//! );
//! assert!(built.params.is_empty());
//! # Ok::<(), sqldialect::SqlError>(())
//! ```

pub mod dialect;
pub mod error;
pub mod ident;
pub mod qb;
pub mod record;
pub mod render;
pub mod value;

pub use dialect::{
    BytesFormat, Capabilities, Capability, DEFAULT_DIALECT, Dialect, DialectOptions,
    DialectRegistry, LiteralFormat, POSTGRES_DIALECT, PlaceholderStyle, SPANNER_DIALECT,
    build_statement, default_dialect_options,
};
pub use error::{SqlError, SqlResult};
pub use ident::{Ident, IdentEscape, IdentPart};
pub use record::{InsertRow, Record};
pub use value::Value;

// Re-export qb module for easy access
pub use qb::{
    BuiltQuery, DeleteQb, Expr, InsertQb, SelectQb, SqlQb, Statement, UpdateQb, delete,
    delete_from, insert, insert_into, select, select_from, update,
};

#[cfg(feature = "derive")]
pub use sqldialect_derive::InsertRow;
