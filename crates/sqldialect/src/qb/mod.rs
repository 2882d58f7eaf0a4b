//! Statement builders (QB) over the expression layer.
//!
//! Builders are plain data: build one, then render it against any number of
//! dialects. Nothing is rendered until [`SqlQb::build`] (or
//! [`Dialect::build`](crate::Dialect::build)) is called.
//!
//! # Usage
//!
//! ```
//! use sqldialect::qb::{self, SqlQb, col};
//! use sqldialect::Dialect;
//!
//! let spanner = Dialect::spanner();
//!
//! // SELECT
//! let sql = qb::select("users")
//!     .select(&["id", "name"])
//!     .eq("status", "active")
//!     .and_where(col("age")?.gt(18))
//!     .order_by_desc("created_at")
//!     .limit(20)
//!     .to_sql(&spanner)?;
//! assert_eq!(
//!     sql,
//!     "SELECT `id`, `name` FROM `users` WHERE ((`status` = 'active') AND (`age` > 18)) \
//!      ORDER BY `created_at` DESC LIMIT 20"
//! );
//!
//! // INSERT
//! let built = qb::insert("users")
//!     .set("name", "alice")
//!     .set("email", "alice@example.com")
//!     .prepared(true)
//!     .build(&spanner)?;
//! assert_eq!(built.sql, "INSERT INTO `users` (`name`, `email`) VALUES (?, ?)");
//! assert_eq!(built.params.len(), 2);
//!
//! // UPDATE
//! let sql = qb::update("users").set("status", "inactive").eq("id", 7).to_sql(&spanner)?;
//! assert_eq!(sql, "UPDATE `users` SET `status` = 'inactive' WHERE (`id` = 7)");
//!
//! // DELETE
//! let sql = qb::delete("users").eq("id", 7).to_sql(&spanner)?;
//! assert_eq!(sql, "DELETE FROM `users` WHERE (`id` = 7)");
//! # Ok::<(), sqldialect::SqlError>(())
//! ```

use crate::error::SqlError;

/// WHERE helpers shared by SELECT, UPDATE and DELETE.
///
/// The builder needs `where_group: ExprGroup` and `build_error: Option<SqlError>`
/// fields. Column names are parsed; the first failure is kept for `build`.
macro_rules! impl_where_methods {
    ($ty:ty) => {
        impl $ty {
            fn where_col(
                mut self,
                column: &str,
                f: impl FnOnce($crate::qb::Expr) -> $crate::qb::Expr,
            ) -> Self {
                match $crate::qb::col(column) {
                    Ok(c) => self.where_group.and_expr(f(c)),
                    Err(err) => $crate::qb::keep_first_error(&mut self.build_error, err),
                }
                self
            }

            /// Add a WHERE expression (ANDed with the others).
            pub fn and_where(mut self, expr: $crate::qb::Expr) -> Self {
                self.where_group.and_expr(expr);
                self
            }

            /// Add a raw WHERE fragment.
            pub fn where_raw(mut self, sql: &str) -> Self {
                match $crate::qb::lit(sql) {
                    Ok(e) => self.where_group.and_expr(e),
                    Err(err) => $crate::qb::keep_first_error(&mut self.build_error, err),
                }
                self
            }

            /// Add WHERE: column = value
            pub fn eq(self, column: &str, value: impl Into<$crate::qb::Expr>) -> Self {
                self.where_col(column, |c| c.eq(value))
            }

            /// Add WHERE: column != value
            pub fn ne(self, column: &str, value: impl Into<$crate::qb::Expr>) -> Self {
                self.where_col(column, |c| c.ne(value))
            }

            /// Add WHERE: column > value
            pub fn gt(self, column: &str, value: impl Into<$crate::qb::Expr>) -> Self {
                self.where_col(column, |c| c.gt(value))
            }

            /// Add WHERE: column >= value
            pub fn gte(self, column: &str, value: impl Into<$crate::qb::Expr>) -> Self {
                self.where_col(column, |c| c.gte(value))
            }

            /// Add WHERE: column < value
            pub fn lt(self, column: &str, value: impl Into<$crate::qb::Expr>) -> Self {
                self.where_col(column, |c| c.lt(value))
            }

            /// Add WHERE: column <= value
            pub fn lte(self, column: &str, value: impl Into<$crate::qb::Expr>) -> Self {
                self.where_col(column, |c| c.lte(value))
            }

            /// Add WHERE: column LIKE pattern
            pub fn like(self, column: &str, pattern: impl Into<$crate::qb::Expr>) -> Self {
                self.where_col(column, |c| c.like(pattern))
            }

            /// Add WHERE: column ILIKE pattern
            pub fn ilike(self, column: &str, pattern: impl Into<$crate::qb::Expr>) -> Self {
                self.where_col(column, |c| c.ilike(pattern))
            }

            /// Add WHERE: column IS NULL
            pub fn is_null(self, column: &str) -> Self {
                self.where_col(column, |c| c.is_null())
            }

            /// Add WHERE: column IS NOT NULL
            pub fn is_not_null(self, column: &str) -> Self {
                self.where_col(column, |c| c.is_not_null())
            }

            /// Add WHERE: column IN (values...)
            pub fn in_list<T: Into<$crate::Value>>(
                self,
                column: &str,
                values: impl IntoIterator<Item = T>,
            ) -> Self {
                self.where_col(column, |c| c.in_list(values))
            }

            /// Add WHERE: column NOT IN (values...)
            pub fn not_in<T: Into<$crate::Value>>(
                self,
                column: &str,
                values: impl IntoIterator<Item = T>,
            ) -> Self {
                self.where_col(column, |c| c.not_in(values))
            }

            /// Add WHERE: column BETWEEN low AND high
            pub fn between(
                self,
                column: &str,
                low: impl Into<$crate::qb::Expr>,
                high: impl Into<$crate::qb::Expr>,
            ) -> Self {
                self.where_col(column, |c| c.between(low, high))
            }
        }
    };
}

pub(crate) use impl_where_methods;

mod delete;
pub(crate) mod expr;
mod insert;
mod param;
pub(crate) mod select;
pub(crate) mod statement;
mod traits;
pub(crate) mod update;

pub use delete::DeleteQb;
pub use expr::{
    BinaryOp, Expr, ExprGroup, NullsOrder, OrderExpr, SortDir, UnaryOp, Window, and, avg, coalesce,
    col, count, func, lit, max, min, not, or, param, star, sum, val,
};
pub use insert::{ConflictAction, InsertQb, OnConflict, OnConflictQb, OnConflictUpdateQb};
pub use param::ParamList;
pub use select::{Join, JoinKind, SelectQb};
pub use statement::Statement;
pub use traits::{BuiltQuery, SqlQb};
pub use update::{Assignment, UpdateQb};

/// Keep the first construction error; later ones are dropped.
pub(crate) fn keep_first_error(slot: &mut Option<SqlError>, err: SqlError) {
    if slot.is_none() {
        *slot = Some(err);
    }
}

/// Table reference: `table("public.users")`.
pub fn table(name: &str) -> crate::SqlResult<Expr> {
    col(name)
}

/// Create a SELECT builder for the given table.
///
/// # Example
/// ```
/// let qb = sqldialect::qb::select("users").eq("id", 1);
/// ```
pub fn select(table: &str) -> SelectQb {
    SelectQb::new(table)
}

/// Create a SELECT builder with a custom FROM item.
///
/// Use this for aliased tables or sub-selects.
///
/// # Example
/// ```
/// use sqldialect::qb;
///
/// let inner = qb::select("sub_table").gt("age", 10);
/// let outer = qb::select_from(inner.alias("temp_table")?);
/// # Ok::<(), sqldialect::SqlError>(())
/// ```
pub fn select_from(item: impl Into<Expr>) -> SelectQb {
    SelectQb::from_expr(item)
}

/// Create an INSERT builder for the given table.
pub fn insert(table: &str) -> InsertQb {
    InsertQb::new(table)
}

/// Alias for `insert`.
pub fn insert_into(table: &str) -> InsertQb {
    InsertQb::new(table)
}

/// Create an UPDATE builder for the given table.
pub fn update(table: &str) -> UpdateQb {
    UpdateQb::new(table)
}

/// Create a DELETE builder for the given table.
///
/// Without conditions, every row is deleted.
pub fn delete(table: &str) -> DeleteQb {
    DeleteQb::new(table)
}

/// Alias for `delete`.
pub fn delete_from(table: &str) -> DeleteQb {
    DeleteQb::new(table)
}

#[cfg(test)]
mod tests;
