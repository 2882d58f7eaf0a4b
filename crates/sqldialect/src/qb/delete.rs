//! DELETE statement builder.

use crate::dialect::{Capability, require};
use crate::error::{SqlError, SqlResult};
use crate::ident::Ident;
use crate::qb::expr::{Expr, ExprGroup, OrderExpr, col};
use crate::qb::keep_first_error;
use crate::qb::traits::SqlQb;
use crate::render::SqlWriter;

/// DELETE statement builder.
///
/// Without WHERE conditions the statement deletes every row.
#[derive(Clone, Debug, PartialEq)]
pub struct DeleteQb {
    table: Option<Ident>,
    where_group: ExprGroup,
    order_by: Vec<OrderExpr>,
    limit: Option<u64>,
    returning: Vec<Expr>,
    prepared: bool,
    build_error: Option<SqlError>,
}

impl DeleteQb {
    /// Create a new DELETE builder.
    pub fn new(table: &str) -> Self {
        let mut qb = Self {
            table: None,
            where_group: ExprGroup::new(),
            order_by: Vec::new(),
            limit: None,
            returning: Vec::new(),
            prepared: false,
            build_error: None,
        };
        match Ident::parse(table) {
            Ok(ident) => qb.table = Some(ident),
            Err(err) => keep_first_error(&mut qb.build_error, err),
        }
        qb
    }

    /// Add an ORDER BY item.
    pub fn order_by(mut self, order: impl Into<OrderExpr>) -> Self {
        self.order_by.push(order.into());
        self
    }

    pub fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    /// Set RETURNING columns.
    pub fn returning(mut self, cols: &[&str]) -> Self {
        for c in cols {
            match col(c) {
                Ok(e) => self.returning.push(e),
                Err(err) => keep_first_error(&mut self.build_error, err),
            }
        }
        self
    }

    /// Append a RETURNING expression.
    pub fn returning_expr(mut self, expr: impl Into<Expr>) -> Self {
        self.returning.push(expr.into());
        self
    }

    /// Bind every non-NULL value as a parameter instead of inlining it.
    pub fn prepared(mut self, prepared: bool) -> Self {
        self.prepared = prepared;
        self
    }
}

impl SqlQb for DeleteQb {
    fn verb(&self) -> &'static str {
        "DELETE"
    }

    fn build_error(&self) -> Option<&SqlError> {
        self.build_error.as_ref()
    }

    fn is_prepared(&self) -> bool {
        self.prepared
    }

    fn write_sql(&self, w: &mut SqlWriter<'_>) -> SqlResult<()> {
        let table = self
            .table
            .as_ref()
            .ok_or_else(|| SqlError::invalid("DeleteQb: missing table"))?;

        w.push("DELETE FROM ");
        w.push_ident(table)?;
        w.push_where(&self.where_group)?;

        if !self.order_by.is_empty() {
            require(w.dialect(), Capability::OrderByOnDelete)?;
            w.push_order_by(&self.order_by)?;
        }
        if self.limit.is_some() {
            require(w.dialect(), Capability::LimitOnDelete)?;
            w.push_limit(self.limit)?;
        }

        w.push_returning(&self.returning)?;
        Ok(())
    }
}

crate::qb::impl_where_methods!(DeleteQb);
