//! SELECT statement builder.

use crate::dialect::{Capability, require};
use crate::error::{SqlError, SqlResult};
use crate::ident::Ident;
use crate::qb::expr::{Expr, ExprGroup, OrderExpr, col};
use crate::qb::keep_first_error;
use crate::qb::traits::SqlQb;
use crate::render::SqlWriter;

/// JOIN flavor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

impl JoinKind {
    pub fn as_sql(&self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
            JoinKind::Full => "FULL OUTER JOIN",
            JoinKind::Cross => "CROSS JOIN",
        }
    }
}

/// A JOIN clause. `on` is `None` only for CROSS JOIN.
#[derive(Clone, Debug, PartialEq)]
pub struct Join {
    pub kind: JoinKind,
    pub table: Expr,
    pub on: Option<Expr>,
}

/// SELECT statement builder.
///
/// Table and column names given as strings are parsed as identifiers; the
/// first parse failure is kept and returned from `build`.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectQb {
    /// FROM items (tables, aliased tables, sub-selects)
    from: Vec<Expr>,
    /// SELECT list; empty renders `*`
    columns: Vec<Expr>,
    /// `Some(empty)` is DISTINCT, `Some(exprs)` is DISTINCT ON
    distinct: Option<Vec<Expr>>,
    joins: Vec<Join>,
    where_group: ExprGroup,
    group_by: Vec<Expr>,
    having_group: ExprGroup,
    order_by: Vec<OrderExpr>,
    limit: Option<u64>,
    offset: Option<u64>,
    prepared: bool,
    build_error: Option<SqlError>,
}

impl SelectQb {
    /// Create an empty SELECT (no FROM).
    pub fn empty() -> Self {
        Self {
            from: Vec::new(),
            columns: Vec::new(),
            distinct: None,
            joins: Vec::new(),
            where_group: ExprGroup::new(),
            group_by: Vec::new(),
            having_group: ExprGroup::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
            prepared: false,
            build_error: None,
        }
    }

    /// Create a SELECT from a table.
    pub fn new(table: &str) -> Self {
        Self::empty().from(table)
    }

    /// Create a SELECT with a custom FROM item (aliased table, sub-select).
    pub fn from_expr(item: impl Into<Expr>) -> Self {
        let mut qb = Self::empty();
        qb.from.push(item.into());
        qb
    }

    fn record_error(&mut self, err: SqlError) {
        keep_first_error(&mut self.build_error, err);
    }

    fn parse_all(&mut self, names: &[&str]) -> Vec<Expr> {
        let mut out = Vec::with_capacity(names.len());
        for name in names {
            match col(name) {
                Ok(e) => out.push(e),
                Err(err) => self.record_error(err),
            }
        }
        out
    }

    // ==================== FROM ====================

    /// Replace the FROM list with a single table.
    pub fn from(mut self, table: &str) -> Self {
        match Ident::parse(table) {
            Ok(ident) => self.from = vec![Expr::Ident(ident)],
            Err(err) => self.record_error(err),
        }
        self
    }

    /// Append a FROM item.
    pub fn add_from(mut self, item: impl Into<Expr>) -> Self {
        self.from.push(item.into());
        self
    }

    // ==================== SELECT list ====================

    /// Set SELECT columns by name.
    pub fn select(mut self, cols: &[&str]) -> Self {
        self.columns = self.parse_all(cols);
        self
    }

    /// Set SELECT expressions.
    pub fn select_exprs(mut self, exprs: Vec<Expr>) -> Self {
        self.columns = exprs;
        self
    }

    /// Append one SELECT expression.
    pub fn add_select(mut self, expr: impl Into<Expr>) -> Self {
        self.columns.push(expr.into());
        self
    }

    /// `SELECT DISTINCT ...`
    pub fn distinct(mut self) -> Self {
        self.distinct = Some(Vec::new());
        self
    }

    /// `SELECT DISTINCT ON (...) ...`; fails at build time on dialects without it.
    pub fn distinct_on(mut self, exprs: Vec<Expr>) -> Self {
        self.distinct = Some(exprs);
        self
    }

    // ==================== JOIN ====================

    /// Add a JOIN clause.
    pub fn join(mut self, join: Join) -> Self {
        self.joins.push(join);
        self
    }

    fn join_named(mut self, kind: JoinKind, table: &str, on: Option<Expr>) -> Self {
        match Ident::parse(table) {
            Ok(ident) => self.joins.push(Join {
                kind,
                table: Expr::Ident(ident),
                on,
            }),
            Err(err) => self.record_error(err),
        }
        self
    }

    /// Add INNER JOIN.
    pub fn inner_join(self, table: &str, on: Expr) -> Self {
        self.join_named(JoinKind::Inner, table, Some(on))
    }

    /// Add LEFT JOIN.
    pub fn left_join(self, table: &str, on: Expr) -> Self {
        self.join_named(JoinKind::Left, table, Some(on))
    }

    /// Add RIGHT JOIN.
    pub fn right_join(self, table: &str, on: Expr) -> Self {
        self.join_named(JoinKind::Right, table, Some(on))
    }

    /// Add FULL OUTER JOIN.
    pub fn full_join(self, table: &str, on: Expr) -> Self {
        self.join_named(JoinKind::Full, table, Some(on))
    }

    /// Add CROSS JOIN.
    pub fn cross_join(self, table: &str) -> Self {
        self.join_named(JoinKind::Cross, table, None)
    }

    // ==================== GROUP BY / HAVING ====================

    /// Set GROUP BY columns.
    pub fn group_by(mut self, cols: &[&str]) -> Self {
        self.group_by = self.parse_all(cols);
        self
    }

    /// Append a GROUP BY expression.
    pub fn group_by_expr(mut self, expr: impl Into<Expr>) -> Self {
        self.group_by.push(expr.into());
        self
    }

    /// Add a HAVING condition (ANDed).
    pub fn having(mut self, expr: Expr) -> Self {
        self.having_group.and_expr(expr);
        self
    }

    // ==================== ORDER / LIMIT ====================

    /// Add an ORDER BY item.
    pub fn order_by(mut self, order: impl Into<OrderExpr>) -> Self {
        self.order_by.push(order.into());
        self
    }

    /// Add `column ASC`.
    pub fn order_by_asc(mut self, column: &str) -> Self {
        match col(column) {
            Ok(c) => self.order_by.push(c.asc()),
            Err(err) => self.record_error(err),
        }
        self
    }

    /// Add `column DESC`.
    pub fn order_by_desc(mut self, column: &str) -> Self {
        match col(column) {
            Ok(c) => self.order_by.push(c.desc()),
            Err(err) => self.record_error(err),
        }
        self
    }

    pub fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    pub fn offset(mut self, n: u64) -> Self {
        self.offset = Some(n);
        self
    }

    /// Bind every non-NULL value as a parameter instead of inlining it.
    pub fn prepared(mut self, prepared: bool) -> Self {
        self.prepared = prepared;
        self
    }

    /// Wrap as an aliased sub-select, e.g. for a FROM item.
    pub fn alias(self, alias: &str) -> SqlResult<Expr> {
        Expr::from(self).alias(alias)
    }
}

impl SqlQb for SelectQb {
    fn verb(&self) -> &'static str {
        "SELECT"
    }

    fn build_error(&self) -> Option<&SqlError> {
        self.build_error.as_ref()
    }

    fn is_prepared(&self) -> bool {
        self.prepared
    }

    fn write_sql(&self, w: &mut SqlWriter<'_>) -> SqlResult<()> {
        w.push("SELECT ");

        if let Some(on) = &self.distinct {
            if on.is_empty() {
                w.push("DISTINCT ");
            } else {
                require(w.dialect(), Capability::DistinctOn)?;
                w.push("DISTINCT ON (");
                w.push_expr_list(on)?;
                w.push(") ");
            }
        }

        if self.columns.is_empty() {
            w.push("*");
        } else {
            w.push_expr_list(&self.columns)?;
        }

        if !self.from.is_empty() {
            w.push(" FROM ");
            w.push_expr_list(&self.from)?;
        }

        w.push_joins(&self.joins)?;
        w.push_where(&self.where_group)?;
        w.push_group_by(&self.group_by)?;
        w.push_having(&self.having_group)?;
        w.push_order_by(&self.order_by)?;
        w.push_limit(self.limit)?;
        w.push_offset(self.offset)?;
        Ok(())
    }
}

crate::qb::impl_where_methods!(SelectQb);
