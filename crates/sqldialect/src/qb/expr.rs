//! Expression layer for select lists, WHERE/HAVING, JOIN conditions and values.
//!
//! This module provides the `Expr` enum which supports:
//! - identifiers and typed literal values
//! - comparisons, arithmetic and NOT
//! - AND/OR groups
//! - function calls (aggregates are ordinary calls), window functions
//! - aliases, sub-selects and raw SQL fragments with `?` placeholders
//!
//! Constructors check shape only (identifier syntax, placeholder arity, function
//! names) and fail with `InvalidExpression`; nothing here looks at a dialect.
//! Rendering lives in [`crate::render`].

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{SqlError, SqlResult};
use crate::ident::Ident;
use crate::qb::select::SelectQb;
use crate::value::Value;

/// Binary operators: comparisons first, then arithmetic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Eq,
    NotEq,
    Gt,
    Gte,
    Lt,
    Lte,
    Like,
    NotLike,
    ILike,
    NotILike,
    In,
    NotIn,
    Is,
    IsNot,
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    pub fn as_sql(&self) -> &'static str {
        match self {
            BinaryOp::Eq => "=",
            BinaryOp::NotEq => "!=",
            BinaryOp::Gt => ">",
            BinaryOp::Gte => ">=",
            BinaryOp::Lt => "<",
            BinaryOp::Lte => "<=",
            BinaryOp::Like => "LIKE",
            BinaryOp::NotLike => "NOT LIKE",
            BinaryOp::ILike => "ILIKE",
            BinaryOp::NotILike => "NOT ILIKE",
            BinaryOp::In => "IN",
            BinaryOp::NotIn => "NOT IN",
            BinaryOp::Is => "IS",
            BinaryOp::IsNot => "IS NOT",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
        }
    }
}

/// Unary operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    /// `NOT (x)`
    Not,
    /// `-(x)`
    Neg,
}

/// Sort direction for ORDER BY.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDir {
    Asc,
    Desc,
}

/// NULLS FIRST / NULLS LAST.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NullsOrder {
    First,
    Last,
}

/// An ORDER BY item.
#[derive(Clone, Debug, PartialEq)]
pub struct OrderExpr {
    pub expr: Expr,
    pub dir: Option<SortDir>,
    pub nulls: Option<NullsOrder>,
}

impl OrderExpr {
    pub fn nulls_first(mut self) -> Self {
        self.nulls = Some(NullsOrder::First);
        self
    }

    pub fn nulls_last(mut self) -> Self {
        self.nulls = Some(NullsOrder::Last);
        self
    }
}

impl From<Expr> for OrderExpr {
    fn from(expr: Expr) -> Self {
        Self {
            expr,
            dir: None,
            nulls: None,
        }
    }
}

/// An `OVER (...)` window specification.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Window {
    pub partition_by: Vec<Expr>,
    pub order_by: Vec<OrderExpr>,
}

impl Window {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn partition_by(mut self, expr: impl Into<Expr>) -> Self {
        self.partition_by.push(expr.into());
        self
    }

    pub fn order_by(mut self, order: impl Into<OrderExpr>) -> Self {
        self.order_by.push(order.into());
        self
    }
}

/// Expression node.
///
/// The tree is plain data; build it once and render it any number of times.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Column/table reference, quoted per part.
    Ident(Ident),

    /// Literal value, inlined (or bound when the statement is prepared).
    Value(Value),

    /// Always bound: writes a placeholder and pushes the value.
    Placeholder(Value),

    /// `(left op right)`
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },

    /// NOT / negation.
    Unary { op: UnaryOp, expr: Box<Expr> },

    /// `(expr [NOT] BETWEEN low AND high)`
    Between {
        expr: Box<Expr>,
        low: Box<Expr>,
        high: Box<Expr>,
        negated: bool,
    },

    /// AND group: all conditions must be true.
    And(Vec<Expr>),

    /// OR group: at least one condition must be true.
    Or(Vec<Expr>),

    /// `NAME(arg, ...)`
    Func { name: String, args: Vec<Expr> },

    /// Explicit parentheses.
    Paren(Box<Expr>),

    /// `expr AS alias`
    Aliased { expr: Box<Expr>, alias: Ident },

    /// Raw SQL with `?` markers replaced left-to-right by `args`.
    Literal { sql: String, args: Vec<Expr> },

    /// `(SELECT ...)`
    SubSelect(Box<SelectQb>),

    /// `func OVER (...)`
    Window { func: Box<Expr>, window: Window },
}

/// Column (or any identifier) reference: `col("t.a")`.
pub fn col(name: &str) -> SqlResult<Expr> {
    Ok(Expr::Ident(Ident::parse(name)?))
}

/// `*`
pub fn star() -> Expr {
    Expr::Ident(Ident::star())
}

/// Inline literal value.
pub fn val(v: impl Into<Value>) -> Expr {
    Expr::Value(v.into())
}

/// Bound parameter.
pub fn param(v: impl Into<Value>) -> Expr {
    Expr::Placeholder(v.into())
}

/// Raw SQL fragment without arguments.
pub fn lit(sql: &str) -> SqlResult<Expr> {
    Expr::literal(sql, Vec::new())
}

/// Generic function call: `func("LOWER", vec![col("name")?])`.
pub fn func(name: &str, args: Vec<Expr>) -> SqlResult<Expr> {
    check_func_name(name)?;
    Ok(Expr::Func {
        name: name.to_string(),
        args,
    })
}

/// Function names are written verbatim, so they must match `[A-Za-z_][A-Za-z0-9_.]*`.
pub(crate) fn check_func_name(name: &str) -> SqlResult<()> {
    let valid = name
        .chars()
        .next()
        .is_some_and(|c| c == '_' || c.is_ascii_alphabetic())
        && name
            .chars()
            .all(|c| c == '_' || c == '.' || c.is_ascii_alphanumeric());
    if !valid {
        return Err(SqlError::invalid(format!(
            "Invalid function name '{name}' (expected [A-Za-z_][A-Za-z0-9_.]*)"
        )));
    }
    Ok(())
}

fn known_func(name: &'static str, args: Vec<Expr>) -> Expr {
    Expr::Func {
        name: name.to_string(),
        args,
    }
}

pub fn count(arg: impl Into<Expr>) -> Expr {
    known_func("COUNT", vec![arg.into()])
}

pub fn max(arg: impl Into<Expr>) -> Expr {
    known_func("MAX", vec![arg.into()])
}

pub fn min(arg: impl Into<Expr>) -> Expr {
    known_func("MIN", vec![arg.into()])
}

pub fn avg(arg: impl Into<Expr>) -> Expr {
    known_func("AVG", vec![arg.into()])
}

pub fn sum(arg: impl Into<Expr>) -> Expr {
    known_func("SUM", vec![arg.into()])
}

pub fn coalesce(args: Vec<Expr>) -> Expr {
    known_func("COALESCE", args)
}

/// Create an AND expression from a list of expressions.
pub fn and(exprs: Vec<Expr>) -> Expr {
    Expr::And(exprs)
}

/// Create an OR expression from a list of expressions.
pub fn or(exprs: Vec<Expr>) -> Expr {
    Expr::Or(exprs)
}

/// Create a NOT expression.
pub fn not(expr: impl Into<Expr>) -> Expr {
    Expr::Unary {
        op: UnaryOp::Not,
        expr: Box::new(expr.into()),
    }
}

impl Expr {
    /// Raw SQL fragment with `?` placeholders.
    ///
    /// The number of `?` markers must match `args.len()`.
    ///
    /// # Example
    /// ```
    /// use sqldialect::qb::{Expr, col, val};
    ///
    /// let e = Expr::literal("COALESCE(?, ?)", vec![col("a")?, val("empty")])?;
    /// # Ok::<(), sqldialect::SqlError>(())
    /// ```
    pub fn literal(sql: &str, args: Vec<Expr>) -> SqlResult<Self> {
        let markers = sql.matches('?').count();
        if markers != args.len() {
            return Err(SqlError::invalid(format!(
                "Literal '{sql}' has {markers} placeholder(s) but {} argument(s)",
                args.len()
            )));
        }
        Ok(Expr::Literal {
            sql: sql.to_string(),
            args,
        })
    }

    fn binary(self, op: BinaryOp, right: impl Into<Expr>) -> Self {
        Expr::Binary {
            left: Box::new(self),
            op,
            right: Box::new(right.into()),
        }
    }

    /// `self = rhs`
    pub fn eq(self, rhs: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::Eq, rhs)
    }

    /// `self != rhs`
    pub fn ne(self, rhs: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::NotEq, rhs)
    }

    /// `self > rhs`
    pub fn gt(self, rhs: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::Gt, rhs)
    }

    /// `self >= rhs`
    pub fn gte(self, rhs: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::Gte, rhs)
    }

    /// `self < rhs`
    pub fn lt(self, rhs: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::Lt, rhs)
    }

    /// `self <= rhs`
    pub fn lte(self, rhs: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::Lte, rhs)
    }

    pub fn like(self, pattern: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::Like, pattern)
    }

    pub fn not_like(self, pattern: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::NotLike, pattern)
    }

    pub fn ilike(self, pattern: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::ILike, pattern)
    }

    pub fn not_ilike(self, pattern: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::NotILike, pattern)
    }

    pub fn is_null(self) -> Self {
        self.binary(BinaryOp::Is, Value::Null)
    }

    pub fn is_not_null(self) -> Self {
        self.binary(BinaryOp::IsNot, Value::Null)
    }

    pub fn is_true(self) -> Self {
        self.binary(BinaryOp::Is, true)
    }

    pub fn is_false(self) -> Self {
        self.binary(BinaryOp::Is, false)
    }

    /// `self IN (v1, v2, ...)`, each value rendered individually.
    pub fn in_list<T: Into<Value>>(self, values: impl IntoIterator<Item = T>) -> Self {
        self.binary(BinaryOp::In, Value::list(values))
    }

    /// `self NOT IN (v1, v2, ...)`
    pub fn not_in<T: Into<Value>>(self, values: impl IntoIterator<Item = T>) -> Self {
        self.binary(BinaryOp::NotIn, Value::list(values))
    }

    /// `self IN (SELECT ...)`
    pub fn in_subquery(self, select: SelectQb) -> Self {
        self.binary(BinaryOp::In, select)
    }

    /// `self NOT IN (SELECT ...)`
    pub fn not_in_subquery(self, select: SelectQb) -> Self {
        self.binary(BinaryOp::NotIn, select)
    }

    pub fn between(self, low: impl Into<Expr>, high: impl Into<Expr>) -> Self {
        Expr::Between {
            expr: Box::new(self),
            low: Box::new(low.into()),
            high: Box::new(high.into()),
            negated: false,
        }
    }

    pub fn not_between(self, low: impl Into<Expr>, high: impl Into<Expr>) -> Self {
        Expr::Between {
            expr: Box::new(self),
            low: Box::new(low.into()),
            high: Box::new(high.into()),
            negated: true,
        }
    }

    pub fn add(self, rhs: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::Add, rhs)
    }

    pub fn sub(self, rhs: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::Sub, rhs)
    }

    pub fn mul(self, rhs: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::Mul, rhs)
    }

    pub fn div(self, rhs: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::Div, rhs)
    }

    /// `-(self)`
    pub fn neg(self) -> Self {
        Expr::Unary {
            op: UnaryOp::Neg,
            expr: Box::new(self),
        }
    }

    /// Wrap in explicit parentheses.
    pub fn paren(self) -> Self {
        Expr::Paren(Box::new(self))
    }

    /// `self AS alias`
    pub fn alias(self, alias: &str) -> SqlResult<Self> {
        Ok(Expr::Aliased {
            expr: Box::new(self),
            alias: Ident::parse(alias)?,
        })
    }

    /// `self OVER (window)`
    pub fn over(self, window: Window) -> Self {
        Expr::Window {
            func: Box::new(self),
            window,
        }
    }

    pub fn asc(self) -> OrderExpr {
        OrderExpr {
            expr: self,
            dir: Some(SortDir::Asc),
            nulls: None,
        }
    }

    pub fn desc(self) -> OrderExpr {
        OrderExpr {
            expr: self,
            dir: Some(SortDir::Desc),
            nulls: None,
        }
    }

    /// Check if this expression is empty (contains no conditions).
    pub fn is_empty(&self) -> bool {
        match self {
            Expr::And(exprs) | Expr::Or(exprs) => exprs.iter().all(|e| e.is_empty()),
            _ => false,
        }
    }

    /// Whether rendering already wraps this node in parentheses.
    ///
    /// Boolean lists wrap every operand that is not.
    pub(crate) fn is_self_parenthesized(&self) -> bool {
        match self {
            Expr::Binary { .. } | Expr::Between { .. } | Expr::Paren(_) | Expr::SubSelect(_) => {
                true
            }
            Expr::And(exprs) | Expr::Or(exprs) => {
                let mut live = exprs.iter().filter(|e| !e.is_empty());
                match (live.next(), live.next()) {
                    (None, _) => false,
                    (Some(only), None) => only.is_self_parenthesized(),
                    _ => true,
                }
            }
            _ => false,
        }
    }
}

impl From<Ident> for Expr {
    fn from(ident: Ident) -> Self {
        Expr::Ident(ident)
    }
}

impl From<Value> for Expr {
    fn from(v: Value) -> Self {
        Expr::Value(v)
    }
}

impl From<SelectQb> for Expr {
    fn from(select: SelectQb) -> Self {
        Expr::SubSelect(Box::new(select))
    }
}

impl<T: Into<Value>> From<Option<T>> for Expr {
    fn from(v: Option<T>) -> Self {
        Expr::Value(v.into())
    }
}

macro_rules! expr_from_value {
    ($($t:ty),*) => {
        $(impl From<$t> for Expr {
            fn from(v: $t) -> Self {
                Expr::Value(v.into())
            }
        })*
    };
}

expr_from_value!(
    bool,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    u64,
    f32,
    f64,
    &str,
    String,
    &String,
    &[u8],
    Vec<u8>,
    DateTime<Utc>,
    Uuid,
    serde_json::Value,
    Vec<Value>,
    Vec<i32>,
    Vec<i64>,
    Vec<&str>,
    Vec<String>
);

/// A builder for constructing WHERE/HAVING clauses incrementally.
///
/// Expressions are ANDed together.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExprGroup {
    exprs: Vec<Expr>,
}

impl ExprGroup {
    /// Create a new empty expression group.
    pub fn new() -> Self {
        Self { exprs: Vec::new() }
    }

    /// Check if the group renders nothing.
    pub fn is_empty(&self) -> bool {
        self.exprs.iter().all(|e| e.is_empty())
    }

    /// Add an expression to be ANDed.
    pub fn and_expr(&mut self, expr: Expr) {
        self.exprs.push(expr);
    }

    /// Get all expressions.
    pub fn exprs(&self) -> &[Expr] {
        &self.exprs
    }

    /// The group as a single AND expression.
    pub fn to_expr(&self) -> Expr {
        Expr::And(self.exprs.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_checks_arity() {
        assert!(Expr::literal("a + b", vec![]).is_ok());
        let err = Expr::literal("COALESCE(?, ?)", vec![val(1)]).unwrap_err();
        assert!(err.is_invalid_expression());
    }

    #[test]
    fn func_checks_name() {
        assert!(func("LOWER", vec![]).is_ok());
        assert!(func("pg_catalog.lower", vec![]).is_ok());
        assert!(func("", vec![]).is_err());
        assert!(func("DROP TABLE x; --", vec![]).is_err());
    }

    #[test]
    fn alias_is_parsed() {
        assert!(star().alias("ok_name").is_ok());
        assert!(star().alias("bad name").is_err());
    }

    #[test]
    fn col_rejects_bad_identifier() {
        assert!(col("a b").is_err());
        assert!(col("t.a").is_ok());
    }

    #[test]
    fn empty_groups_are_empty() {
        assert!(and(vec![]).is_empty());
        assert!(and(vec![or(vec![])]).is_empty());
        assert!(!and(vec![val(true)]).is_empty());
    }

    #[test]
    fn self_parenthesized_nodes() {
        let cmp = col("a").unwrap().eq(1);
        assert!(cmp.is_self_parenthesized());
        assert!(!col("a").unwrap().is_self_parenthesized());
        assert!(and(vec![cmp.clone()]).is_self_parenthesized());
        assert!(!and(vec![col("flag").unwrap()]).is_self_parenthesized());
        assert!(and(vec![cmp.clone(), cmp]).is_self_parenthesized());
        assert!(!and(vec![]).is_self_parenthesized());
    }

    #[test]
    fn expr_group_collects() {
        let mut group = ExprGroup::new();
        assert!(group.is_empty());
        group.and_expr(col("a").unwrap().eq(1));
        assert_eq!(group.exprs().len(), 1);
        assert!(matches!(group.to_expr(), Expr::And(v) if v.len() == 1));
    }
}
