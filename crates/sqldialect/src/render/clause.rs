//! Expression and clause rendering.

use crate::dialect::{Capability, require};
use crate::error::{SqlError, SqlResult};
use crate::qb::expr::{
    BinaryOp, Expr, ExprGroup, NullsOrder, OrderExpr, SortDir, UnaryOp, check_func_name,
};
use crate::qb::select::Join;
use crate::qb::update::Assignment;
use crate::qb::SqlQb;
use crate::render::SqlWriter;
use crate::value::Value;

impl SqlWriter<'_> {
    /// Render an expression node.
    pub fn push_expr(&mut self, expr: &Expr) -> SqlResult<()> {
        match expr {
            Expr::Ident(ident) => self.push_ident(ident)?,
            Expr::Value(v) => self.push_value(v)?,
            Expr::Placeholder(Value::List(items)) => self.push_bind_list(items)?,
            Expr::Placeholder(v) => {
                self.push_bind(v.clone());
            }
            Expr::Binary { left, op, right } => self.push_binary(left, *op, right)?,
            Expr::Unary { op, expr } => {
                self.push(match op {
                    UnaryOp::Not => "NOT ",
                    UnaryOp::Neg => "-",
                });
                self.push_operand(expr)?;
            }
            Expr::Between {
                expr,
                low,
                high,
                negated,
            } => {
                self.push_char('(');
                self.push_expr(expr)?;
                self.push(if *negated {
                    " NOT BETWEEN "
                } else {
                    " BETWEEN "
                });
                self.push_expr(low)?;
                self.push(" AND ");
                self.push_expr(high)?;
                self.push_char(')');
            }
            // Only WHERE / HAVING may drop an empty group; anywhere else it
            // would leave a hole in the statement.
            Expr::And(_) | Expr::Or(_) if expr.is_empty() => {
                return Err(SqlError::invalid(
                    "Empty AND/OR group cannot be used as an operand",
                ));
            }
            Expr::And(exprs) => self.push_bool_list(exprs, " AND ")?,
            Expr::Or(exprs) => self.push_bool_list(exprs, " OR ")?,
            Expr::Func { name, args } => {
                check_func_name(name)?;
                self.push(name);
                self.push_char('(');
                self.push_expr_list(args)?;
                self.push_char(')');
            }
            Expr::Paren(inner) => {
                self.push_char('(');
                self.push_expr(inner)?;
                self.push_char(')');
            }
            Expr::Aliased { expr, alias } => {
                self.push_expr(expr)?;
                self.push(" AS ");
                self.push_ident(alias)?;
            }
            Expr::Literal { sql, args } => self.push_literal_sql(sql, args)?,
            Expr::SubSelect(select) => {
                select.validate()?;
                self.push_char('(');
                select.write_sql(self)?;
                self.push_char(')');
            }
            Expr::Window { func, window } => {
                require(self.dialect(), Capability::WindowFunction)?;
                self.push_expr(func)?;
                self.push(" OVER (");
                if !window.partition_by.is_empty() {
                    self.push("PARTITION BY ");
                    self.push_expr_list(&window.partition_by)?;
                }
                if !window.order_by.is_empty() {
                    if !window.partition_by.is_empty() {
                        self.push_char(' ');
                    }
                    self.push("ORDER BY ");
                    self.push_order_list(&window.order_by)?;
                }
                self.push_char(')');
            }
        }
        Ok(())
    }

    fn push_binary(&mut self, left: &Expr, op: BinaryOp, right: &Expr) -> SqlResult<()> {
        if matches!(op, BinaryOp::In | BinaryOp::NotIn) {
            if let Expr::Value(Value::List(items)) | Expr::Placeholder(Value::List(items)) = right {
                // `x IN ()` is not valid SQL; an empty list matches nothing.
                if items.is_empty() {
                    self.push(if op == BinaryOp::In {
                        "(1 = 0)"
                    } else {
                        "(1 = 1)"
                    });
                    return Ok(());
                }
            }
        }

        self.push_char('(');
        self.push_expr(left)?;
        self.push_char(' ');
        self.push(op.as_sql());
        self.push_char(' ');
        match (op, right) {
            // IS takes keywords, never a bound parameter.
            (BinaryOp::Is | BinaryOp::IsNot, Expr::Value(v)) => self.push_literal(v)?,
            _ => self.push_expr(right)?,
        }
        self.push_char(')');
        Ok(())
    }

    /// Render `expr`, wrapping it in parentheses unless it wraps itself.
    pub fn push_operand(&mut self, expr: &Expr) -> SqlResult<()> {
        if expr.is_self_parenthesized() {
            return self.push_expr(expr);
        }
        self.push_char('(');
        self.push_expr(expr)?;
        self.push_char(')');
        Ok(())
    }

    fn push_bool_list(&mut self, exprs: &[Expr], sep: &str) -> SqlResult<()> {
        let live: Vec<&Expr> = exprs.iter().filter(|e| !e.is_empty()).collect();
        match live.as_slice() {
            [] => Ok(()),
            [only] => self.push_expr(only),
            _ => {
                self.push_char('(');
                for (i, e) in live.iter().enumerate() {
                    if i > 0 {
                        self.push(sep);
                    }
                    self.push_operand(e)?;
                }
                self.push_char(')');
                Ok(())
            }
        }
    }

    fn push_literal_sql(&mut self, sql: &str, args: &[Expr]) -> SqlResult<()> {
        let mut args = args.iter();
        let mut pieces = sql.split('?');
        if let Some(first) = pieces.next() {
            self.push(first);
        }
        for piece in pieces {
            let arg = args.next().ok_or_else(|| {
                SqlError::invalid(format!("Literal '{sql}' has more placeholders than arguments"))
            })?;
            self.push_expr(arg)?;
            self.push(piece);
        }
        if args.next().is_some() {
            return Err(SqlError::invalid(format!(
                "Literal '{sql}' has more arguments than placeholders"
            )));
        }
        Ok(())
    }

    /// Comma-separated expressions.
    pub fn push_expr_list(&mut self, exprs: &[Expr]) -> SqlResult<()> {
        for (i, e) in exprs.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.push_expr(e)?;
        }
        Ok(())
    }

    pub fn push_order(&mut self, order: &OrderExpr) -> SqlResult<()> {
        self.push_expr(&order.expr)?;
        match order.dir {
            Some(SortDir::Asc) => {
                self.push(" ASC");
            }
            Some(SortDir::Desc) => {
                self.push(" DESC");
            }
            None => {}
        }
        match order.nulls {
            Some(NullsOrder::First) => {
                self.push(" NULLS FIRST");
            }
            Some(NullsOrder::Last) => {
                self.push(" NULLS LAST");
            }
            None => {}
        }
        Ok(())
    }

    fn push_order_list(&mut self, orders: &[OrderExpr]) -> SqlResult<()> {
        for (i, o) in orders.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.push_order(o)?;
        }
        Ok(())
    }

    // ==================== Clauses ====================

    /// ` WHERE ...`, omitted when the group is empty.
    pub fn push_where(&mut self, group: &ExprGroup) -> SqlResult<()> {
        self.push_condition_clause(" WHERE ", group)
    }

    /// ` HAVING ...`, omitted when the group is empty.
    pub fn push_having(&mut self, group: &ExprGroup) -> SqlResult<()> {
        self.push_condition_clause(" HAVING ", group)
    }

    fn push_condition_clause(&mut self, keyword: &str, group: &ExprGroup) -> SqlResult<()> {
        if group.is_empty() {
            return Ok(());
        }
        self.push(keyword);
        self.push_bool_list(group.exprs(), " AND ")
    }

    pub fn push_joins(&mut self, joins: &[Join]) -> SqlResult<()> {
        for join in joins {
            self.push_char(' ');
            self.push(join.kind.as_sql());
            self.push_char(' ');
            self.push_expr(&join.table)?;
            if let Some(on) = &join.on {
                self.push(" ON ");
                self.push_expr(on)?;
            }
        }
        Ok(())
    }

    pub fn push_group_by(&mut self, exprs: &[Expr]) -> SqlResult<()> {
        if exprs.is_empty() {
            return Ok(());
        }
        self.push(" GROUP BY ");
        self.push_expr_list(exprs)
    }

    pub fn push_order_by(&mut self, orders: &[OrderExpr]) -> SqlResult<()> {
        if orders.is_empty() {
            return Ok(());
        }
        self.push(" ORDER BY ");
        self.push_order_list(orders)
    }

    pub fn push_limit(&mut self, limit: Option<u64>) -> SqlResult<()> {
        if let Some(n) = limit {
            self.push(" LIMIT ");
            self.push_value(&Value::UInt(n))?;
        }
        Ok(())
    }

    pub fn push_offset(&mut self, offset: Option<u64>) -> SqlResult<()> {
        if let Some(n) = offset {
            self.push(" OFFSET ");
            self.push_value(&Value::UInt(n))?;
        }
        Ok(())
    }

    /// `a = 1, b = 2`
    pub fn push_assignments(&mut self, set: &[Assignment]) -> SqlResult<()> {
        for (i, a) in set.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.push_ident(&a.column)?;
            self.push(" = ");
            self.push_expr(&a.value)?;
        }
        Ok(())
    }

    /// ` RETURNING ...`, guarded.
    pub fn push_returning(&mut self, exprs: &[Expr]) -> SqlResult<()> {
        if exprs.is_empty() {
            return Ok(());
        }
        require(self.dialect(), Capability::Returning)?;
        self.push(" RETURNING ");
        self.push_expr_list(exprs)
    }
}
