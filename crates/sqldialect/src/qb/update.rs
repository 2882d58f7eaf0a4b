//! UPDATE statement builder.

use crate::dialect::{Capability, require};
use crate::error::{SqlError, SqlResult};
use crate::ident::Ident;
use crate::qb::expr::{Expr, ExprGroup, OrderExpr, col};
use crate::qb::keep_first_error;
use crate::qb::traits::SqlQb;
use crate::record::Record;
use crate::render::SqlWriter;

/// `column = value` in a SET list.
#[derive(Clone, Debug, PartialEq)]
pub struct Assignment {
    pub column: Ident,
    pub value: Expr,
}

/// UPDATE statement builder.
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateQb {
    table: Option<Ident>,
    set: Vec<Assignment>,
    /// Extra tables (`UPDATE a SET ... FROM b`)
    from: Vec<Expr>,
    where_group: ExprGroup,
    order_by: Vec<OrderExpr>,
    limit: Option<u64>,
    returning: Vec<Expr>,
    prepared: bool,
    build_error: Option<SqlError>,
}

impl UpdateQb {
    /// Create a new UPDATE builder.
    pub fn new(table: &str) -> Self {
        let mut qb = Self {
            table: None,
            set: Vec::new(),
            from: Vec::new(),
            where_group: ExprGroup::new(),
            order_by: Vec::new(),
            limit: None,
            returning: Vec::new(),
            prepared: false,
            build_error: None,
        };
        match Ident::parse(table) {
            Ok(ident) => qb.table = Some(ident),
            Err(err) => qb.record_error(err),
        }
        qb
    }

    fn record_error(&mut self, err: SqlError) {
        keep_first_error(&mut self.build_error, err);
    }

    /// Set a column to a value or expression.
    pub fn set(mut self, column: &str, value: impl Into<Expr>) -> Self {
        match Ident::parse(column) {
            Ok(ident) => self.set.push(Assignment {
                column: ident,
                value: value.into(),
            }),
            Err(err) => self.record_error(err),
        }
        self
    }

    /// Set every column of `record`, in its key order.
    pub fn set_record(mut self, record: &Record) -> Self {
        for (k, v) in record.iter() {
            self = self.set(k, v.clone());
        }
        self
    }

    /// Add a FROM table (multi-table update).
    pub fn from(mut self, table: &str) -> Self {
        match col(table) {
            Ok(e) => self.from.push(e),
            Err(err) => self.record_error(err),
        }
        self
    }

    /// Add a FROM item (aliased table, sub-select).
    pub fn add_from(mut self, item: impl Into<Expr>) -> Self {
        self.from.push(item.into());
        self
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
                Err(err) => self.record_error(err),
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

impl SqlQb for UpdateQb {
    fn verb(&self) -> &'static str {
        "UPDATE"
    }

    fn build_error(&self) -> Option<&SqlError> {
        self.build_error.as_ref()
    }

    fn is_prepared(&self) -> bool {
        self.prepared
    }

    fn validate(&self) -> SqlResult<()> {
        if let Some(err) = &self.build_error {
            return Err(err.clone());
        }
        if self.set.is_empty() {
            return Err(SqlError::invalid("UpdateQb: SET clause cannot be empty"));
        }
        Ok(())
    }

    fn write_sql(&self, w: &mut SqlWriter<'_>) -> SqlResult<()> {
        let table = self
            .table
            .as_ref()
            .ok_or_else(|| SqlError::invalid("UpdateQb: missing table"))?;

        w.push("UPDATE ");
        w.push_ident(table)?;
        w.push(" SET ");
        w.push_assignments(&self.set)?;

        if !self.from.is_empty() {
            require(w.dialect(), Capability::MultipleUpdateTables)?;
            w.push(" FROM ");
            w.push_expr_list(&self.from)?;
        }

        w.push_where(&self.where_group)?;

        if !self.order_by.is_empty() {
            require(w.dialect(), Capability::OrderByOnUpdate)?;
            w.push_order_by(&self.order_by)?;
        }
        if self.limit.is_some() {
            require(w.dialect(), Capability::LimitOnUpdate)?;
            w.push_limit(self.limit)?;
        }

        w.push_returning(&self.returning)?;
        Ok(())
    }
}

crate::qb::impl_where_methods!(UpdateQb);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{Dialect, DialectOptions};

    fn plain() -> Dialect {
        Dialect::default_dialect()
    }

    #[test]
    fn simple_update() {
        let sql = UpdateQb::new("users")
            .set("status", "inactive")
            .eq("id", 1)
            .to_sql(&plain())
            .unwrap();
        assert_eq!(
            sql,
            r#"UPDATE "users" SET "status" = 'inactive' WHERE ("id" = 1)"#
        );
    }

    #[test]
    fn update_with_expression() {
        let sql = UpdateQb::new("counters")
            .set("n", col("n").unwrap().add(1))
            .to_sql(&plain())
            .unwrap();
        assert_eq!(sql, r#"UPDATE "counters" SET "n" = ("n" + 1)"#);
    }

    #[test]
    fn empty_set_is_invalid() {
        let err = UpdateQb::new("users").eq("id", 1).build(&plain()).unwrap_err();
        assert!(err.is_invalid_expression());
    }

    #[test]
    fn update_from_is_guarded() {
        let d = Dialect::new(
            "single",
            DialectOptions::default().supports_multiple_update_tables(false),
        );
        let qb = UpdateQb::new("a")
            .set("x", col("b.x").unwrap())
            .from("b")
            .and_where(col("a.id").unwrap().eq(col("b.id").unwrap()));

        assert_eq!(
            qb.to_sql(&plain()).unwrap(),
            r#"UPDATE "a" SET "x" = "b"."x" FROM "b" WHERE ("a"."id" = "b"."id")"#
        );
        let err = qb.build(&d).unwrap_err();
        assert_eq!(
            err,
            SqlError::unsupported(Capability::MultipleUpdateTables, "single")
        );
    }

    #[test]
    fn order_and_limit_on_update() {
        let qb = UpdateQb::new("jobs")
            .set("claimed", true)
            .order_by(col("id").unwrap().asc())
            .limit(5);
        assert_eq!(
            qb.to_sql(&plain()).unwrap(),
            r#"UPDATE "jobs" SET "claimed" = TRUE ORDER BY "id" ASC LIMIT 5"#
        );

        let err = qb.build(&Dialect::postgres()).unwrap_err();
        assert_eq!(
            err,
            SqlError::unsupported(Capability::OrderByOnUpdate, "postgres")
        );
    }

    #[test]
    fn set_record_keeps_key_order() {
        let record = Record::new().set("b", 2).set("a", 1);
        let sql = UpdateQb::new("t")
            .set_record(&record)
            .to_sql(&plain())
            .unwrap();
        assert_eq!(sql, r#"UPDATE "t" SET "b" = 2, "a" = 1"#);
    }
}
