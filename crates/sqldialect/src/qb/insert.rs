//! INSERT statement builder.

use crate::dialect::{Capability, require};
use crate::error::{SqlError, SqlResult};
use crate::ident::Ident;
use crate::qb::expr::{Expr, ExprGroup, col};
use crate::qb::keep_first_error;
use crate::qb::select::SelectQb;
use crate::qb::traits::SqlQb;
use crate::qb::update::Assignment;
use crate::record::{InsertRow, Record};
use crate::render::SqlWriter;
use crate::value::Value;

/// Conflict resolution action.
#[derive(Clone, Debug, PartialEq)]
pub enum ConflictAction {
    /// DO NOTHING
    DoNothing,
    /// DO UPDATE SET ... [WHERE ...]
    DoUpdate {
        set: Vec<Assignment>,
        where_group: ExprGroup,
    },
}

/// `ON CONFLICT [(target)] action`
#[derive(Clone, Debug, PartialEq)]
pub struct OnConflict {
    pub target: Vec<Ident>,
    pub action: ConflictAction,
}

/// One row as given by the caller, normalized at build time.
#[derive(Clone, Debug, PartialEq)]
enum InsertValues {
    Exprs(Vec<Expr>),
    Record(Record),
}

/// INSERT statement builder.
///
/// Rows are given positionally ([`InsertQb::values`]), keyed
/// ([`InsertQb::record`]) or typed ([`InsertQb::row`]). At build time every
/// row is normalized to one column list:
///
/// - with explicit columns, a record's missing keys become NULL and unknown
///   keys are an error;
/// - otherwise the first record fixes the columns and every other record must
///   carry exactly the same keys;
/// - positional rows must have one value per column.
///
/// Violations fail with `InconsistentRowShape`.
#[derive(Clone, Debug, PartialEq)]
pub struct InsertQb {
    table: Option<Ident>,
    columns: Vec<Ident>,
    rows: Vec<InsertValues>,
    select: Option<Box<SelectQb>>,
    on_conflict: Option<OnConflict>,
    returning: Vec<Expr>,
    prepared: bool,
    build_error: Option<SqlError>,
}

impl InsertQb {
    /// Create a new INSERT builder.
    pub fn new(table: &str) -> Self {
        let mut qb = Self {
            table: None,
            columns: Vec::new(),
            rows: Vec::new(),
            select: None,
            on_conflict: None,
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

    /// Declare the column list.
    pub fn columns(mut self, cols: &[&str]) -> Self {
        self.columns.clear();
        for c in cols {
            match Ident::parse(c) {
                Ok(ident) => self.columns.push(ident),
                Err(err) => self.record_error(err),
            }
        }
        self
    }

    /// Add a positional row.
    pub fn values(mut self, row: Vec<Expr>) -> Self {
        self.rows.push(InsertValues::Exprs(row));
        self
    }

    /// Add several positional rows.
    pub fn rows(mut self, rows: impl IntoIterator<Item = Vec<Expr>>) -> Self {
        self.rows.extend(rows.into_iter().map(InsertValues::Exprs));
        self
    }

    /// Add a keyed row.
    pub fn record(mut self, record: Record) -> Self {
        self.rows.push(InsertValues::Record(record));
        self
    }

    /// Add several keyed rows.
    pub fn records(mut self, records: impl IntoIterator<Item = Record>) -> Self {
        self.rows
            .extend(records.into_iter().map(InsertValues::Record));
        self
    }

    /// Set a column on the last keyed row, starting one if needed.
    pub fn set(mut self, column: &str, value: impl Into<Value>) -> Self {
        match self.rows.last_mut() {
            Some(InsertValues::Record(r)) => r.insert(column, value),
            _ => self
                .rows
                .push(InsertValues::Record(Record::new().set(column, value))),
        }
        self
    }

    /// Add a typed row. Its columns become the column list if none was declared.
    pub fn row<R: InsertRow>(mut self, row: &R) -> Self {
        self.adopt_columns(R::columns());
        let values = row.values().into_iter().map(Expr::Value).collect();
        self.rows.push(InsertValues::Exprs(values));
        self
    }

    /// Add typed rows. An empty iterator leaves the builder untouched.
    pub fn rows_from<'a, R: InsertRow + 'a>(mut self, rows: impl IntoIterator<Item = &'a R>) -> Self {
        let mut rows = rows.into_iter().peekable();
        if rows.peek().is_none() {
            return self;
        }
        self.adopt_columns(R::columns());
        for row in rows {
            let values = row.values().into_iter().map(Expr::Value).collect();
            self.rows.push(InsertValues::Exprs(values));
        }
        self
    }

    fn adopt_columns(&mut self, names: &[&str]) {
        let mut parsed = Vec::with_capacity(names.len());
        for name in names {
            match Ident::parse(name) {
                Ok(ident) => parsed.push(ident),
                Err(err) => return self.record_error(err),
            }
        }
        if self.columns.is_empty() {
            self.columns = parsed;
        } else if self.columns != parsed {
            self.record_error(SqlError::row_shape(format!(
                "typed row columns {names:?} differ from the declared column list"
            )));
        }
    }

    /// `INSERT INTO t (cols) SELECT ...`
    pub fn from_select(mut self, select: SelectQb) -> Self {
        self.select = Some(Box::new(select));
        self
    }

    /// `ON CONFLICT DO NOTHING` without a target.
    pub fn on_conflict_do_nothing(mut self) -> Self {
        self.on_conflict = Some(OnConflict {
            target: Vec::new(),
            action: ConflictAction::DoNothing,
        });
        self
    }

    /// Start an `ON CONFLICT (target) ...` clause.
    pub fn on_conflict(mut self, target: &[&str]) -> OnConflictQb {
        let mut idents = Vec::with_capacity(target.len());
        for t in target {
            match Ident::parse(t) {
                Ok(ident) => idents.push(ident),
                Err(err) => self.record_error(err),
            }
        }
        OnConflictQb {
            builder: self,
            target: idents,
        }
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

    /// Resolve the column list and turn every row into positional form.
    fn normalized_rows(&self) -> SqlResult<(Vec<Ident>, Vec<Vec<Expr>>)> {
        let explicit = !self.columns.is_empty();
        let mut columns = self.columns.clone();

        if !explicit {
            let first_record = self.rows.iter().find_map(|r| match r {
                InsertValues::Record(rec) => Some(rec),
                InsertValues::Exprs(_) => None,
            });
            if let Some(rec) = first_record {
                for key in rec.keys() {
                    columns.push(Ident::parse(key)?);
                }
            }
        }

        let mut out = Vec::with_capacity(self.rows.len());
        for (i, row) in self.rows.iter().enumerate() {
            let exprs = match row {
                InsertValues::Exprs(values) => {
                    let expected = if columns.is_empty() {
                        out.first().map_or(values.len(), |r: &Vec<Expr>| r.len())
                    } else {
                        columns.len()
                    };
                    if values.len() != expected {
                        return Err(SqlError::row_shape(format!(
                            "row {i} has {} values, expected {expected}",
                            values.len()
                        )));
                    }
                    values.clone()
                }
                InsertValues::Record(rec) => record_row(i, rec, &columns, explicit)?,
            };
            if exprs.is_empty() {
                return Err(SqlError::row_shape(format!("row {i} has no values")));
            }
            out.push(exprs);
        }

        Ok((columns, out))
    }
}

fn record_row(i: usize, rec: &Record, columns: &[Ident], explicit: bool) -> SqlResult<Vec<Expr>> {
    let mut keyed = Vec::with_capacity(rec.len());
    for (key, value) in rec.iter() {
        let ident = Ident::parse(key)?;
        if !columns.contains(&ident) {
            return Err(SqlError::row_shape(format!(
                "row {i} has column '{key}' which is not in the column list"
            )));
        }
        keyed.push((ident, value));
    }

    if !explicit && keyed.len() != columns.len() {
        return Err(SqlError::row_shape(format!(
            "row {i} has {} columns, expected the {} columns of the first row",
            keyed.len(),
            columns.len()
        )));
    }

    Ok(columns
        .iter()
        .map(|c| {
            keyed
                .iter()
                .find(|(k, _)| k == c)
                .map_or(Expr::Value(Value::Null), |(_, v)| Expr::Value((*v).clone()))
        })
        .collect())
}

impl SqlQb for InsertQb {
    fn verb(&self) -> &'static str {
        "INSERT"
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
        if self.select.is_some() && !self.rows.is_empty() {
            return Err(SqlError::invalid(
                "InsertQb: cannot combine VALUES rows with a SELECT source",
            ));
        }
        if let Some(select) = &self.select {
            select.validate()?;
        }
        Ok(())
    }

    fn write_sql(&self, w: &mut SqlWriter<'_>) -> SqlResult<()> {
        let table = self
            .table
            .as_ref()
            .ok_or_else(|| SqlError::invalid("InsertQb: missing table"))?;

        w.push("INSERT INTO ");
        w.push_ident(table)?;

        if let Some(select) = &self.select {
            push_column_list(w, &self.columns)?;
            w.push_char(' ');
            select.write_sql(w)?;
        } else if self.rows.is_empty() {
            if !self.columns.is_empty() {
                return Err(SqlError::invalid(
                    "InsertQb: columns declared but no rows given",
                ));
            }
            w.push(" DEFAULT VALUES");
        } else {
            let (columns, rows) = self.normalized_rows()?;
            push_column_list(w, &columns)?;
            w.push(" VALUES ");
            for (i, row) in rows.iter().enumerate() {
                if i > 0 {
                    w.push(", ");
                }
                w.push_char('(');
                w.push_expr_list(row)?;
                w.push_char(')');
            }
        }

        if let Some(conflict) = &self.on_conflict {
            push_on_conflict(w, conflict)?;
        }
        w.push_returning(&self.returning)?;
        Ok(())
    }
}

fn push_column_list(w: &mut SqlWriter<'_>, columns: &[Ident]) -> SqlResult<()> {
    if columns.is_empty() {
        return Ok(());
    }
    w.push(" (");
    for (i, c) in columns.iter().enumerate() {
        if i > 0 {
            w.push(", ");
        }
        w.push_ident(c)?;
    }
    w.push_char(')');
    Ok(())
}

fn push_on_conflict(w: &mut SqlWriter<'_>, conflict: &OnConflict) -> SqlResult<()> {
    w.push(" ON CONFLICT");
    if !conflict.target.is_empty() {
        require(w.dialect(), Capability::ConflictTarget)?;
        push_column_list(w, &conflict.target)?;
    }
    match &conflict.action {
        ConflictAction::DoNothing => {
            w.push(" DO NOTHING");
        }
        ConflictAction::DoUpdate { set, where_group } => {
            if set.is_empty() {
                return Err(SqlError::invalid(
                    "ON CONFLICT DO UPDATE requires at least one SET column",
                ));
            }
            w.push(" DO UPDATE SET ");
            w.push_assignments(set)?;
            if !where_group.is_empty() {
                require(w.dialect(), Capability::ConflictUpdateWhere)?;
                w.push_where(where_group)?;
            }
        }
    }
    Ok(())
}

/// ON CONFLICT builder.
pub struct OnConflictQb {
    builder: InsertQb,
    target: Vec<Ident>,
}

impl OnConflictQb {
    /// DO NOTHING.
    pub fn do_nothing(mut self) -> InsertQb {
        self.builder.on_conflict = Some(OnConflict {
            target: self.target,
            action: ConflictAction::DoNothing,
        });
        self.builder
    }

    /// DO UPDATE; configure the SET list, then call `finish`.
    pub fn do_update(self) -> OnConflictUpdateQb {
        OnConflictUpdateQb {
            builder: self.builder,
            target: self.target,
            set: Vec::new(),
            where_group: ExprGroup::new(),
        }
    }
}

/// Builder for ON CONFLICT DO UPDATE.
pub struct OnConflictUpdateQb {
    builder: InsertQb,
    target: Vec<Ident>,
    set: Vec<Assignment>,
    where_group: ExprGroup,
}

impl OnConflictUpdateQb {
    /// Set a column to an expression or value.
    pub fn set(mut self, column: &str, value: impl Into<Expr>) -> Self {
        match Ident::parse(column) {
            Ok(ident) => self.set.push(Assignment {
                column: ident,
                value: value.into(),
            }),
            Err(err) => self.builder.record_error(err),
        }
        self
    }

    /// Set a column to the value proposed for insertion (`excluded.column`).
    pub fn set_excluded(mut self, column: &str) -> Self {
        let parsed = Ident::parse(column).and_then(|c| Ok((Ident::name("excluded")?.join(&c), c)));
        match parsed {
            Ok((excluded, ident)) => self.set.push(Assignment {
                column: ident,
                value: Expr::Ident(excluded),
            }),
            Err(err) => self.builder.record_error(err),
        }
        self
    }

    /// Add a `DO UPDATE ... WHERE` condition (ANDed).
    pub fn and_where(mut self, expr: Expr) -> Self {
        self.where_group.and_expr(expr);
        self
    }

    /// Finish and return the InsertQb.
    pub fn finish(mut self) -> InsertQb {
        self.builder.on_conflict = Some(OnConflict {
            target: self.target,
            action: ConflictAction::DoUpdate {
                set: self.set,
                where_group: self.where_group,
            },
        });
        self.builder
    }
}
