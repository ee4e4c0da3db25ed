//! Table-scoped CRUD facade.
//!
//! A [`Record`] pairs a [`Table`] with a shared [`Driver`] and turns field
//! maps and descriptors into parameterized SQL. Like the driver, it never
//! returns errors: a failed or refused statement yields `0`, an empty
//! result or `None`, and the reason is readable through [`Record::error`].
//!
//! ```
//! use std::sync::Arc;
//! use sqlrow::{Driver, DriverConfig, FieldMap, Record, SqliteDriver, Table};
//!
//! let driver = Arc::new(SqliteDriver::new(DriverConfig::default()));
//! let posts = Record::new(Table::bare("posts"), driver);
//! posts.driver().execute("CREATE TABLE posts (id INTEGER PRIMARY KEY, title TEXT)", &[]);
//!
//! let id = posts.add(&FieldMap::new().set("title", "hello"));
//! let row = posts.find_by_id(id, "title").unwrap();
//! assert_eq!(row.try_get::<String>("title")?, "hello");
//! # Ok::<(), sqlrow::OrmError>(())
//! ```

use crate::builder::clause::{Clause, where_clause};
use crate::builder::fields::Fields;
use crate::condition::Condition;
use crate::config::DriverConfig;
use crate::driver::{Connect, Driver, shared};
use crate::error::{OrmError, OrmResult};
use crate::ident::{Ident, quote_columns};
use crate::row::{FromRow, Row};
use crate::table::Table;
use crate::value::Value;
use std::sync::Arc;

// ==================== Field maps ====================

/// Ordered column → value list for INSERT and UPDATE.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap {
    fields: Vec<(String, Value)>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column. Setting the same column twice replaces its value in place.
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        let column = column.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(c, _)| *c == column) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((column, value)),
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(c, _)| c.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.fields.iter().map(|(_, v)| v)
    }

    /// Parse a JSON object; key order is preserved.
    pub fn from_json(value: &serde_json::Value) -> OrmResult<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| OrmError::validation("field map must be a JSON object"))?;
        Ok(object
            .iter()
            .fold(Self::new(), |map, (k, v)| map.set(k.as_str(), Value::from_json(v))))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), |map, (k, v)| map.set(k, v))
    }
}

// ==================== Ids ====================

/// Leading integer of `s`: optional whitespace, optional sign, digits.
/// Anything without a leading digit is `0`; overflow saturates.
///
/// ```
/// use sqlrow::int_cast;
///
/// assert_eq!(int_cast("42"), 42);
/// assert_eq!(int_cast(" -7abc"), -7);
/// assert_eq!(int_cast("1 OR 1=1"), 1);
/// assert_eq!(int_cast("abc"), 0);
/// ```
pub fn int_cast(s: &str) -> i64 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let mut n: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        let d = i64::from(b - b'0');
        n = if negative {
            n.saturating_mul(10).saturating_sub(d)
        } else {
            n.saturating_mul(10).saturating_add(d)
        };
    }
    n
}

/// Anything usable as a row id. Strings go through [`int_cast`], so an id
/// taken from request input can never inject SQL.
pub trait IntoId {
    fn into_id(self) -> i64;
}

macro_rules! into_id_int {
    ($($t:ty),*) => {
        $(
            impl IntoId for $t {
                fn into_id(self) -> i64 {
                    i64::try_from(self).unwrap_or(i64::MAX)
                }
            }
        )*
    };
}

into_id_int!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

impl IntoId for &str {
    fn into_id(self) -> i64 {
        int_cast(self)
    }
}

impl IntoId for String {
    fn into_id(self) -> i64 {
        int_cast(&self)
    }
}

impl IntoId for &String {
    fn into_id(self) -> i64 {
        int_cast(self)
    }
}

fn id_condition(id: impl IntoId) -> Condition {
    Condition::raw(format!("id = {}", id.into_id()))
}

// ==================== Atomic updates ====================

/// Target of [`Record::update_one`]: a single column moved by `delta`, or
/// explicit per-column delta expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateTarget {
    Column(String),
    /// `(column, expr)`; renders `` `column` = `column` <expr> ``. An
    /// expression without a leading `+`/`-` is added.
    Exprs(Vec<(String, String)>),
}

impl From<&str> for UpdateTarget {
    fn from(column: &str) -> Self {
        Self::Column(column.to_string())
    }
}

impl From<String> for UpdateTarget {
    fn from(column: String) -> Self {
        Self::Column(column)
    }
}

impl From<Vec<(&str, &str)>> for UpdateTarget {
    fn from(exprs: Vec<(&str, &str)>) -> Self {
        Self::Exprs(
            exprs
                .into_iter()
                .map(|(c, e)| (c.to_string(), e.to_string()))
                .collect(),
        )
    }
}

fn delta_expr(column: &str, delta: i64) -> OrmResult<String> {
    let col = Ident::parse(column)?.to_sql();
    Ok(if delta < 0 {
        format!("{col} = {col} - {}", delta.unsigned_abs())
    } else {
        format!("{col} = {col} + {delta}")
    })
}

fn explicit_expr(column: &str, expr: &str) -> OrmResult<String> {
    let col = Ident::parse(column)?.to_sql();
    let expr = expr.trim();
    if expr.is_empty() {
        return Err(OrmError::validation(format!(
            "empty delta expression for column {column}"
        )));
    }
    Ok(if expr.starts_with(['+', '-']) {
        format!("{col} = {col} {expr}")
    } else {
        format!("{col} = {col} + {expr}")
    })
}

// ==================== Record ====================

/// CRUD operations scoped to one table.
#[derive(Clone)]
pub struct Record {
    table: Table,
    driver: Arc<dyn Driver>,
}

impl std::fmt::Debug for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Record")
            .field("table", &self.table)
            .field("state", &self.driver.state())
            .finish()
    }
}

impl Record {
    /// Facade over an explicitly provided driver handle.
    pub fn new(table: Table, driver: Arc<dyn Driver>) -> Self {
        Self { table, driver }
    }

    /// Facade over the process-wide driver of type `D`.
    ///
    /// The first `config` seen for `D` creates the connection; later configs
    /// only contribute their table prefix.
    pub fn shared<D: Connect>(name: impl Into<String>, config: &DriverConfig) -> Self {
        let driver = shared::<D>(config);
        Self::new(Table::new(name, config.prefix.clone()), driver)
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn driver(&self) -> &Arc<dyn Driver> {
        &self.driver
    }

    /// The driver's last recorded error.
    pub fn error(&self) -> Option<String> {
        self.driver.get_error()
    }

    fn refuse(&self, err: OrmError) {
        tracing::warn!(
            target: "sqlrow.sql",
            table = %self.table.qualified(),
            error = %err,
            "statement refused"
        );
        self.driver.record_error(err.to_string());
    }

    /// `WHERE ...` for a mutating statement; an empty predicate is refused.
    fn required_where(&self, verb: &str, condition: &Condition) -> Option<String> {
        let clause = where_clause("WHERE", condition);
        if clause.is_none() {
            self.refuse(OrmError::validation(format!(
                "{verb} on {} requires a non-empty condition",
                self.table.qualified()
            )));
        }
        clause
    }

    fn affected(&self, sql: &str, params: &[Value]) -> u64 {
        if self.driver.execute(sql, params).is_executed() {
            self.driver.row_count()
        } else {
            0
        }
    }

    /// `INSERT` one row; returns the generated id (`0` on failure).
    pub fn add(&self, fields: &FieldMap) -> i64 {
        if fields.is_empty() {
            self.refuse(OrmError::validation("INSERT requires at least one field"));
            return 0;
        }
        let columns = match quote_columns(fields.columns()) {
            Ok(columns) => columns,
            Err(err) => {
                self.refuse(err);
                return 0;
            }
        };
        let placeholders = vec!["?"; fields.len()].join(",");
        let sql = format!(
            "INSERT INTO {} ({columns}) VALUES ({placeholders})",
            self.table.qualified()
        );
        let params: Vec<Value> = fields.values().cloned().collect();
        if self.driver.execute(&sql, &params).is_executed() {
            self.driver.last_insert_id()
        } else {
            0
        }
    }

    /// `UPDATE ... SET col = ?, ... WHERE condition`.
    ///
    /// Field values bind first, then `params` for the condition's
    /// placeholders. Returns the affected row count.
    pub fn update_values(
        &self,
        fields: &FieldMap,
        condition: impl Into<Condition>,
        params: &[Value],
    ) -> u64 {
        if fields.is_empty() {
            self.refuse(OrmError::validation("UPDATE requires at least one field"));
            return 0;
        }
        let set = match fields
            .columns()
            .map(|c| Ident::parse(c).map(|ident| format!("{} = ?", ident.to_sql())))
            .collect::<OrmResult<Vec<_>>>()
        {
            Ok(set) => set.join(","),
            Err(err) => {
                self.refuse(err);
                return 0;
            }
        };
        let Some(where_sql) = self.required_where("UPDATE", &condition.into()) else {
            return 0;
        };
        let sql = format!("UPDATE {} SET {set} {where_sql}", self.table.qualified());
        let bound: Vec<Value> = fields.values().cloned().chain(params.iter().cloned()).collect();
        self.affected(&sql, &bound)
    }

    pub fn update_by_id(&self, id: impl IntoId, fields: &FieldMap) -> u64 {
        self.update_values(fields, id_condition(id), &[])
    }

    /// Atomic increment/decrement: `` `col` = `col` + delta ``, evaluated by
    /// the database so concurrent callers never lose an update.
    pub fn update_one(
        &self,
        target: impl Into<UpdateTarget>,
        condition: impl Into<Condition>,
        delta: i64,
        params: &[Value],
    ) -> u64 {
        let set = match target.into() {
            UpdateTarget::Column(column) => delta_expr(&column, delta),
            UpdateTarget::Exprs(exprs) if exprs.is_empty() => Err(OrmError::validation(
                "UPDATE requires at least one field",
            )),
            UpdateTarget::Exprs(exprs) => exprs
                .iter()
                .map(|(c, e)| explicit_expr(c, e))
                .collect::<OrmResult<Vec<_>>>()
                .map(|parts| parts.join(",")),
        };
        let set = match set {
            Ok(set) => set,
            Err(err) => {
                self.refuse(err);
                return 0;
            }
        };
        let Some(where_sql) = self.required_where("UPDATE", &condition.into()) else {
            return 0;
        };
        let sql = format!("UPDATE {} SET {set} {where_sql}", self.table.qualified());
        self.affected(&sql, params)
    }

    /// Atomic toggle of a 0/1 column.
    pub fn update_bool(
        &self,
        column: &str,
        condition: impl Into<Condition>,
        params: &[Value],
    ) -> u64 {
        let col = match Ident::parse(column) {
            Ok(ident) => ident.to_sql(),
            Err(err) => {
                self.refuse(err);
                return 0;
            }
        };
        let Some(where_sql) = self.required_where("UPDATE", &condition.into()) else {
            return 0;
        };
        let sql = format!(
            "UPDATE {} SET {col} = CASE WHEN {col} = 1 THEN 0 ELSE 1 END {where_sql}",
            self.table.qualified()
        );
        self.affected(&sql, params)
    }

    fn select_sql(&self, clause: &Clause, fields: &Fields) -> String {
        format!(
            "SELECT {} FROM {}{}",
            fields.project(),
            self.table.qualified(),
            clause.assemble(self.table.prefix())
        )
    }

    /// `SELECT fields FROM table <clauses>`.
    pub fn find(&self, clause: &Clause, fields: impl Into<Fields>, params: &[Value]) -> Vec<Row> {
        let sql = self.select_sql(clause, &fields.into());
        self.driver.get_array(&sql, params)
    }

    /// [`find`](Self::find), with each row mapped through [`FromRow`].
    pub fn find_as<T: FromRow>(
        &self,
        clause: &Clause,
        fields: impl Into<Fields>,
        params: &[Value],
    ) -> Vec<T> {
        let sql = self.select_sql(clause, &fields.into());
        self.driver.get_object(&sql, params)
    }

    /// First row matching `condition` (`LIMIT 1`).
    pub fn find_one(
        &self,
        condition: impl Into<Condition>,
        fields: impl Into<Fields>,
        params: &[Value],
    ) -> Option<Row> {
        let clause = Clause::new().filter(condition).limit(1);
        self.find(&clause, fields, params).into_iter().next()
    }

    pub fn find_by_id(&self, id: impl IntoId, fields: impl Into<Fields>) -> Option<Row> {
        self.find_one(id_condition(id), fields, &[])
    }

    /// `DELETE FROM table WHERE condition`; an empty condition is refused.
    pub fn delete_values(&self, condition: impl Into<Condition>, params: &[Value]) -> u64 {
        let Some(where_sql) = self.required_where("DELETE", &condition.into()) else {
            return 0;
        };
        let sql = format!("DELETE FROM {} {where_sql}", self.table.qualified());
        self.affected(&sql, params)
    }

    pub fn delete_by_id(&self, id: impl IntoId) -> u64 {
        self.delete_values(id_condition(id), &[])
    }

    /// `COUNT(id)` over rows matching `condition`.
    ///
    /// `None` means no row came back, which only happens when the statement
    /// failed; check [`error`](Self::error) to tell the cases apart.
    pub fn count(&self, condition: impl Into<Condition>, params: &[Value]) -> Option<i64> {
        self.count_by(condition, "id", params)
    }

    pub fn count_by(
        &self,
        condition: impl Into<Condition>,
        column: &str,
        params: &[Value],
    ) -> Option<i64> {
        let clause = Clause::new().filter(condition).limit(1);
        let fields = Fields::new().alias("count", format!("COUNT({column})"));
        let rows = self.find(&clause, fields, params);
        rows.first()
            .and_then(|row| row.get("count"))
            .and_then(Value::as_i64)
    }

    /// First column of the first row, or `None` when nothing came back.
    pub fn scalar(
        &self,
        clause: &Clause,
        fields: impl Into<Fields>,
        params: &[Value],
    ) -> Option<Value> {
        self.find(clause, fields, params)
            .into_iter()
            .next()
            .and_then(|row| row.first().cloned())
    }
}
