//! Connection driver abstraction.
//!
//! A [`Driver`] owns one physical connection and executes parameterized
//! statements against it. Drivers never return errors to their callers: a
//! failure is rendered to a string, stored, and readable through
//! [`Driver::get_error`] until the next statement overwrites it.

pub mod registry;
pub mod sqlite;

pub use registry::{Connect, shared};
pub use sqlite::SqliteDriver;

use crate::config::DriverConfig;
use crate::row::{FromRow, Row};
use crate::value::{BindType, Value};

/// Connection lifecycle.
///
/// `Error` is not terminal: the handle stays callable and the next
/// successful statement moves it back to `Connected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Unconnected,
    Connected,
    Error,
}

/// Outcome of [`Driver::execute`].
///
/// Rows produced by the statement are buffered here; a statement that failed
/// to prepare or run comes back with `executed == false`.
#[derive(Debug, Clone, Default)]
pub struct Statement {
    pub sql: String,
    pub bind_types: Vec<BindType>,
    pub executed: bool,
    pub rows: Vec<Row>,
    pub affected: u64,
}

impl Statement {
    /// A statement that never ran.
    pub fn unexecuted(sql: &str, params: &[Value]) -> Self {
        Self {
            sql: sql.to_string(),
            bind_types: params.iter().map(BindType::infer).collect(),
            ..Self::default()
        }
    }

    pub fn is_executed(&self) -> bool {
        self.executed
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }
}

/// A blocking connection driver.
///
/// Implementations use interior mutability so one handle can be shared
/// behind an `Arc` by every record facade pointed at it.
pub trait Driver: Send + Sync {
    /// (Re)connect with `config`. Returns `false` and records the error on
    /// failure.
    fn connect(&self, config: &DriverConfig) -> bool;

    fn state(&self) -> ConnectionState;

    /// The configuration this handle was created or last connected with.
    fn config(&self) -> DriverConfig;

    /// Prepare, bind and run one statement.
    fn execute(&self, sql: &str, params: &[Value]) -> Statement;

    /// Run a statement and materialize every row it produced.
    fn get_array(&self, sql: &str, params: &[Value]) -> Vec<Row> {
        self.execute(sql, params).into_rows()
    }

    /// Identifier generated by the most recent insert on this connection.
    fn last_insert_id(&self) -> i64;

    /// Rows affected by the most recent statement.
    fn row_count(&self) -> u64;

    /// Last recorded error, if the most recent statement failed.
    fn get_error(&self) -> Option<String>;

    /// Store an error raised outside the driver (descriptor validation,
    /// row decoding) so callers read every failure from one place.
    fn record_error(&self, message: String);
}

impl dyn Driver {
    /// Run a statement and map every row through [`FromRow`].
    ///
    /// A row that fails to decode records the error and yields an empty
    /// result.
    pub fn get_object<T: FromRow>(&self, sql: &str, params: &[Value]) -> Vec<T> {
        let rows = self.get_array(sql, params);
        match rows.iter().map(T::from_row).collect() {
            Ok(objects) => objects,
            Err(err) => {
                tracing::warn!(target: "sqlrow.sql", error = %err, "row mapping failed");
                self.record_error(err.to_string());
                Vec::new()
            }
        }
    }
}
