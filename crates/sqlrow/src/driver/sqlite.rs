//! Blocking driver over a single SQLite connection.
//!
//! SQLite understands the dialect the builders emit: backtick identifiers,
//! `?` placeholders and `LIMIT offset,count`.

use super::registry::Connect;
use super::{ConnectionState, Driver, Statement};
use crate::config::DriverConfig;
use crate::error::{OrmError, OrmResult};
use crate::monitor::SqlLogger;
use crate::row::Row;
use crate::value::{BindType, Value};
use parking_lot::Mutex;
use rusqlite::types::{Value as SqliteValue, ValueRef};
use rusqlite::{Connection as SqliteConnection, params_from_iter};
use std::time::Instant;

struct Inner {
    config: DriverConfig,
    conn: Option<SqliteConnection>,
    state: ConnectionState,
    last_error: Option<String>,
    row_count: u64,
}

/// [`Driver`] backed by `rusqlite`.
///
/// `config.database` is the file path (`:memory:` for a private in-memory
/// database). Host, port and credentials are accepted for interface parity
/// and ignored. The connection opens lazily on the first statement.
pub struct SqliteDriver {
    // rusqlite::Connection isn't `Sync`
    inner: Mutex<Inner>,
    logger: SqlLogger,
}

impl std::fmt::Debug for SqliteDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("SqliteDriver")
            .field("config", &inner.config)
            .field("state", &inner.state)
            .field("last_error", &inner.last_error)
            .finish_non_exhaustive()
    }
}

impl SqliteDriver {
    /// Create an unconnected handle.
    pub fn new(config: DriverConfig) -> Self {
        Self {
            inner: Mutex::new(Inner {
                config,
                conn: None,
                state: ConnectionState::Unconnected,
                last_error: None,
                row_count: 0,
            }),
            logger: SqlLogger::default(),
        }
    }

    /// Create a handle and connect immediately.
    ///
    /// Connection failure is recorded, not returned; check [`Driver::state`].
    pub fn open(config: DriverConfig) -> Self {
        let driver = Self::new(config);
        {
            let mut inner = driver.inner.lock();
            driver.connect_inner(&mut inner);
        }
        driver
    }

    pub fn with_logger(mut self, logger: SqlLogger) -> Self {
        self.logger = logger;
        self
    }

    fn connect_inner(&self, inner: &mut Inner) -> bool {
        match open_connection(&inner.config) {
            Ok(conn) => {
                inner.conn = Some(conn);
                inner.state = ConnectionState::Connected;
                inner.last_error = None;
                tracing::debug!(
                    target: "sqlrow.sql",
                    database = %inner.config.database,
                    host = %inner.config.host,
                    "connected"
                );
                true
            }
            Err(err) => {
                let message = err.to_string();
                self.logger.failure("<connect>", &message);
                inner.conn = None;
                inner.state = ConnectionState::Error;
                inner.last_error = Some(message);
                false
            }
        }
    }
}

fn open_connection(config: &DriverConfig) -> OrmResult<SqliteConnection> {
    let conn = SqliteConnection::open(&config.database).map_err(|e| {
        OrmError::Connection(format!("cannot open database '{}': {e}", config.database))
    })?;
    if let Some(encoding) = sqlite_encoding(&config.encoding)? {
        conn.execute_batch(&format!("PRAGMA encoding = '{encoding}'"))
            .map_err(|e| OrmError::Connection(format!("cannot set encoding '{encoding}': {e}")))?;
    }
    Ok(conn)
}

/// Map a configured encoding onto one SQLite accepts.
fn sqlite_encoding(encoding: &str) -> OrmResult<Option<&'static str>> {
    let normalized = encoding.trim().to_ascii_lowercase().replace(['-', '_'], "");
    match normalized.as_str() {
        "" => Ok(None),
        "utf8" | "utf8mb4" | "utf8mb3" => Ok(Some("UTF-8")),
        "utf16" => Ok(Some("UTF-16")),
        "utf16le" => Ok(Some("UTF-16le")),
        "utf16be" => Ok(Some("UTF-16be")),
        _ => Err(OrmError::Connection(format!(
            "unsupported encoding '{encoding}'"
        ))),
    }
}

fn bind_value(value: &Value) -> SqliteValue {
    match (BindType::infer(value), value) {
        (BindType::Null, _) => SqliteValue::Null,
        (BindType::Bool, Value::Bool(b)) => SqliteValue::Integer(i64::from(*b)),
        (BindType::Int, Value::Int(i)) => SqliteValue::Integer(*i),
        (_, Value::Float(f)) => SqliteValue::Text(f.to_string()),
        (_, Value::Blob(b)) => SqliteValue::Blob(b.clone()),
        (_, Value::Text(s)) => SqliteValue::Text(s.clone()),
        // Unreachable combinations fall back to NULL.
        _ => SqliteValue::Null,
    }
}

fn read_value(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Int(i),
        ValueRef::Real(f) => Value::Float(f),
        ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::Blob(b.to_vec()),
    }
}

/// Prepare, bind and run; buffer rows if the statement produces any.
fn run(conn: &SqliteConnection, sql: &str, params: &[Value]) -> rusqlite::Result<(Vec<Row>, u64)> {
    let mut stmt = conn.prepare(sql)?;
    let bound: Vec<SqliteValue> = params.iter().map(bind_value).collect();

    if stmt.column_count() == 0 {
        let affected = stmt.execute(params_from_iter(bound.iter()))?;
        return Ok((Vec::new(), u64::try_from(affected).unwrap_or(u64::MAX)));
    }

    let columns: Vec<String> = stmt.column_names().iter().map(ToString::to_string).collect();
    let mut rows = stmt.query(params_from_iter(bound.iter()))?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let mut fields = Vec::with_capacity(columns.len());
        for (i, name) in columns.iter().enumerate() {
            fields.push((name.clone(), read_value(row.get_ref(i)?)));
        }
        out.push(Row::new(fields));
    }
    let fetched = u64::try_from(out.len()).unwrap_or(u64::MAX);
    Ok((out, fetched))
}

impl Driver for SqliteDriver {
    fn connect(&self, config: &DriverConfig) -> bool {
        let mut inner = self.inner.lock();
        inner.config = config.clone();
        self.connect_inner(&mut inner)
    }

    fn state(&self) -> ConnectionState {
        self.inner.lock().state
    }

    fn config(&self) -> DriverConfig {
        self.inner.lock().config.clone()
    }

    fn execute(&self, sql: &str, params: &[Value]) -> Statement {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        let mut statement = Statement::unexecuted(sql, params);

        if inner.conn.is_none()
            && inner.state == ConnectionState::Unconnected
            && !self.connect_inner(inner)
        {
            return statement;
        }
        inner.last_error = None;

        let Some(conn) = inner.conn.as_ref() else {
            let message = "not connected".to_string();
            self.logger.failure(sql, &message);
            inner.state = ConnectionState::Error;
            inner.last_error = Some(message);
            return statement;
        };

        let started = Instant::now();
        match run(conn, sql, params) {
            Ok((rows, affected)) => {
                self.logger.statement(sql, params, affected, started.elapsed());
                inner.row_count = affected;
                inner.state = ConnectionState::Connected;
                statement.executed = true;
                statement.rows = rows;
                statement.affected = affected;
            }
            Err(err) => {
                let message = OrmError::from(err).to_string();
                self.logger.failure(sql, &message);
                inner.row_count = 0;
                inner.state = ConnectionState::Error;
                inner.last_error = Some(message);
            }
        }
        statement
    }

    fn last_insert_id(&self) -> i64 {
        self.inner
            .lock()
            .conn
            .as_ref()
            .map_or(0, SqliteConnection::last_insert_rowid)
    }

    fn row_count(&self) -> u64 {
        self.inner.lock().row_count
    }

    fn get_error(&self) -> Option<String> {
        self.inner.lock().last_error.clone()
    }

    /// Only a live connection moves to `Error`; an unconnected handle keeps
    /// its lazy connect.
    fn record_error(&self, message: String) {
        let mut inner = self.inner.lock();
        if inner.conn.is_some() {
            inner.state = ConnectionState::Error;
        }
        inner.last_error = Some(message);
    }
}

impl Connect for SqliteDriver {
    fn from_config(config: DriverConfig) -> Self {
        Self::new(config)
    }
}
