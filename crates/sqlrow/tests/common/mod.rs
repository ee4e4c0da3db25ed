#![allow(dead_code)]

use parking_lot::Mutex;
use sqlrow::{ConnectionState, Driver, DriverConfig, Row, Statement, Value};

/// Records every statement and returns canned rows.
#[derive(Default)]
pub struct RecordingDriver {
    pub log: Mutex<Vec<(String, Vec<Value>)>>,
    pub rows: Mutex<Vec<Row>>,
    error: Mutex<Option<String>>,
}

impl RecordingDriver {
    pub fn with_rows(rows: Vec<Row>) -> Self {
        Self {
            rows: Mutex::new(rows),
            ..Self::default()
        }
    }

    pub fn statements(&self) -> Vec<String> {
        self.log.lock().iter().map(|(sql, _)| sql.clone()).collect()
    }

    pub fn last(&self) -> (String, Vec<Value>) {
        self.log.lock().last().cloned().unwrap_or_default()
    }
}

impl Driver for RecordingDriver {
    fn connect(&self, _config: &DriverConfig) -> bool {
        true
    }

    fn state(&self) -> ConnectionState {
        ConnectionState::Connected
    }

    fn config(&self) -> DriverConfig {
        DriverConfig::default()
    }

    fn execute(&self, sql: &str, params: &[Value]) -> Statement {
        *self.error.lock() = None;
        self.log.lock().push((sql.to_string(), params.to_vec()));
        let mut stmt = Statement::unexecuted(sql, params);
        stmt.executed = true;
        stmt.rows = self.rows.lock().clone();
        stmt.affected = 1;
        stmt
    }

    fn last_insert_id(&self) -> i64 {
        42
    }

    fn row_count(&self) -> u64 {
        1
    }

    fn get_error(&self) -> Option<String> {
        self.error.lock().clone()
    }

    fn record_error(&self, message: String) {
        *self.error.lock() = Some(message);
    }
}
