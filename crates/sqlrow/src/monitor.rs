//! `tracing` output for executed SQL.
//!
//! Drivers log every statement through a [`SqlLogger`] under the
//! `sqlrow.sql` target. No subscriber is installed by this crate.

use crate::value::Value;
use std::time::Duration;
use tracing::Level;

/// Emits one event per statement, and a `WARN` event per failure.
#[derive(Debug, Clone)]
pub struct SqlLogger {
    /// Level for successful statements.
    pub level: Level,
    /// Truncate long SQL strings (in bytes, on a char boundary). `None`
    /// means no truncation.
    pub max_sql_length: Option<usize>,
}

impl Default for SqlLogger {
    fn default() -> Self {
        Self {
            level: Level::DEBUG,
            max_sql_length: Some(200),
        }
    }
}

impl SqlLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    pub(crate) fn truncate_sql(&self, sql: &str) -> String {
        match self.max_sql_length {
            Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
            _ => sql.to_string(),
        }
    }

    /// Log a statement that ran.
    pub fn statement(&self, sql: &str, params: &[Value], affected: u64, elapsed: Duration) {
        /// Dispatch a tracing event at a runtime-determined level.
        macro_rules! emit_at_level {
            ($level:expr, $($field:tt)*) => {
                match $level {
                    Level::ERROR => tracing::error!($($field)*),
                    Level::WARN  => tracing::warn!($($field)*),
                    Level::INFO  => tracing::info!($($field)*),
                    Level::DEBUG => tracing::debug!($($field)*),
                    Level::TRACE => tracing::trace!($($field)*),
                }
            };
        }

        let sql = self.truncate_sql(sql);
        emit_at_level!(
            self.level,
            target: "sqlrow.sql",
            sql = %sql,
            param_count = params.len(),
            affected,
            elapsed_us = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX),
        );
    }

    /// Log a statement or connection failure.
    pub fn failure(&self, sql: &str, error: &str) {
        let sql = self.truncate_sql(sql);
        tracing::warn!(target: "sqlrow.sql", sql = %sql, error = %error, "statement failed");
    }
}

pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_on_char_boundary() {
        assert_eq!(truncate_sql_bytes("héllo", 2), "h");
        assert_eq!(truncate_sql_bytes("abc", 10), "abc");
    }

    #[test]
    fn logger_truncation() {
        let logger = SqlLogger::new().max_sql_length(6);
        assert_eq!(logger.truncate_sql("SELECT * FROM t"), "SELECT...");
        assert_eq!(logger.clone().no_truncate().truncate_sql("SELECT 1"), "SELECT 1");
    }
}
