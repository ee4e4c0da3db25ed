//! Convenient imports for typical `sqlrow` usage.
//!
//! ```
//! use sqlrow::prelude::*;
//! ```

pub use crate::params;
pub use crate::{
    Clause, Condition, Driver, DriverConfig, FieldMap, Fields, FromRow, OrmError, OrmResult,
    Record, Row, SqliteDriver, Table, Value,
};
