//! # sqlrow
//!
//! Thin SQL assembly and table-scoped CRUD over a blocking connection driver.
//!
//! ## Features
//!
//! - **Typed descriptors**: conditions, clause sets and field lists are plain
//!   Rust values (or JSON from a routing layer) compiled into SQL fragments
//! - **Fixed clause order**: joins, WHERE, GROUP BY, HAVING, ORDER BY, LIMIT and
//!   OFFSET are always emitted in that order, however they were built
//! - **Atomic updates**: increments and toggles are expressed in SQL, never as
//!   read-modify-write
//! - **Safe defaults**: UPDATE and DELETE require a condition; ids from request
//!   input are integer-cast
//! - **Soft failures**: drivers and facades record errors instead of returning
//!   them; read them back with `get_error()` / `Record::error()`
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use sqlrow::prelude::*;
//!
//! let driver = Arc::new(SqliteDriver::new(DriverConfig::default().prefix("blog_")));
//! driver.execute(
//!     "CREATE TABLE blog_posts (id INTEGER PRIMARY KEY, title TEXT, views INTEGER DEFAULT 0)",
//!     &[],
//! );
//!
//! let posts = Record::new(Table::new("posts", "blog_"), driver);
//! let id = posts.add(&FieldMap::new().set("title", "first"));
//! posts.update_one("views", Condition::raw(format!("id = {id}")), 1, &[]);
//!
//! let rows = posts.find(
//!     &Clause::new().filter("views > ?").order_by("id desc").limit(10),
//!     vec!["id", "title"],
//!     &params![0],
//! );
//! assert_eq!(rows.len(), 1);
//! assert_eq!(posts.count("", &[]), Some(1));
//! ```

pub mod builder;
pub mod condition;
pub mod config;
pub mod driver;
pub mod error;
pub mod ident;
pub mod monitor;
pub mod prelude;
pub mod record;
pub mod row;
pub mod table;
pub mod value;

pub use builder::{Clause, ClauseKind, FieldItem, Fields, Join, JoinKind, Limit, Order, OrderItem};
pub use condition::{Condition, ConditionItem, Connective};
pub use config::DriverConfig;
pub use driver::{Connect, ConnectionState, Driver, SqliteDriver, Statement};
pub use error::{OrmError, OrmResult};
pub use ident::Ident;
pub use monitor::SqlLogger;
pub use record::{FieldMap, IntoId, Record, UpdateTarget, int_cast};
pub use row::{FromRow, Row};
pub use table::Table;
pub use value::{BindType, FromValue, Value};
