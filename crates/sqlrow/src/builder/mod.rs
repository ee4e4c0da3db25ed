//! SQL assembly.
//!
//! The clause sequencer and field projector turn typed descriptors into SQL
//! text. Nothing here is executed; [`crate::Record`] composes these with a
//! [`crate::Driver`].
//!
//! ## Design
//!
//! - SQL stays explicit: predicates, join conditions and field expressions
//!   are caller-supplied fragments.
//! - Clause kinds are a closed enum walked in a fixed order, so the output
//!   never depends on how a descriptor was built.
//! - Placeholders are plain `?`; the parameter list is carried separately.

pub mod clause;
pub mod fields;

pub use clause::{
    Clause, ClauseKind, Join, JoinKind, Limit, Order, OrderItem, group_clause, join_clause,
    limit_clause, offset_clause, order_clause, where_clause,
};
pub use fields::{FieldItem, Fields};

#[cfg(test)]
mod tests;
