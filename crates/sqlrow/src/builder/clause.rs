use crate::condition::Condition;
use crate::error::{OrmError, OrmResult};
use crate::table::prefixed;

/// The clause kinds a [`Clause`] can carry, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClauseKind {
    JoinLeft,
    JoinInner,
    JoinRight,
    Where,
    Group,
    Having,
    Order,
    Limit,
    Offset,
}

impl ClauseKind {
    /// Fixed evaluation order used by [`Clause::assemble`].
    pub const ALL: [ClauseKind; 9] = [
        ClauseKind::JoinLeft,
        ClauseKind::JoinInner,
        ClauseKind::JoinRight,
        ClauseKind::Where,
        ClauseKind::Group,
        ClauseKind::Having,
        ClauseKind::Order,
        ClauseKind::Limit,
        ClauseKind::Offset,
    ];

    /// Descriptor key for this kind (`join-left`, `where`, ...).
    pub fn key(self) -> &'static str {
        match self {
            ClauseKind::JoinLeft => "join-left",
            ClauseKind::JoinInner => "join-inner",
            ClauseKind::JoinRight => "join-right",
            ClauseKind::Where => "where",
            ClauseKind::Group => "group",
            ClauseKind::Having => "having",
            ClauseKind::Order => "order",
            ClauseKind::Limit => "limit",
            ClauseKind::Offset => "offset",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }
}

/// Join direction, matching the originating clause key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Left,
    Inner,
    Right,
}

impl JoinKind {
    pub fn keyword(self) -> &'static str {
        match self {
            JoinKind::Left => "LEFT",
            JoinKind::Inner => "INNER",
            JoinKind::Right => "RIGHT",
        }
    }
}

/// `(table, on-predicate)` for one JOIN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    pub table: String,
    pub on: String,
}

impl Join {
    pub fn new(table: impl Into<String>, on: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            on: on.into(),
        }
    }
}

/// One ORDER BY entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderItem {
    /// Column with the database's default direction.
    Column(String),
    /// Column with an explicit direction; the direction is upper-cased.
    Directed(String, String),
}

/// ORDER BY descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Order {
    Raw(String),
    Items(Vec<OrderItem>),
}

impl Order {
    pub fn is_empty(&self) -> bool {
        match self {
            Order::Raw(s) => s.is_empty(),
            Order::Items(items) => items.is_empty(),
        }
    }
}

impl From<&str> for Order {
    fn from(s: &str) -> Self {
        Order::Raw(s.to_string())
    }
}

impl From<String> for Order {
    fn from(s: String) -> Self {
        Order::Raw(s)
    }
}

impl From<Vec<OrderItem>> for Order {
    fn from(items: Vec<OrderItem>) -> Self {
        Order::Items(items)
    }
}

/// LIMIT descriptor.
///
/// The two-value form is positional: `Range(first, second)` renders as
/// `LIMIT first,second`, which the dialect reads as offset then count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    Count(u64),
    Range(u64, u64),
}

impl From<u64> for Limit {
    fn from(n: u64) -> Self {
        Limit::Count(n)
    }
}

impl From<(u64, u64)> for Limit {
    fn from((first, second): (u64, u64)) -> Self {
        Limit::Range(first, second)
    }
}

/// Clause descriptor: everything after `FROM <table>`.
///
/// Fields are independent; [`Clause::assemble`] always emits them in the
/// order of [`ClauseKind::ALL`] regardless of how the clause was built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Clause {
    pub join_left: Vec<Join>,
    pub join_inner: Vec<Join>,
    pub join_right: Vec<Join>,
    pub where_: Option<Condition>,
    pub group: Vec<String>,
    pub having: Option<Condition>,
    pub order: Option<Order>,
    pub limit: Option<Limit>,
    pub offset: Option<u64>,
}

impl Clause {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn left_join(mut self, table: impl Into<String>, on: impl Into<String>) -> Self {
        self.join_left.push(Join::new(table, on));
        self
    }

    pub fn inner_join(mut self, table: impl Into<String>, on: impl Into<String>) -> Self {
        self.join_inner.push(Join::new(table, on));
        self
    }

    pub fn right_join(mut self, table: impl Into<String>, on: impl Into<String>) -> Self {
        self.join_right.push(Join::new(table, on));
        self
    }

    pub fn filter(mut self, condition: impl Into<Condition>) -> Self {
        self.where_ = Some(condition.into());
        self
    }

    pub fn group_by<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn having(mut self, condition: impl Into<Condition>) -> Self {
        self.having = Some(condition.into());
        self
    }

    pub fn order_by(mut self, order: impl Into<Order>) -> Self {
        self.order = Some(order.into());
        self
    }

    /// `LIMIT n`.
    pub fn limit(mut self, n: u64) -> Self {
        self.limit = Some(Limit::Count(n));
        self
    }

    /// `LIMIT first,second` (offset first, count second).
    pub fn limit_range(mut self, first: u64, second: u64) -> Self {
        self.limit = Some(Limit::Range(first, second));
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Render the fragment for one clause kind, or `None` when the kind is
    /// absent or empty.
    pub fn fragment(&self, kind: ClauseKind, prefix: &str) -> Option<String> {
        match kind {
            ClauseKind::JoinLeft => join_clauses(JoinKind::Left, &self.join_left, prefix),
            ClauseKind::JoinInner => join_clauses(JoinKind::Inner, &self.join_inner, prefix),
            ClauseKind::JoinRight => join_clauses(JoinKind::Right, &self.join_right, prefix),
            ClauseKind::Where => self.where_.as_ref().and_then(|c| where_clause("WHERE", c)),
            ClauseKind::Group => group_clause(&self.group),
            ClauseKind::Having => self.having.as_ref().and_then(|c| where_clause("HAVING", c)),
            ClauseKind::Order => self.order.as_ref().and_then(order_clause),
            ClauseKind::Limit => self.limit.map(limit_clause),
            ClauseKind::Offset => self.offset.map(offset_clause),
        }
    }

    /// Assemble the SQL tail: `" <fragment>"` per present kind, in fixed order.
    ///
    /// `prefix` is applied to joined table names.
    pub fn assemble(&self, prefix: &str) -> String {
        let mut sql = String::new();
        for kind in ClauseKind::ALL {
            if let Some(fragment) = self.fragment(kind, prefix) {
                sql.push(' ');
                sql.push_str(&fragment);
            }
        }
        sql
    }

    /// Parse a clause descriptor handed over as a JSON object.
    ///
    /// Recognized keys are those of [`ClauseKind::key`]; others are ignored.
    pub fn from_json(value: &serde_json::Value) -> OrmResult<Self> {
        let map = match value {
            serde_json::Value::Object(map) => map,
            serde_json::Value::Null => return Ok(Self::default()),
            other => {
                return Err(OrmError::validation(format!(
                    "clause must be an object, got {other}"
                )));
            }
        };

        let mut clause = Self::default();
        for (key, value) in map {
            let Some(kind) = ClauseKind::from_key(key) else {
                continue;
            };
            match kind {
                ClauseKind::JoinLeft => clause.join_left = joins_from_json(key, value)?,
                ClauseKind::JoinInner => clause.join_inner = joins_from_json(key, value)?,
                ClauseKind::JoinRight => clause.join_right = joins_from_json(key, value)?,
                ClauseKind::Where => clause.where_ = Some(Condition::from_json(value)?),
                ClauseKind::Group => clause.group = strings_from_json(key, value)?,
                ClauseKind::Having => clause.having = Some(Condition::from_json(value)?),
                ClauseKind::Order => clause.order = Some(order_from_json(value)?),
                ClauseKind::Limit => clause.limit = Some(limit_from_json(value)?),
                ClauseKind::Offset => clause.offset = Some(u64_from_json(key, value)?),
            }
        }
        Ok(clause)
    }
}

// ==================== Per-kind formatters ====================

/// `"<DIRECTION> JOIN <prefixed table> ON <predicate>"`.
pub fn join_clause(kind: JoinKind, join: &Join, prefix: &str) -> String {
    format!(
        "{} JOIN {} ON {}",
        kind.keyword(),
        prefixed(prefix, &join.table),
        join.on
    )
}

fn join_clauses(kind: JoinKind, joins: &[Join], prefix: &str) -> Option<String> {
    if joins.is_empty() {
        return None;
    }
    Some(
        joins
            .iter()
            .map(|j| join_clause(kind, j, prefix))
            .collect::<Vec<_>>()
            .join(" "),
    )
}

/// `"WHERE <predicate>"` / `"HAVING <predicate>"`; an empty predicate yields nothing.
pub fn where_clause(keyword: &str, condition: &Condition) -> Option<String> {
    let predicate = condition.compile();
    if predicate.is_empty() {
        None
    } else {
        Some(format!("{keyword} {predicate}"))
    }
}

pub fn group_clause(columns: &[String]) -> Option<String> {
    if columns.is_empty() {
        None
    } else {
        Some(format!("GROUP BY {}", columns.join(",")))
    }
}

pub fn order_clause(order: &Order) -> Option<String> {
    if order.is_empty() {
        return None;
    }
    match order {
        Order::Raw(s) => Some(format!("ORDER BY {s}")),
        Order::Items(items) => {
            let parts: Vec<String> = items
                .iter()
                .map(|item| match item {
                    OrderItem::Column(col) => col.clone(),
                    OrderItem::Directed(col, dir) => format!("{col} {}", dir.to_uppercase()),
                })
                .collect();
            Some(format!("ORDER BY {}", parts.join(",")))
        }
    }
}

pub fn limit_clause(limit: Limit) -> String {
    match limit {
        Limit::Count(n) => format!("LIMIT {n}"),
        Limit::Range(first, second) => format!("LIMIT {first},{second}"),
    }
}

pub fn offset_clause(offset: u64) -> String {
    format!("OFFSET {offset}")
}

// ==================== JSON helpers ====================

fn joins_from_json(key: &str, value: &serde_json::Value) -> OrmResult<Vec<Join>> {
    let pair = |v: &serde_json::Value| -> Option<Join> {
        match v.as_array()?.as_slice() {
            [serde_json::Value::String(t), serde_json::Value::String(on)] => {
                Some(Join::new(t.clone(), on.clone()))
            }
            _ => None,
        }
    };

    if let Some(join) = pair(value) {
        return Ok(vec![join]);
    }
    value
        .as_array()
        .and_then(|list| list.iter().map(pair).collect::<Option<Vec<_>>>())
        .ok_or_else(|| {
            OrmError::validation(format!(
                "'{key}' must be a [table, on] pair or a list of pairs, got {value}"
            ))
        })
}

fn strings_from_json(key: &str, value: &serde_json::Value) -> OrmResult<Vec<String>> {
    match value {
        serde_json::Value::String(s) => Ok(vec![s.clone()]),
        serde_json::Value::Array(list) => list
            .iter()
            .map(|v| {
                v.as_str().map(str::to_string).ok_or_else(|| {
                    OrmError::validation(format!("'{key}' entries must be strings, got {v}"))
                })
            })
            .collect(),
        other => Err(OrmError::validation(format!(
            "'{key}' must be a string or a list of strings, got {other}"
        ))),
    }
}

fn order_from_json(value: &serde_json::Value) -> OrmResult<Order> {
    match value {
        serde_json::Value::String(s) => Ok(Order::Raw(s.clone())),
        serde_json::Value::Array(list) => list
            .iter()
            .map(|v| match v {
                serde_json::Value::String(col) => Ok(OrderItem::Column(col.clone())),
                serde_json::Value::Array(pair) => match pair.as_slice() {
                    [serde_json::Value::String(col), serde_json::Value::String(dir)] => {
                        Ok(OrderItem::Directed(col.clone(), dir.clone()))
                    }
                    _ => Err(OrmError::validation(format!(
                        "order pair must be [column, direction], got {v}"
                    ))),
                },
                other => Err(OrmError::validation(format!(
                    "order item must be a column or a pair, got {other}"
                ))),
            })
            .collect::<OrmResult<Vec<_>>>()
            .map(Order::Items),
        other => Err(OrmError::validation(format!(
            "order must be a string or a list, got {other}"
        ))),
    }
}

fn limit_from_json(value: &serde_json::Value) -> OrmResult<Limit> {
    if let Some(list) = value.as_array() {
        return match list.as_slice() {
            [n] => Ok(Limit::Count(u64_from_json("limit", n)?)),
            [first, second] => Ok(Limit::Range(
                u64_from_json("limit", first)?,
                u64_from_json("limit", second)?,
            )),
            _ => Err(OrmError::validation(format!(
                "limit takes one or two values, got {value}"
            ))),
        };
    }
    u64_from_json("limit", value).map(Limit::Count)
}

fn u64_from_json(key: &str, value: &serde_json::Value) -> OrmResult<u64> {
    match value {
        serde_json::Value::Number(n) => n.as_u64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .ok_or_else(|| {
        OrmError::validation(format!("'{key}' must be a non-negative integer, got {value}"))
    })
}
