//! Condition descriptors and the condition compiler.
//!
//! A [`Condition`] is either a raw predicate passed through verbatim or an
//! ordered list of fragments, each joined to the previous one with `AND` or
//! `OR`. [`Condition::compile`] flattens it into the text that follows a
//! `WHERE` / `HAVING` keyword.
//!
//! ```
//! use sqlrow::Condition;
//!
//! let c = Condition::new().and("status = 1").or("author_id = ?");
//! assert_eq!(c.compile(), "status = 1 OR author_id = ?");
//! assert_eq!(Condition::from("a=1").compile(), "a=1");
//! ```

use crate::error::{OrmError, OrmResult};

/// How a fragment attaches to the predicate built so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Connective {
    And,
    Or,
    /// Any other connective text. Fragments carrying it are dropped when
    /// compiled rather than reported.
    Other(String),
}

impl Connective {
    fn keyword(&self) -> Option<&'static str> {
        match self {
            Connective::And => Some("AND"),
            Connective::Or => Some("OR"),
            Connective::Other(_) => None,
        }
    }
}

impl From<&str> for Connective {
    fn from(s: &str) -> Self {
        match s {
            "and" => Connective::And,
            "or" => Connective::Or,
            other => Connective::Other(other.to_string()),
        }
    }
}

/// One entry of an item-list condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionItem {
    /// A bare fragment, always joined with `AND`.
    Fragment(String),
    /// A fragment with an explicit connective.
    Pair(String, Connective),
}

impl ConditionItem {
    fn parts(&self) -> (&str, Option<&'static str>) {
        match self {
            ConditionItem::Fragment(text) => (text, Some("AND")),
            ConditionItem::Pair(text, connective) => (text, connective.keyword()),
        }
    }
}

/// A condition descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// Raw predicate, returned unchanged by [`Condition::compile`].
    ///
    /// The caller is responsible for its validity.
    Raw(String),
    /// Ordered fragments.
    Items(Vec<ConditionItem>),
}

impl Default for Condition {
    fn default() -> Self {
        Condition::Items(Vec::new())
    }
}

impl Condition {
    /// An empty item list.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(sql: impl Into<String>) -> Self {
        Condition::Raw(sql.into())
    }

    /// Append a fragment joined with `AND`.
    pub fn and(self, fragment: impl Into<String>) -> Self {
        self.push(ConditionItem::Pair(fragment.into(), Connective::And))
    }

    /// Append a fragment joined with `OR`.
    pub fn or(self, fragment: impl Into<String>) -> Self {
        self.push(ConditionItem::Pair(fragment.into(), Connective::Or))
    }

    /// Append a fragment with a connective given as text (`"and"` / `"or"`).
    pub fn with(self, fragment: impl Into<String>, connective: &str) -> Self {
        self.push(ConditionItem::Pair(fragment.into(), connective.into()))
    }

    /// Append an item. A raw condition becomes the first fragment of the list.
    pub fn push(self, item: ConditionItem) -> Self {
        let mut items = match self {
            Condition::Raw(sql) if sql.is_empty() => Vec::new(),
            Condition::Raw(sql) => vec![ConditionItem::Fragment(sql)],
            Condition::Items(items) => items,
        };
        items.push(item);
        Condition::Items(items)
    }

    /// Whether compiling yields an empty predicate.
    pub fn is_empty(&self) -> bool {
        self.compile().is_empty()
    }

    /// Flatten into predicate text.
    ///
    /// Each contributing item renders as `" <AND|OR> <text>"`, the first one
    /// always as `AND`. The leading `" AND"` is then stripped by width and
    /// the separating space trimmed. Items whose connective is neither `and`
    /// nor `or` contribute nothing.
    pub fn compile(&self) -> String {
        let items = match self {
            Condition::Raw(sql) => return sql.clone(),
            Condition::Items(items) => items,
        };

        let mut out = String::new();
        for (text, keyword) in items.iter().map(ConditionItem::parts) {
            let Some(keyword) = keyword else {
                continue;
            };
            let keyword = if out.is_empty() { "AND" } else { keyword };
            out.push(' ');
            out.push_str(keyword);
            out.push(' ');
            out.push_str(text);
        }

        match out.get(4..) {
            Some(rest) => rest.trim_start().to_string(),
            None => String::new(),
        }
    }

    /// Parse a condition handed over as JSON.
    ///
    /// - string → [`Condition::Raw`]
    /// - array of strings and/or `[text, connective]` pairs → [`Condition::Items`]
    /// - null → empty
    pub fn from_json(value: &serde_json::Value) -> OrmResult<Self> {
        match value {
            serde_json::Value::Null => Ok(Condition::new()),
            serde_json::Value::String(s) => Ok(Condition::Raw(s.clone())),
            serde_json::Value::Array(entries) => entries
                .iter()
                .map(item_from_json)
                .collect::<OrmResult<Vec<_>>>()
                .map(Condition::Items),
            other => Err(OrmError::validation(format!(
                "condition must be a string or an array, got {other}"
            ))),
        }
    }
}

fn item_from_json(value: &serde_json::Value) -> OrmResult<ConditionItem> {
    match value {
        serde_json::Value::String(s) => Ok(ConditionItem::Fragment(s.clone())),
        serde_json::Value::Array(pair) => match pair.as_slice() {
            [serde_json::Value::String(text), serde_json::Value::String(conn)] => Ok(
                ConditionItem::Pair(text.clone(), Connective::from(conn.as_str())),
            ),
            [serde_json::Value::String(text)] => Ok(ConditionItem::Fragment(text.clone())),
            _ => Err(OrmError::validation(format!(
                "condition pair must be [text, connective], got {value}"
            ))),
        },
        other => Err(OrmError::validation(format!(
            "condition item must be a string or a pair, got {other}"
        ))),
    }
}

impl From<&str> for Condition {
    fn from(s: &str) -> Self {
        Condition::Raw(s.to_string())
    }
}

impl From<String> for Condition {
    fn from(s: String) -> Self {
        Condition::Raw(s)
    }
}

impl From<&String> for Condition {
    fn from(s: &String) -> Self {
        Condition::Raw(s.clone())
    }
}

impl From<Vec<&str>> for Condition {
    fn from(items: Vec<&str>) -> Self {
        Condition::Items(
            items
                .into_iter()
                .map(|s| ConditionItem::Fragment(s.to_string()))
                .collect(),
        )
    }
}

impl From<Vec<(&str, &str)>> for Condition {
    fn from(items: Vec<(&str, &str)>) -> Self {
        Condition::Items(
            items
                .into_iter()
                .map(|(text, conn)| ConditionItem::Pair(text.to_string(), conn.into()))
                .collect(),
        )
    }
}

impl From<Vec<ConditionItem>> for Condition {
    fn from(items: Vec<ConditionItem>) -> Self {
        Condition::Items(items)
    }
}

impl From<&Condition> for Condition {
    fn from(c: &Condition) -> Self {
        c.clone()
    }
}
