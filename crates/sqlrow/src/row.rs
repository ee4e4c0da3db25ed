//! Row materialization and row mapping traits

use crate::error::{OrmError, OrmResult};
use crate::value::{FromValue, Value};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// One materialized result row: an ordered column → value map.
///
/// Column order is the order the statement produced them in. Duplicate
/// column names are kept; lookups by name return the first match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    fields: Vec<(String, Value)>,
}

impl Row {
    pub fn new(fields: Vec<(String, Value)>) -> Self {
        Self { fields }
    }

    /// Build a row from `(column, value)` pairs.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Get a column value by name.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Get a column value by position.
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.fields.get(index).map(|(_, value)| value)
    }

    /// The first column's value, if the row has any columns.
    pub fn first(&self) -> Option<&Value> {
        self.get_index(0)
    }

    /// Decode a column into `T`.
    pub fn try_get<T: FromValue>(&self, column: &str) -> OrmResult<T> {
        let value = self
            .get(column)
            .ok_or_else(|| OrmError::decode(column, "no such column in row"))?;
        T::from_value(column, value)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn into_inner(self) -> Vec<(String, Value)> {
        self.fields
    }

    /// Render as a JSON object, keeping column order.
    pub fn to_json(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut map = serde_json::Map::with_capacity(self.fields.len());
        for (name, value) in &self.fields {
            map.entry(name.clone()).or_insert_with(|| value.to_json());
        }
        map
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'a> IntoIterator for &'a Row {
    type Item = &'a (String, Value);
    type IntoIter = std::slice::Iter<'a, (String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

/// Map a materialized [`Row`] into a caller type.
///
/// This is the "row object" side of the driver: `get_array` hands back
/// [`Row`]s, `get_object::<T>` hands back `T`s built through this trait.
///
/// # Example
///
/// ```
/// use sqlrow::{FromRow, OrmResult, Row};
///
/// struct Post {
///     id: i64,
///     title: String,
/// }
///
/// impl FromRow for Post {
///     fn from_row(row: &Row) -> OrmResult<Self> {
///         Ok(Post {
///             id: row.try_get("id")?,
///             title: row.try_get("title")?,
///         })
///     }
/// }
///
/// let row = Row::from_pairs([("id", sqlrow::Value::Int(1)), ("title", "hi".into())]);
/// let post = Post::from_row(&row).unwrap();
/// assert_eq!((post.id, post.title.as_str()), (1, "hi"));
/// ```
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> OrmResult<Self>;
}

impl FromRow for Row {
    fn from_row(row: &Row) -> OrmResult<Self> {
        Ok(row.clone())
    }
}

impl FromRow for serde_json::Map<String, serde_json::Value> {
    fn from_row(row: &Row) -> OrmResult<Self> {
        Ok(row.to_json())
    }
}

impl FromRow for serde_json::Value {
    fn from_row(row: &Row) -> OrmResult<Self> {
        Ok(serde_json::Value::Object(row.to_json()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Row {
        Row::from_pairs([
            ("id", Value::Int(7)),
            ("name", Value::from("x")),
            ("deleted_at", Value::Null),
        ])
    }

    #[test]
    fn lookup_by_name_and_position() {
        let row = sample();
        assert_eq!(row.get("name"), Some(&Value::from("x")));
        assert_eq!(row.first(), Some(&Value::Int(7)));
        assert_eq!(row.get("missing"), None);
        assert_eq!(row.columns().collect::<Vec<_>>(), ["id", "name", "deleted_at"]);
    }

    #[test]
    fn typed_access() {
        let row = sample();
        assert_eq!(row.try_get::<i64>("id").unwrap(), 7);
        assert_eq!(row.try_get::<Option<String>>("deleted_at").unwrap(), None);
        assert!(row.try_get::<i64>("missing").unwrap_err().is_decode());
    }

    #[test]
    fn json_object_keeps_column_order() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert_eq!(json, r#"{"id":7,"name":"x","deleted_at":null}"#);

        let obj = serde_json::Value::from_row(&sample()).unwrap();
        assert_eq!(obj["name"], "x");
    }
}
