//! Scalar values bound to `?` placeholders and read back out of rows.

use crate::error::{OrmError, OrmResult};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Serialize, Serializer};

/// Text layout used for date/time values, both when binding and decoding.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// A scalar or null value.
///
/// Parameter lists are plain `Vec<Value>` / `&[Value]`, bound positionally.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Blob(Vec<u8>),
}

/// The bind class a parameter is given when a statement is prepared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindType {
    Null,
    Bool,
    Int,
    Str,
}

impl BindType {
    /// Infer the bind class of a value.
    ///
    /// Tested in priority order null, boolean, integer; everything else
    /// (floats, text, blobs) binds as a string.
    pub fn infer(value: &Value) -> Self {
        if value.is_null() {
            BindType::Null
        } else if matches!(value, Value::Bool(_)) {
            BindType::Bool
        } else if matches!(value, Value::Int(_)) {
            BindType::Int
        } else {
            BindType::Str
        }
    }
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn bind_type(&self) -> BindType {
        BindType::infer(self)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Bool(b) => Some(i64::from(*b)),
            Value::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            #[allow(clippy::cast_precision_loss)]
            Value::Int(i) => Some(*i as f64),
            Value::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Build a value from a JSON scalar.
    ///
    /// Arrays and objects are not scalars; they are stored as their JSON text.
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map_or(Value::Null, Value::Float),
            },
            serde_json::Value::String(s) => Value::Text(s.clone()),
            other => Value::Text(other.to_string()),
        }
    }

    /// Render this value as JSON.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::from(*i),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Value::Text(s) => serde_json::Value::String(s.clone()),
            Value::Blob(b) => {
                serde_json::Value::Array(b.iter().map(|byte| serde_json::Value::from(*byte)).collect())
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Blob(b) => serializer.serialize_bytes(b),
        }
    }
}

macro_rules! value_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Int(i64::from(v))
                }
            }
        )*
    };
}

value_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        i64::try_from(v).map_or_else(|_| Value::Text(v.to_string()), Value::Int)
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        i64::try_from(v).map_or_else(|_| Value::Text(v.to_string()), Value::Int)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Blob(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::Text(v.format(DATETIME_FORMAT).to_string())
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Text(v.format(DATE_FORMAT).to_string())
    }
}

impl<Tz: chrono::TimeZone> From<chrono::DateTime<Tz>> for Value {
    fn from(v: chrono::DateTime<Tz>) -> Self {
        Value::from(v.naive_utc())
    }
}

impl From<uuid::Uuid> for Value {
    fn from(v: uuid::Uuid) -> Self {
        Value::Text(v.hyphenated().to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// Build a parameter list from heterogeneous values.
///
/// ```
/// use sqlrow::{params, Value};
///
/// let p = params![5, "x", None::<i64>];
/// assert_eq!(p, vec![Value::Int(5), Value::Text("x".into()), Value::Null]);
/// ```
#[macro_export]
macro_rules! params {
    () => {
        ::std::vec::Vec::<$crate::Value>::new()
    };
    ($($v:expr),+ $(,)?) => {
        vec![$($crate::Value::from($v)),+]
    };
}

/// Decode a [`Value`] into a Rust type.
pub trait FromValue: Sized {
    fn from_value(column: &str, value: &Value) -> OrmResult<Self>;
}

fn mismatch(column: &str, expected: &str, value: &Value) -> OrmError {
    OrmError::decode(column, format!("expected {expected}, got {value:?}"))
}

impl FromValue for Value {
    fn from_value(_column: &str, value: &Value) -> OrmResult<Self> {
        Ok(value.clone())
    }
}

impl FromValue for i64 {
    fn from_value(column: &str, value: &Value) -> OrmResult<Self> {
        value.as_i64().ok_or_else(|| mismatch(column, "integer", value))
    }
}

impl FromValue for i32 {
    fn from_value(column: &str, value: &Value) -> OrmResult<Self> {
        let wide = i64::from_value(column, value)?;
        i32::try_from(wide).map_err(|e| OrmError::decode(column, e.to_string()))
    }
}

impl FromValue for u64 {
    fn from_value(column: &str, value: &Value) -> OrmResult<Self> {
        let wide = i64::from_value(column, value)?;
        u64::try_from(wide).map_err(|e| OrmError::decode(column, e.to_string()))
    }
}

impl FromValue for f64 {
    fn from_value(column: &str, value: &Value) -> OrmResult<Self> {
        value.as_f64().ok_or_else(|| mismatch(column, "number", value))
    }
}

impl FromValue for bool {
    fn from_value(column: &str, value: &Value) -> OrmResult<Self> {
        match value {
            Value::Bool(b) => Ok(*b),
            Value::Int(i) => Ok(*i != 0),
            _ => Err(mismatch(column, "boolean", value)),
        }
    }
}

impl FromValue for String {
    fn from_value(column: &str, value: &Value) -> OrmResult<Self> {
        match value {
            Value::Text(s) => Ok(s.clone()),
            Value::Int(i) => Ok(i.to_string()),
            Value::Float(f) => Ok(f.to_string()),
            _ => Err(mismatch(column, "text", value)),
        }
    }
}

impl FromValue for Vec<u8> {
    fn from_value(column: &str, value: &Value) -> OrmResult<Self> {
        match value {
            Value::Blob(b) => Ok(b.clone()),
            Value::Text(s) => Ok(s.as_bytes().to_vec()),
            _ => Err(mismatch(column, "blob", value)),
        }
    }
}

impl FromValue for NaiveDateTime {
    fn from_value(column: &str, value: &Value) -> OrmResult<Self> {
        let text = value
            .as_str()
            .ok_or_else(|| mismatch(column, "datetime text", value))?;
        NaiveDateTime::parse_from_str(text, DATETIME_FORMAT)
            .map_err(|e| OrmError::decode(column, e.to_string()))
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(column: &str, value: &Value) -> OrmResult<Self> {
        if value.is_null() {
            Ok(None)
        } else {
            T::from_value(column, value).map(Some)
        }
    }
}
