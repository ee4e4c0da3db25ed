use crate::error::{OrmError, OrmResult};

/// One projected expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldItem {
    /// Passed through as is.
    Expr(String),
    /// Rendered as `expr AS alias`.
    Aliased { alias: String, expr: String },
}

/// Field descriptor for SELECT / aggregate column lists.
///
/// Expressions are not quoted or escaped; they are SQL fragments supplied by
/// the caller.
///
/// ```
/// use sqlrow::Fields;
///
/// assert_eq!(Fields::all().project(), "*");
/// assert_eq!(Fields::from(vec!["id", "title"]).project(), "id,title");
/// assert_eq!(
///     Fields::new().alias("count", "COUNT(id)").project(),
///     "COUNT(id) AS count"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields {
    items: Vec<FieldItem>,
}

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty descriptor, projected as `*`.
    pub fn all() -> Self {
        Self::default()
    }

    /// Append a bare expression.
    pub fn expr(mut self, expr: impl Into<String>) -> Self {
        self.items.push(FieldItem::Expr(expr.into()));
        self
    }

    /// Append `expr AS alias`.
    pub fn alias(mut self, alias: impl Into<String>, expr: impl Into<String>) -> Self {
        self.items.push(FieldItem::Aliased {
            alias: alias.into(),
            expr: expr.into(),
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[FieldItem] {
        &self.items
    }

    /// Render the field list.
    pub fn project(&self) -> String {
        if self.items.is_empty() {
            return "*".to_string();
        }
        self.items
            .iter()
            .map(|item| match item {
                FieldItem::Expr(expr) => expr.clone(),
                FieldItem::Aliased { alias, expr } => format!("{expr} AS {alias}"),
            })
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Parse a field descriptor handed over as JSON.
    ///
    /// Accepts null / empty (→ `*`), a single string, an array of strings, or
    /// an object of `alias → expr`. Object keys that are plain non-negative
    /// integers are positional and pass the expression through bare, so
    /// positional and aliased entries can be mixed.
    pub fn from_json(value: &serde_json::Value) -> OrmResult<Self> {
        let as_expr = |key: &str, v: &serde_json::Value| -> OrmResult<String> {
            v.as_str().map(str::to_string).ok_or_else(|| {
                OrmError::validation(format!("field '{key}' must be a string expression, got {v}"))
            })
        };

        match value {
            serde_json::Value::Null => Ok(Self::default()),
            serde_json::Value::String(s) => Ok(Self::default().expr(s.clone())),
            serde_json::Value::Array(list) => {
                let mut fields = Self::default();
                for (i, v) in list.iter().enumerate() {
                    fields = fields.expr(as_expr(&i.to_string(), v)?);
                }
                Ok(fields)
            }
            serde_json::Value::Object(map) => {
                let mut fields = Self::default();
                for (key, v) in map {
                    let expr = as_expr(key, v)?;
                    fields = if key.parse::<u64>().is_ok() {
                        fields.expr(expr)
                    } else {
                        fields.alias(key.clone(), expr)
                    };
                }
                Ok(fields)
            }
            other => Err(OrmError::validation(format!(
                "fields must be a string, array or object, got {other}"
            ))),
        }
    }
}

impl From<&str> for Fields {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            Self::default()
        } else {
            Self::default().expr(s)
        }
    }
}

impl From<Vec<&str>> for Fields {
    fn from(items: Vec<&str>) -> Self {
        Self {
            items: items
                .into_iter()
                .map(|s| FieldItem::Expr(s.to_string()))
                .collect(),
        }
    }
}

impl From<Vec<(&str, &str)>> for Fields {
    /// `(alias, expr)` pairs.
    fn from(items: Vec<(&str, &str)>) -> Self {
        items
            .into_iter()
            .fold(Self::default(), |f, (alias, expr)| f.alias(alias, expr))
    }
}

impl From<Vec<FieldItem>> for Fields {
    fn from(items: Vec<FieldItem>) -> Self {
        Self { items }
    }
}

impl From<&Fields> for Fields {
    fn from(f: &Fields) -> Self {
        f.clone()
    }
}
