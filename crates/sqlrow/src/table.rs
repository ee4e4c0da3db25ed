/// Table handle: a logical table name plus the configured prefix.
///
/// Prefixing is idempotent: a name that already carries the prefix is used
/// as is.
///
/// # Example
///
/// ```
/// use sqlrow::Table;
///
/// let posts = Table::new("posts", "blog_");
/// assert_eq!(posts.qualified(), "blog_posts");
/// assert_eq!(Table::new("blog_posts", "blog_").qualified(), "blog_posts");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    name: String,
    prefix: String,
}

impl Table {
    pub fn new(name: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prefix: prefix.into(),
        }
    }

    /// A table with no prefix.
    pub fn bare(name: impl Into<String>) -> Self {
        Self::new(name, "")
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The physical table name.
    pub fn qualified(&self) -> String {
        prefixed(&self.prefix, &self.name)
    }
}

/// Prepend `prefix` to `name` unless it is already there.
pub fn prefixed(prefix: &str, name: &str) -> String {
    if prefix.is_empty() || name.starts_with(prefix) {
        name.to_string()
    } else {
        format!("{prefix}{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_is_applied_once() {
        let t = Table::new("users", "app_");
        assert_eq!(t.qualified(), "app_users");
        let again = Table::new(t.qualified(), "app_");
        assert_eq!(again.qualified(), "app_users");
    }

    #[test]
    fn empty_prefix_is_noop() {
        assert_eq!(Table::bare("users").qualified(), "users");
        assert_eq!(prefixed("", "x"), "x");
    }

    #[test]
    fn join_alias_keeps_suffix() {
        assert_eq!(prefixed("app_", "users u"), "app_users u");
    }
}
