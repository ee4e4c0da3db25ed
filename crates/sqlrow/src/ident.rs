//! Backtick-quoted SQL identifiers.
//!
//! [`Ident`] represents a column (optionally qualified, `table.column`) as it
//! appears in INSERT/UPDATE column lists. Every part is rendered inside
//! backticks.
//!
//! - Bare parts are validated against: `[A-Za-z_][A-Za-z0-9_$]*`
//! - Backtick-quoted parts allow any characters except NUL; a literal
//!   backtick is written as two.
//!
//! # Example
//! ```
//! use sqlrow::Ident;
//!
//! assert_eq!(Ident::parse("views")?.to_sql(), "`views`");
//! assert_eq!(Ident::parse("p.title")?.to_sql(), "`p`.`title`");
//! # Ok::<(), sqlrow::OrmError>(())
//! ```

use crate::error::{OrmError, OrmResult};

/// A column or table identifier made of one or more dotted parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub parts: Vec<String>,
}

impl Ident {
    /// Parse an identifier, supporting dotted and backtick-quoted forms.
    ///
    /// - Dotted: `posts.title`
    /// - Quoted: `` `order`.`group` ``
    /// - Mixed: ``posts.`weird name` ``
    pub fn parse(s: &str) -> OrmResult<Self> {
        if s.is_empty() {
            return Err(OrmError::validation("Identifier cannot be empty"));
        }
        if s.contains('\0') {
            return Err(OrmError::validation(
                "Identifier cannot contain NUL character",
            ));
        }

        let mut parts = Vec::new();
        let mut chars = s.chars().peekable();

        while chars.peek().is_some() {
            if !parts.is_empty() {
                match chars.next() {
                    Some('.') => {
                        if chars.peek().is_none() {
                            return Err(OrmError::validation("Trailing '.' in identifier"));
                        }
                    }
                    Some(c) => {
                        return Err(OrmError::validation(format!(
                            "Expected '.' between identifier parts, got '{c}'"
                        )));
                    }
                    None => break,
                }
            }

            if chars.peek() == Some(&'`') {
                chars.next();
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('`') => {
                            if chars.peek() == Some(&'`') {
                                chars.next();
                                name.push('`');
                            } else {
                                break;
                            }
                        }
                        Some(c) => name.push(c),
                        None => return Err(OrmError::validation("Unclosed quoted identifier")),
                    }
                }
                if name.is_empty() {
                    return Err(OrmError::validation("Empty quoted identifier"));
                }
                parts.push(name);
                continue;
            }

            let mut name = String::new();
            while let Some(&c) = chars.peek() {
                if c == '.' {
                    break;
                }
                let ok = if name.is_empty() {
                    c == '_' || c.is_ascii_alphabetic()
                } else {
                    c == '_' || c == '$' || c.is_ascii_alphanumeric()
                };
                if !ok {
                    return Err(OrmError::validation(format!(
                        "Invalid character in identifier '{s}': '{c}'"
                    )));
                }
                name.push(c);
                chars.next();
            }
            if name.is_empty() {
                return Err(OrmError::validation("Empty identifier segment"));
            }
            parts.push(name);
        }

        Ok(Self { parts })
    }

    /// Render the identifier with every part backtick-quoted.
    pub fn to_sql(&self) -> String {
        let cap = self.parts.iter().map(|p| p.len() + 3).sum();
        let mut out = String::with_capacity(cap);
        self.write_sql(&mut out);
        out
    }

    pub(crate) fn write_sql(&self, out: &mut String) {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            out.push('`');
            for ch in part.chars() {
                if ch == '`' {
                    out.push_str("``");
                } else {
                    out.push(ch);
                }
            }
            out.push('`');
        }
    }
}

/// Quote a comma-separated column list: `` `a`,`b`,`c` ``.
pub(crate) fn quote_columns<'a, I>(columns: I) -> OrmResult<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out = String::new();
    for (i, col) in columns.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        Ident::parse(col)?.write_sql(&mut out);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ident_simple() {
        assert_eq!(Ident::parse("users").unwrap().to_sql(), "`users`");
    }

    #[test]
    fn ident_dotted() {
        assert_eq!(Ident::parse("p.title").unwrap().to_sql(), "`p`.`title`");
    }

    #[test]
    fn ident_quoted_with_escape() {
        let ident = Ident::parse("`has``tick`").unwrap();
        assert_eq!(ident.parts, vec!["has`tick".to_string()]);
        assert_eq!(ident.to_sql(), "`has``tick`");
    }

    #[test]
    fn ident_quoted_reserved_word() {
        assert_eq!(Ident::parse("`order`").unwrap().to_sql(), "`order`");
    }

    #[test]
    fn ident_with_dollar() {
        assert_eq!(Ident::parse("my_var$1").unwrap().to_sql(), "`my_var$1`");
    }

    #[test]
    fn ident_rejects_unsafe() {
        assert!(Ident::parse("").is_err());
        assert!(Ident::parse("1col").is_err());
        assert!(Ident::parse("my col").is_err());
        assert!(Ident::parse("a..b").is_err());
        assert!(Ident::parse("a.").is_err());
        assert!(Ident::parse("`unclosed").is_err());
        assert!(Ident::parse("name`; DROP TABLE x; --").is_err());
    }

    #[test]
    fn quote_columns_joins_with_commas() {
        assert_eq!(
            quote_columns(["name", "views"]).unwrap(),
            "`name`,`views`"
        );
        assert!(quote_columns(["ok", "not ok"]).is_err());
    }
}
