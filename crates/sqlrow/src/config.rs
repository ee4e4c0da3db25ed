//! Driver configuration.
//!
//! A [`DriverConfig`] is consumed once, when a connection handle is created.
//! It can be built in code, read from TOML, or read from `DB_*` environment
//! variables (after loading a `.env` file, if one exists).
//!
//! ```
//! use sqlrow::DriverConfig;
//!
//! let config = DriverConfig::from_toml_str(
//!     r#"
//!     [database]
//!     database = ":memory:"
//!     prefix = "blog_"
//!     "#,
//! )?;
//! assert_eq!(config.prefix, "blog_");
//! assert_eq!(config.port, 3306);
//! # Ok::<(), sqlrow::OrmError>(())
//! ```

use crate::error::{OrmError, OrmResult};
use serde::Deserialize;
use std::fmt;
use std::path::Path;

/// Connection settings: `{host, port, database, user, password, prefix, encoding}`.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    pub host: String,
    pub port: u16,
    /// Database name; for file-backed engines, the file path (`:memory:` for
    /// a private in-memory database).
    pub database: String,
    pub user: String,
    pub password: String,
    /// Table prefix applied by record facades.
    pub prefix: String,
    pub encoding: String,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3306,
            database: ":memory:".to_string(),
            user: String::new(),
            password: String::new(),
            prefix: String::new(),
            encoding: "utf8".to_string(),
        }
    }
}

impl fmt::Debug for DriverConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriverConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &if self.password.is_empty() { "" } else { "***" })
            .field("prefix", &self.prefix)
            .field("encoding", &self.encoding)
            .finish()
    }
}

#[derive(Deserialize)]
struct ConfigFile {
    database: DriverConfig,
}

impl DriverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// A config pointing at `database` with every other setting defaulted.
    pub fn database(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            ..Self::default()
        }
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn credentials(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.user = user.into();
        self.password = password.into();
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = encoding.into();
        self
    }

    /// Parse TOML: either a top-level table of settings or a `[database]` table.
    pub fn from_toml_str(raw: &str) -> OrmResult<Self> {
        let doc: toml::Table = toml::from_str(raw)?;
        if doc.contains_key("database") && doc["database"].is_table() {
            let file: ConfigFile = toml::from_str(raw)?;
            return Ok(file.database);
        }
        Ok(toml::from_str(raw)?)
    }

    /// Read and parse a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> OrmResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            OrmError::config(format!("failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&raw).map_err(|e| {
            OrmError::config(format!("failed to parse config file {}: {e}", path.display()))
        })
    }

    /// Build from `DB_HOST`, `DB_PORT`, `DB_DATABASE`, `DB_USER`,
    /// `DB_PASSWORD`, `DB_PREFIX`, `DB_ENCODING`.
    ///
    /// A `.env` file in the working directory (or a parent) is loaded first;
    /// unset variables keep their defaults.
    pub fn from_env() -> OrmResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> OrmResult<Self> {
        let mut config = Self::default();
        if let Some(v) = lookup("DB_HOST") {
            config.host = v;
        }
        if let Some(v) = lookup("DB_PORT") {
            config.port = v
                .trim()
                .parse()
                .map_err(|e| OrmError::config(format!("DB_PORT '{v}': {e}")))?;
        }
        if let Some(v) = lookup("DB_DATABASE") {
            config.database = v;
        }
        if let Some(v) = lookup("DB_USER") {
            config.user = v;
        }
        if let Some(v) = lookup("DB_PASSWORD") {
            config.password = v;
        }
        if let Some(v) = lookup("DB_PREFIX") {
            config.prefix = v;
        }
        if let Some(v) = lookup("DB_ENCODING") {
            config.encoding = v;
        }
        Ok(config)
    }
}
