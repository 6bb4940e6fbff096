//! SQLite dialect
//!
//! Inherits the default backtick quoting and limit/offset pagination;
//! only the DSN differs, pointing at a file path or `:memory:`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Dialect, Pagination};

/// SQLite connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SqliteConfig {
    /// Database file path; in-memory database when left empty
    pub path: String,
    /// Use the legacy `sqlite2:` DSN prefix
    pub sqlite2: bool,
    pub options: Vec<(String, Value)>,
    pub commands: Vec<String>,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            path: String::new(),
            sqlite2: false,
            options: Vec::new(),
            commands: Vec::new(),
        }
    }
}

impl Dialect {
    /// SQLite dialect from connection configuration
    pub fn sqlite(config: SqliteConfig) -> Self {
        let path = if config.path.is_empty() {
            ":memory:"
        } else {
            config.path.as_str()
        };
        let prefix = if config.sqlite2 { "sqlite2" } else { "sqlite" };
        Dialect {
            name: "sqlite",
            quote_open: '`',
            quote_close: '`',
            pagination: Pagination::LimitOffset,
            dsn: format!("{}:{}", prefix, path),
            username: None,
            password: None,
            options: config.options,
            commands: config.commands,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dsn_defaults_to_memory() {
        let dialect = Dialect::sqlite(SqliteConfig::default());
        assert_eq!(dialect.dsn(), "sqlite::memory:");
    }

    #[test]
    fn test_dsn_with_file_path() {
        let dialect = Dialect::sqlite(SqliteConfig {
            path: "/var/db/app.db".to_string(),
            ..SqliteConfig::default()
        });
        assert_eq!(dialect.dsn(), "sqlite:/var/db/app.db");
    }
}
