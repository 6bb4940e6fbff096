//! MySQL dialect
//!
//! Backtick quoting, `LIMIT n OFFSET m` pagination. This is also the
//! default set of conventions SQLite inherits.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Dialect, Pagination};

/// MySQL connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MySqlConfig {
    pub host: String,
    pub port: u16,
    pub dbname: String,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Appended verbatim after the generated DSN segments
    pub dsn_suffix: String,
    pub options: Vec<(String, Value)>,
    pub commands: Vec<String>,
}

impl Default for MySqlConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3306,
            dbname: String::new(),
            username: None,
            password: None,
            dsn_suffix: String::new(),
            options: Vec::new(),
            commands: Vec::new(),
        }
    }
}

impl Dialect {
    /// MySQL dialect from connection configuration
    pub fn mysql(config: MySqlConfig) -> Self {
        // Port segment goes before any configured suffix.
        let dsn = format!(
            "mysql:host={};port={};dbname={}{}",
            config.host, config.port, config.dbname, config.dsn_suffix
        );
        Dialect {
            name: "mysql",
            quote_open: '`',
            quote_close: '`',
            pagination: Pagination::LimitOffset,
            dsn,
            username: config.username,
            password: config.password,
            options: config.options,
            commands: config.commands,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dsn_defaults() {
        let dialect = Dialect::mysql(MySqlConfig::default());
        assert_eq!(dialect.dsn(), "mysql:host=localhost;port=3306;dbname=");
    }

    #[test]
    fn test_dsn_port_precedes_suffix() {
        let dialect = Dialect::mysql(MySqlConfig {
            host: "db".to_string(),
            port: 3307,
            dbname: "app".to_string(),
            dsn_suffix: ";charset=utf8mb4".to_string(),
            ..MySqlConfig::default()
        });
        assert_eq!(
            dialect.dsn(),
            "mysql:host=db;port=3307;dbname=app;charset=utf8mb4"
        );
    }
}
