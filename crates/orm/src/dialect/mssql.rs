//! MSSQL dialect
//!
//! Double-quote identifier quoting and offset-fetch pagination: `TOP n`
//! on the select list when no order clause is involved, otherwise
//! `OFFSET m ROWS FETCH NEXT n ROWS ONLY`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Dialect, Pagination};

/// MSSQL connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MssqlConfig {
    pub host: String,
    pub port: u16,
    pub dbname: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub options: Vec<(String, Value)>,
    pub commands: Vec<String>,
}

impl Default for MssqlConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 1433,
            dbname: String::new(),
            username: None,
            password: None,
            options: Vec::new(),
            commands: Vec::new(),
        }
    }
}

impl Dialect {
    /// MSSQL dialect from connection configuration
    pub fn mssql(config: MssqlConfig) -> Self {
        let dsn = format!(
            "sqlsrv:Server={},{};Database={}",
            config.host, config.port, config.dbname
        );
        Dialect {
            name: "mssql",
            quote_open: '"',
            quote_close: '"',
            pagination: Pagination::OffsetFetch,
            dsn,
            username: config.username,
            password: config.password,
            options: config.options,
            commands: config.commands,
        }
    }
}
