//! SQL dialect configuration
//!
//! A `Dialect` is a value object describing one SQL engine's conventions:
//! identifier quote pair, pagination strategy, and the DSN the executor
//! should connect with. The query compiler takes a `Dialect` at
//! construction; adding an engine with familiar pagination is a data
//! change, not a new compiler.

pub mod mssql;
pub mod mysql;
pub mod sqlite;

pub use mssql::MssqlConfig;
pub use mysql::MySqlConfig;
pub use sqlite::SqliteConfig;

use serde_json::Value;

/// Dialect configuration error types
#[derive(Debug, thiserror::Error)]
pub enum DialectError {
    #[error("Unknown database driver: {0}")]
    UnknownDriver(String),
}

/// How a dialect expresses limit/offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pagination {
    /// `LIMIT n OFFSET m` appended to the statement (MySQL, SQLite)
    LimitOffset,
    /// `TOP n` select prefix when possible, otherwise
    /// `OFFSET m ROWS FETCH NEXT n ROWS ONLY`, which requires an order
    /// clause (MSSQL)
    OffsetFetch,
}

/// One SQL engine's quoting, pagination and connection conventions
#[derive(Debug, Clone)]
pub struct Dialect {
    pub(crate) name: &'static str,
    pub(crate) quote_open: char,
    pub(crate) quote_close: char,
    pub(crate) pagination: Pagination,
    pub(crate) dsn: String,
    pub(crate) username: Option<String>,
    pub(crate) password: Option<String>,
    pub(crate) options: Vec<(String, Value)>,
    pub(crate) commands: Vec<String>,
}

impl Dialect {
    /// Dialect for a driver name, with default connection configuration
    pub fn for_driver(driver: &str) -> Result<Self, DialectError> {
        match driver {
            "mysql" => Ok(Dialect::mysql(MySqlConfig::default())),
            "mssql" | "sqlsrv" => Ok(Dialect::mssql(MssqlConfig::default())),
            "sqlite" => Ok(Dialect::sqlite(SqliteConfig::default())),
            "sqlite2" => Ok(Dialect::sqlite(SqliteConfig {
                sqlite2: true,
                ..SqliteConfig::default()
            })),
            other => Err(DialectError::UnknownDriver(other.to_string())),
        }
    }

    /// Driver name ("mysql", "mssql", "sqlite")
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Connection string for the executor; pure formatting, never a live
    /// connection
    pub fn dsn(&self) -> &str {
        &self.dsn
    }

    /// Pagination strategy used by the compiler
    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    /// Configured username, if any
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Configured password, if any
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// Driver pass-through options for the executor
    pub fn options(&self) -> &[(String, Value)] {
        &self.options
    }

    /// SQL commands the executor should run after connecting
    pub fn commands(&self) -> &[String] {
        &self.commands
    }
}
