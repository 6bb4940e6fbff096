//! # stick-orm: Relation-aware mapper core
//!
//! The query layer of the Stick framework: a dialect-aware SQL query
//! compiler and a lazy, cursor-based relation engine.
//!
//! The compiler turns a table, a [`Filter`] and a [`QueryOptions`] bag
//! into `(sql, params)` pairs for MySQL, MSSQL or SQLite, honoring each
//! dialect's quoting and pagination rules. The [`Relation`] type is a
//! lazy view over the records related to one owning [`Mapper`] row —
//! one-to-one, one-to-many, or many-to-many through a junction table —
//! with caching and pointer-based traversal. Query execution stays with
//! the caller: compiled statements and the `Mapper` collaborator are the
//! only seams to a database.

pub mod dialect;
pub mod error;
pub mod filter;
pub mod mapper;
pub mod query;
pub mod relation;

// Re-export core traits and types
pub use dialect::{Dialect, DialectError, MssqlConfig, MySqlConfig, Pagination, SqliteConfig};
pub use error::{OrmError, OrmResult, QueryError, QueryResult};
pub use filter::{Filter, Params};
pub use mapper::Mapper;
pub use query::{Order, OrderDirection, QueryCompiler, QueryOptions, Row, Select, SelectColumn};
pub use relation::{CurrentRecordAccessor, Relation};
