//! Mapper collaborator contract
//!
//! A mapper is an active-record style wrapper over one database row. The
//! relation engine only ever talks to this trait: it reads the owning
//! row's key, re-tables a clone to query junction tables, and asks
//! `find` to materialize related rows. Query execution, caching and
//! connection handling live behind the implementation.

use std::time::Duration;

use serde_json::Value;

use crate::error::OrmResult;
use crate::filter::Filter;
use crate::query::QueryOptions;

/// Active-record style row wrapper
pub trait Mapper: Clone {
    /// Table this mapper reads from and writes to
    fn table(&self) -> &str;

    /// Whether the mapper holds no row identity yet
    fn unloaded(&self) -> bool;

    /// Read a column value from the wrapped row
    fn get(&self, column: &str) -> Option<Value>;

    /// Write a column value on the wrapped row
    fn set(&mut self, column: &str, value: Value);

    /// Whether the wrapped row carries a column
    fn exists(&self, column: &str) -> bool;

    /// Remove a column from the wrapped row
    fn clear(&mut self, column: &str);

    /// A reset clone of this mapper pointed at another table
    fn with_table(&self, table: &str) -> Self;

    /// Materialize every row matching the filter, one mapper per row.
    ///
    /// `ttl` is a cache hint passed through untouched; the executor
    /// decides whether and how to honor it.
    fn find(
        &self,
        filter: Option<&Filter>,
        options: &QueryOptions,
        ttl: Option<Duration>,
    ) -> OrmResult<Vec<Self>>
    where
        Self: Sized;
}
