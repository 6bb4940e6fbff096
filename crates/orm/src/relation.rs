//! Relation engine - lazy, cursor-navigable views over related records
//!
//! A `Relation` is a view, not an owned collection: it defers SQL to the
//! first access, caches the loaded rows until an explicit reload or an
//! owner identity change, and exposes pointer-based traversal where an
//! out-of-range cursor is a normal state, never an error.

use std::time::Duration;

use serde_json::Value;

use crate::error::OrmResult;
use crate::filter::Filter;
use crate::mapper::Mapper;
use crate::query::QueryOptions;

/// Field access proxied to the record under the cursor.
///
/// Every operation is a no-op (or absent value) when the cursor is out
/// of range.
pub trait CurrentRecordAccessor {
    /// Read a column from the current record
    fn get_field(&mut self, column: &str) -> OrmResult<Option<Value>>;

    /// Write a column on the current record
    fn set_field(&mut self, column: &str, value: Value) -> OrmResult<()>;

    /// Whether the current record carries a column
    fn has_field(&mut self, column: &str) -> OrmResult<bool>;

    /// Remove a column from the current record
    fn clear_field(&mut self, column: &str) -> OrmResult<()>;
}

/// Lazy loader over the records related to one owning row
///
/// Covers one-to-one and one-to-many through a foreign key on the target
/// table, and many-to-many through a junction (`lookup`) table.
#[derive(Debug, Clone)]
pub struct Relation<M: Mapper> {
    owner: M,
    owner_key: String,
    target: M,
    foreign_key: String,
    lookup: Option<String>,
    ref_id: Option<String>,
    target_id: Option<String>,
    one: Option<bool>,
    filter: Option<Filter>,
    options: QueryOptions,
    ttl: Option<Duration>,
    rows: Vec<M>,
    ptr: i64,
    loaded: bool,
    loaded_key: Option<Value>,
}

impl<M: Mapper> Relation<M> {
    /// Relation owned by `owner`, targeting a reset clone of it (same
    /// table, self-relation) until `target` says otherwise.
    ///
    /// Defaults: owner key `id`, target foreign key `<owning_table>_id`,
    /// cardinality one unless a lookup table is set.
    pub fn new(owner: M) -> Self {
        let target = owner.with_table(owner.table());
        let foreign_key = format!("{}_id", owner.table());
        Self {
            owner,
            owner_key: "id".to_string(),
            target,
            foreign_key,
            lookup: None,
            ref_id: None,
            target_id: None,
            one: None,
            filter: None,
            options: QueryOptions::default(),
            ttl: None,
            rows: Vec::new(),
            ptr: 0,
            loaded: false,
            loaded_key: None,
        }
    }

    /// Owning-side key column (default `id`)
    pub fn owner_key(mut self, column: &str) -> Self {
        self.owner_key = column.to_string();
        self
    }

    /// Target mapper to materialize related rows with
    pub fn target(mut self, target: M) -> Self {
        self.target = target;
        self
    }

    /// Target-side foreign key column (default `<owning_table>_id`)
    pub fn foreign_key(mut self, column: &str) -> Self {
        self.foreign_key = column.to_string();
        self
    }

    /// Junction table name; implies many-to-many cardinality
    pub fn lookup(mut self, table: &str) -> Self {
        self.lookup = Some(table.to_string());
        self
    }

    /// Junction column referencing the owner (default `<owning_table>_id`)
    pub fn ref_id(mut self, column: &str) -> Self {
        self.ref_id = Some(column.to_string());
        self
    }

    /// Junction column referencing the target (default `<target_table>_id`)
    pub fn target_id(mut self, column: &str) -> Self {
        self.target_id = Some(column.to_string());
        self
    }

    /// Force cardinality; at most one related record when true
    pub fn one(mut self, one: bool) -> Self {
        self.one = Some(one);
        self
    }

    /// Extra static filter merged into every load
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Extra query options for the target lookup
    pub fn options(mut self, options: QueryOptions) -> Self {
        self.options = options;
        self
    }

    /// Cache hint for the underlying find
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Resolved cardinality: `one` unless a lookup table is set
    pub fn is_one(&self) -> bool {
        self.one.unwrap_or(self.lookup.is_none())
    }

    /// Whether the relation has been queried at least once
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// The cached result set, empty until the first load
    pub fn rows(&self) -> &[M] {
        &self.rows
    }

    /// Re-point the relation at another owning row.
    ///
    /// The cached result set survives only while the owner identity is
    /// unchanged.
    pub fn set_owner(&mut self, owner: M) {
        let key = owner.get(&self.owner_key);
        if self.loaded && self.loaded_key != key {
            self.loaded = false;
            self.rows.clear();
            self.ptr = 0;
            self.loaded_key = None;
        }
        self.owner = owner;
    }

    /// Materialize the related rows; `force` drops the cache first.
    ///
    /// An owner without identity never queries and yields an empty set.
    pub fn load(&mut self, force: bool) -> OrmResult<()> {
        if self.loaded && !force {
            return Ok(());
        }
        self.rows.clear();
        self.ptr = 0;
        self.loaded = true;
        self.loaded_key = None;

        if self.owner.unloaded() {
            return Ok(());
        }
        let Some(owner_value) = self.owner.get(&self.owner_key) else {
            return Ok(());
        };

        let base = match &self.lookup {
            Some(lookup) => {
                // Junction pass first: collect the target-side ids.
                let junction = self.target.with_table(lookup);
                let ref_column = self
                    .ref_id
                    .clone()
                    .unwrap_or_else(|| format!("{}_id", self.owner.table()));
                let target_column = self
                    .target_id
                    .clone()
                    .unwrap_or_else(|| format!("{}_id", self.target.table()));
                let links = junction.find(
                    Some(&Filter::eq(&ref_column, owner_value.clone())),
                    &QueryOptions::default(),
                    self.ttl,
                )?;
                let ids: Vec<Value> = links
                    .iter()
                    .filter_map(|link| link.get(&target_column))
                    .collect();
                if ids.is_empty() {
                    self.loaded_key = Some(owner_value);
                    return Ok(());
                }
                Filter::in_list(&self.foreign_key, ids)
            }
            None => Filter::eq(&self.foreign_key, owner_value.clone()),
        };
        let filter = match &self.filter {
            Some(extra) => base.and(extra)?,
            None => base,
        };

        let mut options = self.options.clone();
        if self.is_one() {
            options.limit = Some(1);
        }
        tracing::debug!(table = self.target.table(), "loading relation");
        self.rows = self.target.find(Some(&filter), &options, self.ttl)?;
        self.loaded_key = Some(owner_value);
        Ok(())
    }

    /// Move the cursor by `offset` and return the record it lands on.
    ///
    /// The pointer is always updated, even past the bounds, so relative
    /// skips compose; only the returned record is absent out of range.
    pub fn skip(&mut self, offset: i64) -> OrmResult<Option<&M>> {
        self.load(false)?;
        self.ptr += offset;
        Ok(self.record_at(self.ptr))
    }

    /// Record under the cursor
    pub fn current(&mut self) -> OrmResult<Option<&M>> {
        self.skip(0)
    }

    /// Advance the cursor and return the record
    pub fn next(&mut self) -> OrmResult<Option<&M>> {
        self.skip(1)
    }

    /// Step the cursor back and return the record
    pub fn prev(&mut self) -> OrmResult<Option<&M>> {
        self.skip(-1)
    }

    /// Reset the cursor to the first record
    pub fn first(&mut self) -> OrmResult<Option<&M>> {
        self.load(false)?;
        self.ptr = 0;
        Ok(self.rows.first())
    }

    /// Jump the cursor to the last record
    pub fn last(&mut self) -> OrmResult<Option<&M>> {
        self.load(false)?;
        self.ptr = self.rows.len() as i64 - 1;
        Ok(self.rows.last())
    }

    /// Reset the cursor for sequential iteration
    pub fn rewind(&mut self) -> OrmResult<()> {
        self.load(false)?;
        self.ptr = 0;
        Ok(())
    }

    /// Whether the cursor points at a record
    pub fn valid(&self) -> bool {
        self.index().is_some()
    }

    /// Current cursor position; may be out of range
    pub fn key(&self) -> i64 {
        self.ptr
    }

    /// Size of the loaded result set, forcing a load first
    pub fn count(&mut self) -> OrmResult<usize> {
        self.load(false)?;
        Ok(self.rows.len())
    }

    /// Whether the loaded result set is empty, forcing a load first
    pub fn is_empty(&mut self) -> OrmResult<bool> {
        Ok(self.count()? == 0)
    }

    /// Iterate the loaded rows from the start, forcing a load first
    pub fn iter(&mut self) -> OrmResult<std::slice::Iter<'_, M>> {
        self.load(false)?;
        Ok(self.rows.iter())
    }

    fn index(&self) -> Option<usize> {
        if self.ptr < 0 || self.ptr >= self.rows.len() as i64 {
            return None;
        }
        Some(self.ptr as usize)
    }

    fn record_at(&self, ptr: i64) -> Option<&M> {
        if ptr < 0 {
            return None;
        }
        self.rows.get(ptr as usize)
    }
}

impl<M: Mapper> CurrentRecordAccessor for Relation<M> {
    fn get_field(&mut self, column: &str) -> OrmResult<Option<Value>> {
        self.load(false)?;
        Ok(self.index().and_then(|index| self.rows[index].get(column)))
    }

    fn set_field(&mut self, column: &str, value: Value) -> OrmResult<()> {
        self.load(false)?;
        if let Some(index) = self.index() {
            self.rows[index].set(column, value);
        }
        Ok(())
    }

    fn has_field(&mut self, column: &str) -> OrmResult<bool> {
        self.load(false)?;
        Ok(self
            .index()
            .map_or(false, |index| self.rows[index].exists(column)))
    }

    fn clear_field(&mut self, column: &str) -> OrmResult<()> {
        self.load(false)?;
        if let Some(index) = self.index() {
            self.rows[index].clear(column);
        }
        Ok(())
    }
}

// Iterator implementations over the cached rows, for convenience once
// the relation has been loaded.
impl<M: Mapper> IntoIterator for Relation<M> {
    type Item = M;
    type IntoIter = std::vec::IntoIter<M>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a, M: Mapper> IntoIterator for &'a Relation<M> {
    type Item = &'a M;
    type IntoIter = std::slice::Iter<'a, M>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl<'a, M: Mapper> IntoIterator for &'a mut Relation<M> {
    type Item = &'a mut M;
    type IntoIter = std::slice::IterMut<'a, M>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter_mut()
    }
}
