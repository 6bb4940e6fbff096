//! Relation engine integration tests
//!
//! Exercises lazy loading, cursor traversal, junction resolution and
//! cache invalidation against an in-memory mapper backed by a shared
//! table store. The mock's filter evaluator understands only the
//! predicate shapes the relation engine emits: `col = ?`, `col IN (...)`
//! and their conjunction.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;
use std::time::Duration;

use serde_json::{json, Value};

use stick_orm::{CurrentRecordAccessor, Filter, Mapper, OrmResult, Params, QueryOptions, Relation};

type StoredRow = BTreeMap<String, Value>;

#[derive(Debug, Default)]
struct Store {
    tables: HashMap<String, Vec<StoredRow>>,
    queries: usize,
}

#[derive(Debug, Clone)]
struct MemoryMapper {
    table: String,
    row: Option<StoredRow>,
    store: Rc<RefCell<Store>>,
}

impl MemoryMapper {
    fn new(store: &Rc<RefCell<Store>>, table: &str) -> Self {
        Self {
            table: table.to_string(),
            row: None,
            store: Rc::clone(store),
        }
    }

    /// Load one row by id straight from the store, bypassing `find` so
    /// fixture setup never shows up in the query counter.
    fn load_by_id(store: &Rc<RefCell<Store>>, table: &str, id: i64) -> Self {
        let row = store.borrow().tables[table]
            .iter()
            .find(|row| row.get("id") == Some(&json!(id)))
            .cloned();
        Self {
            table: table.to_string(),
            row,
            store: Rc::clone(store),
        }
    }
}

fn predicates(clause: &str) -> Vec<&str> {
    if clause.starts_with('(') && clause.ends_with(')') && clause.contains(") AND (") {
        clause[1..clause.len() - 1].split(") AND (").collect()
    } else {
        vec![clause]
    }
}

fn matches(clause: &str, params: &[Value], row: &StoredRow) -> bool {
    let mut next = 0usize;
    predicates(clause).into_iter().all(|predicate| {
        if let Some(column) = predicate.strip_suffix(" = ?") {
            let value = &params[next];
            next += 1;
            row.get(column) == Some(value)
        } else if let Some((column, rest)) = predicate.split_once(" IN (") {
            let count = rest.matches('?').count();
            let values = &params[next..next + count];
            next += count;
            row.get(column).map_or(false, |value| values.contains(value))
        } else {
            panic!("unsupported test predicate: {predicate}");
        }
    })
}

impl Mapper for MemoryMapper {
    fn table(&self) -> &str {
        &self.table
    }

    fn unloaded(&self) -> bool {
        self.row.is_none()
    }

    fn get(&self, column: &str) -> Option<Value> {
        self.row.as_ref().and_then(|row| row.get(column).cloned())
    }

    fn set(&mut self, column: &str, value: Value) {
        self.row
            .get_or_insert_with(StoredRow::default)
            .insert(column.to_string(), value);
    }

    fn exists(&self, column: &str) -> bool {
        self.row.as_ref().is_some_and(|row| row.contains_key(column))
    }

    fn clear(&mut self, column: &str) {
        if let Some(row) = self.row.as_mut() {
            row.remove(column);
        }
    }

    fn with_table(&self, table: &str) -> Self {
        Self {
            table: table.to_string(),
            row: None,
            store: Rc::clone(&self.store),
        }
    }

    fn find(
        &self,
        filter: Option<&Filter>,
        options: &QueryOptions,
        _ttl: Option<Duration>,
    ) -> OrmResult<Vec<Self>> {
        let rows = {
            let mut store = self.store.borrow_mut();
            store.queries += 1;
            store.tables.get(&self.table).cloned().unwrap_or_default()
        };
        let params = match filter.map(Filter::params) {
            Some(Params::Positional(values)) => values,
            Some(Params::Named(_)) => panic!("mock mapper binds positionally"),
            None => Vec::new(),
        };
        let mut matched: Vec<StoredRow> = rows
            .into_iter()
            .filter(|row| filter.map_or(true, |f| matches(f.clause(), &params, row)))
            .collect();
        if let Some(limit) = options.limit {
            matched.truncate(limit as usize);
        }
        Ok(matched
            .into_iter()
            .map(|row| Self {
                table: self.table.clone(),
                row: Some(row),
                store: Rc::clone(&self.store),
            })
            .collect())
    }
}

fn row(pairs: &[(&str, Value)]) -> StoredRow {
    pairs
        .iter()
        .map(|(column, value)| (column.to_string(), value.clone()))
        .collect()
}

fn seed(store: &Rc<RefCell<Store>>, table: &str, rows: Vec<StoredRow>) {
    store.borrow_mut().tables.insert(table.to_string(), rows);
}

fn queries(store: &Rc<RefCell<Store>>) -> usize {
    store.borrow().queries
}

/// Store with users 1 and 2, and pals 2..4 pointing back through the
/// `soulmate` foreign key.
fn soulmate_store() -> Rc<RefCell<Store>> {
    let store = Rc::new(RefCell::new(Store::default()));
    seed(
        &store,
        "user",
        vec![
            row(&[("id", json!(1)), ("name", json!("fizz"))]),
            row(&[("id", json!(2)), ("name", json!("buzz"))]),
        ],
    );
    seed(
        &store,
        "pal",
        vec![
            row(&[("id", json!(2)), ("soulmate", json!(1))]),
            row(&[("id", json!(3)), ("soulmate", json!(1))]),
            row(&[("id", json!(4)), ("soulmate", json!(2))]),
        ],
    );
    store
}

fn soulmates(store: &Rc<RefCell<Store>>, owner_id: i64) -> Relation<MemoryMapper> {
    let owner = MemoryMapper::load_by_id(store, "user", owner_id);
    Relation::new(owner)
        .target(MemoryMapper::new(store, "pal"))
        .foreign_key("soulmate")
        .one(false)
}

#[test]
fn test_one_to_many_cursor_traversal() {
    let store = soulmate_store();
    let mut relation = soulmates(&store, 1);

    assert!(!relation.is_loaded());
    assert_eq!(relation.count().unwrap(), 2);
    assert!(relation.is_loaded());

    assert_eq!(relation.first().unwrap().unwrap().get("id"), Some(json!(2)));
    assert_eq!(relation.next().unwrap().unwrap().get("id"), Some(json!(3)));
    assert!(relation.next().unwrap().is_none());
    assert_eq!(relation.prev().unwrap().unwrap().get("id"), Some(json!(3)));
    assert_eq!(relation.prev().unwrap().unwrap().get("id"), Some(json!(2)));
    assert!(relation.prev().unwrap().is_none());
    assert_eq!(relation.last().unwrap().unwrap().get("id"), Some(json!(3)));
}

#[test]
fn test_cursor_skips_compose_past_bounds() {
    let store = soulmate_store();
    let mut relation = soulmates(&store, 1);

    // Pointer keeps moving even out of range; only the record is absent.
    assert!(relation.skip(5).unwrap().is_none());
    assert_eq!(relation.key(), 5);
    assert!(!relation.valid());
    assert_eq!(relation.skip(-4).unwrap().unwrap().get("id"), Some(json!(3)));
    assert!(relation.valid());
}

#[test]
fn test_one_to_one_forces_limit_one() {
    let store = soulmate_store();
    let owner = MemoryMapper::load_by_id(&store, "user", 1);
    let mut relation = Relation::new(owner)
        .target(MemoryMapper::new(&store, "pal"))
        .foreign_key("soulmate");

    assert!(relation.is_one());
    assert_eq!(relation.count().unwrap(), 1);
    assert_eq!(relation.first().unwrap().unwrap().get("id"), Some(json!(2)));
}

#[test]
fn test_unloaded_owner_yields_empty_without_querying() {
    let store = soulmate_store();
    let mut relation = soulmates(&store, 99);

    assert_eq!(relation.count().unwrap(), 0);
    assert!(relation.is_loaded());
    assert_eq!(queries(&store), 0);
    assert!(relation.current().unwrap().is_none());
}

#[test]
fn test_static_filter_merged_into_every_load() {
    let store = soulmate_store();
    seed(
        &store,
        "pal",
        vec![
            row(&[("id", json!(2)), ("soulmate", json!(1)), ("active", json!(true))]),
            row(&[("id", json!(3)), ("soulmate", json!(1)), ("active", json!(false))]),
        ],
    );
    let mut relation = soulmates(&store, 1).filter(Filter::eq("active", true));

    assert_eq!(relation.count().unwrap(), 1);
    assert_eq!(relation.first().unwrap().unwrap().get("id"), Some(json!(2)));
}

#[test]
fn test_many_to_many_resolves_via_two_queries() {
    let store = Rc::new(RefCell::new(Store::default()));
    seed(&store, "user", vec![row(&[("id", json!(1))])]);
    seed(
        &store,
        "role",
        vec![
            row(&[("id", json!(5)), ("name", json!("admin"))]),
            row(&[("id", json!(6)), ("name", json!("editor"))]),
            row(&[("id", json!(7)), ("name", json!("ghost"))]),
        ],
    );
    // Duplicate junction rows must not inflate the resolved count.
    seed(
        &store,
        "user_role",
        vec![
            row(&[("user_id", json!(1)), ("role_id", json!(5))]),
            row(&[("user_id", json!(1)), ("role_id", json!(5))]),
            row(&[("user_id", json!(1)), ("role_id", json!(6))]),
            row(&[("user_id", json!(2)), ("role_id", json!(7))]),
        ],
    );

    let owner = MemoryMapper::load_by_id(&store, "user", 1);
    let mut relation = Relation::new(owner)
        .target(MemoryMapper::new(&store, "role"))
        .foreign_key("id")
        .lookup("user_role");

    assert!(!relation.is_one());
    assert_eq!(relation.count().unwrap(), 2);
    assert_eq!(queries(&store), 2);
    assert_eq!(relation.first().unwrap().unwrap().get("name"), Some(json!("admin")));
    assert_eq!(relation.last().unwrap().unwrap().get("name"), Some(json!("editor")));
}

#[test]
fn test_many_to_many_empty_junction_short_circuits() {
    let store = Rc::new(RefCell::new(Store::default()));
    seed(&store, "user", vec![row(&[("id", json!(1))])]);
    seed(&store, "role", vec![row(&[("id", json!(5))])]);
    seed(&store, "user_role", Vec::new());

    let owner = MemoryMapper::load_by_id(&store, "user", 1);
    let mut relation = Relation::new(owner)
        .target(MemoryMapper::new(&store, "role"))
        .foreign_key("id")
        .lookup("user_role");

    assert_eq!(relation.count().unwrap(), 0);
    assert_eq!(queries(&store), 1);
}

#[test]
fn test_cached_until_forced_reload() {
    let store = soulmate_store();
    let mut relation = soulmates(&store, 1);

    assert_eq!(relation.count().unwrap(), 2);
    let after_load = queries(&store);

    store
        .borrow_mut()
        .tables
        .get_mut("pal")
        .unwrap()
        .push(row(&[("id", json!(9)), ("soulmate", json!(1))]));

    // Repeated cursor work stays on the cache.
    assert_eq!(relation.count().unwrap(), 2);
    assert!(relation.last().unwrap().is_some());
    assert_eq!(queries(&store), after_load);

    relation.load(true).unwrap();
    assert_eq!(relation.count().unwrap(), 3);
}

#[test]
fn test_set_owner_invalidates_on_identity_change() {
    let store = soulmate_store();
    let mut relation = soulmates(&store, 1);
    assert_eq!(relation.count().unwrap(), 2);

    // Same identity: cache survives.
    relation.set_owner(MemoryMapper::load_by_id(&store, "user", 1));
    assert!(relation.is_loaded());

    // New identity: cache dropped, next access re-queries for the new key.
    relation.set_owner(MemoryMapper::load_by_id(&store, "user", 2));
    assert!(!relation.is_loaded());
    assert_eq!(relation.count().unwrap(), 1);
    assert_eq!(relation.first().unwrap().unwrap().get("id"), Some(json!(4)));
}

#[test]
fn test_field_proxy_follows_the_cursor() {
    let store = soulmate_store();
    let mut relation = soulmates(&store, 1);

    assert_eq!(relation.get_field("id").unwrap(), Some(json!(2)));
    assert!(relation.has_field("soulmate").unwrap());

    relation.set_field("nickname", json!("bff")).unwrap();
    assert_eq!(relation.get_field("nickname").unwrap(), Some(json!("bff")));
    relation.clear_field("nickname").unwrap();
    assert!(!relation.has_field("nickname").unwrap());

    // Out of range: absent values and silent writes, never an error.
    relation.skip(10).unwrap();
    assert_eq!(relation.get_field("id").unwrap(), None);
    assert!(!relation.has_field("id").unwrap());
    relation.set_field("nickname", json!("lost")).unwrap();
    relation.clear_field("nickname").unwrap();
}

#[test]
fn test_sequential_iteration_contract() {
    let store = soulmate_store();
    let mut relation = soulmates(&store, 1);

    relation.rewind().unwrap();
    let mut seen = Vec::new();
    while relation.valid() {
        let key = relation.key();
        let id = relation.current().unwrap().unwrap().get("id").unwrap();
        seen.push((key, id));
        relation.next().unwrap();
    }
    assert_eq!(seen, vec![(0, json!(2)), (1, json!(3))]);

    let ids: Vec<Value> = relation
        .iter()
        .unwrap()
        .filter_map(|pal| pal.get("id"))
        .collect();
    assert_eq!(ids, vec![json!(2), json!(3)]);

    let borrowed: Vec<&MemoryMapper> = (&relation).into_iter().collect();
    assert_eq!(borrowed.len(), 2);
}
