//! Query option types - the option bag accepted by the compiler

use std::fmt;

use crate::filter::{Filter, Params};

/// Order by direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    Asc,
    Desc,
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderDirection::Asc => write!(f, "ASC"),
            OrderDirection::Desc => write!(f, "DESC"),
        }
    }
}

/// One output column of a select list
#[derive(Debug, Clone, PartialEq)]
pub struct SelectColumn {
    pub column: String,
    /// Output alias; `None` leaves the column under its own name
    pub alias: Option<String>,
}

impl SelectColumn {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            alias: None,
        }
    }

    pub fn aliased(column: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            alias: Some(alias.into()),
        }
    }
}

/// Select list: raw SQL used verbatim, or columns quoted one by one
#[derive(Debug, Clone, PartialEq)]
pub enum Select {
    Raw(String),
    Columns(Vec<SelectColumn>),
}

/// Order clause: raw SQL used verbatim, or per-column directions.
/// A `None` direction means no explicit direction is emitted.
#[derive(Debug, Clone, PartialEq)]
pub enum Order {
    Raw(String),
    Columns(Vec<(String, Option<OrderDirection>)>),
}

/// Option bag recognized by the query compiler
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    pub select: Option<Select>,
    pub alias: Option<String>,
    /// Raw join fragment spliced after the table
    pub join: Option<String>,
    pub group: Option<String>,
    pub having: Option<Filter>,
    pub order: Option<Order>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    /// Extra bind values, merged in before any filter parameters
    pub params: Params,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the select list
    pub fn select(mut self, select: Select) -> Self {
        self.select = Some(select);
        self
    }

    /// Set the table alias
    pub fn alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.to_string());
        self
    }

    /// Add a raw join fragment
    pub fn join(mut self, join: &str) -> Self {
        self.join = Some(join.to_string());
        self
    }

    /// Set the GROUP BY clause
    pub fn group(mut self, group: &str) -> Self {
        self.group = Some(group.to_string());
        self
    }

    /// Set the HAVING filter
    pub fn having(mut self, having: Filter) -> Self {
        self.having = Some(having);
        self
    }

    /// Set the ORDER BY clause
    pub fn order(mut self, order: Order) -> Self {
        self.order = Some(order);
        self
    }

    /// Set the LIMIT
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the OFFSET
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Set extra bind values merged in before any filter parameters
    pub fn params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }
}
