//! Query compiler - SELECT generation and identifier quoting
//!
//! Translates a table, an optional filter and an option bag into one
//! dialect's SQL text plus the bind parameters, in a fixed clause order:
//! select, from, alias, join, where, group by, having, order by,
//! limit/offset. Empty segments are skipped. The compiler is a pure
//! function of its inputs and the configured dialect.

use crate::dialect::{Dialect, Pagination};
use crate::error::{QueryError, QueryResult};
use crate::filter::{Filter, Params};

use super::types::{Order, QueryOptions, Select};

/// Compiles query specifications into dialect-specific SQL
#[derive(Debug, Clone)]
pub struct QueryCompiler {
    pub(crate) dialect: Dialect,
}

impl QueryCompiler {
    /// Create a compiler for one dialect
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    /// The configured dialect
    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    /// Quote a dotted identifier, each segment independently.
    ///
    /// Expressions (anything carrying parentheses or whitespace) and `*`
    /// pass through untouched; only plain dotted identifiers are quoted.
    pub fn quote(&self, key: &str) -> String {
        if key == "*" || key.contains('(') || key.contains(')') || key.contains(' ') {
            return key.to_string();
        }
        key.split('.')
            .map(|part| {
                format!(
                    "{}{}{}",
                    self.dialect.quote_open, part, self.dialect.quote_close
                )
            })
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Assemble a SELECT statement and its bind parameters
    pub fn stringify(
        &self,
        table: &str,
        filter: Option<&Filter>,
        options: &QueryOptions,
    ) -> QueryResult<(String, Params)> {
        let mut params = options.params.clone();
        let limit = options.limit.unwrap_or(0);
        let offset = options.offset.unwrap_or(0);

        // MSSQL can prefix the select list instead of appending a clause,
        // but only when no order or offset is involved.
        let top = self.dialect.pagination == Pagination::OffsetFetch
            && limit > 0
            && offset == 0
            && options.order.is_none();

        let mut sql = String::from("SELECT ");
        if top {
            sql.push_str(&format!("TOP {} ", limit));
        }
        match &options.select {
            None => sql.push('*'),
            Some(Select::Raw(raw)) => sql.push_str(raw),
            Some(Select::Columns(columns)) => {
                let rendered: Vec<String> = columns
                    .iter()
                    .map(|col| match &col.alias {
                        Some(alias) => {
                            format!("{} {}", self.quote(&col.column), self.quote(alias))
                        }
                        None => self.quote(&col.column),
                    })
                    .collect();
                sql.push_str(&rendered.join(", "));
            }
        }

        sql.push_str(" FROM ");
        sql.push_str(&self.quote(table));
        if let Some(alias) = &options.alias {
            sql.push(' ');
            sql.push_str(&self.quote(alias));
        }
        if let Some(join) = &options.join {
            sql.push(' ');
            sql.push_str(join);
        }
        if let Some(filter) = filter {
            sql.push_str(" WHERE ");
            sql.push_str(filter.clause());
            params = params.merge(filter.params())?;
        }
        if let Some(group) = &options.group {
            sql.push_str(" GROUP BY ");
            sql.push_str(group);
        }
        if let Some(having) = &options.having {
            sql.push_str(" HAVING ");
            sql.push_str(having.clause());
            params = params.merge(having.params())?;
        }
        if let Some(order) = &options.order {
            sql.push_str(" ORDER BY ");
            match order {
                Order::Raw(raw) => sql.push_str(raw),
                Order::Columns(columns) => {
                    let rendered: Vec<String> = columns
                        .iter()
                        .map(|(column, direction)| match direction {
                            Some(direction) => {
                                format!("{} {}", self.quote(column), direction)
                            }
                            None => self.quote(column),
                        })
                        .collect();
                    sql.push_str(&rendered.join(", "));
                }
            }
        }

        match self.dialect.pagination {
            Pagination::LimitOffset => {
                if limit > 0 {
                    sql.push_str(&format!(" LIMIT {}", limit));
                }
                if offset > 0 {
                    sql.push_str(&format!(" OFFSET {}", offset));
                }
            }
            Pagination::OffsetFetch => {
                if !top && (limit > 0 || offset > 0) {
                    if options.order.is_none() {
                        return Err(QueryError::LimitWithoutOrder);
                    }
                    sql.push_str(&format!(" OFFSET {} ROWS", offset));
                    if limit > 0 {
                        sql.push_str(&format!(" FETCH NEXT {} ROWS ONLY", limit));
                    }
                }
            }
        }

        tracing::debug!(dialect = self.dialect.name, sql = %sql, "compiled select");
        Ok((sql, params))
    }

    /// Wrap a SELECT into a `COUNT(*)` query with the same parameters
    pub fn count(
        &self,
        table: &str,
        filter: Option<&Filter>,
        options: &QueryOptions,
    ) -> QueryResult<(String, Params)> {
        let mut inner = options.clone();
        inner.select = None;
        let (sql, params) = self.stringify(table, filter, &inner)?;
        Ok((format!("SELECT COUNT(*) _count FROM ({}) _source", sql), params))
    }
}
