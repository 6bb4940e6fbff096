//! Query compiler DML operations (INSERT, UPDATE, DELETE)

use serde_json::Value;

use crate::error::{QueryError, QueryResult};
use crate::filter::{Filter, Params};

use super::compiler::QueryCompiler;

/// One row of column/value pairs, in binding order
pub type Row = Vec<(String, Value)>;

impl QueryCompiler {
    /// Compile a single-row INSERT; parameters are positional, in the
    /// row's column order
    pub fn insert(&self, table: &str, data: &Row) -> QueryResult<(String, Params)> {
        let columns: Vec<String> = data.iter().map(|(column, _)| self.quote(column)).collect();
        let placeholders = vec!["?"; data.len()].join(", ");
        let values: Vec<Value> = data.iter().map(|(_, value)| value.clone()).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.quote(table),
            columns.join(", "),
            placeholders
        );
        Ok((sql, Params::Positional(values)))
    }

    /// Compile a multi-row INSERT with one `VALUES (...), (...)` list.
    ///
    /// Every row must carry the same column count as the first; parameters
    /// are flattened in row-major order.
    pub fn insert_batch(&self, table: &str, rows: &[Row]) -> QueryResult<(String, Params)> {
        let first = rows.first().ok_or(QueryError::BatchShape)?;
        let columns: Vec<String> = first.iter().map(|(column, _)| self.quote(column)).collect();
        let placeholders = format!("({})", vec!["?"; first.len()].join(", "));

        let mut values = Vec::with_capacity(rows.len() * first.len());
        let mut groups = Vec::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            if row.len() != first.len() {
                return Err(QueryError::BatchRowCount(index));
            }
            groups.push(placeholders.as_str());
            values.extend(row.iter().map(|(_, value)| value.clone()));
        }

        let sql = format!(
            "INSERT INTO {} ({}) VALUES {}",
            self.quote(table),
            columns.join(", "),
            groups.join(", ")
        );
        Ok((sql, Params::Positional(values)))
    }

    /// Compile an UPDATE with a dynamic SET clause.
    ///
    /// A positional (or absent) filter keeps the whole statement
    /// positional: `?` placeholders in SET, row values bound before filter
    /// values because they appear first in the SQL. A named filter forces
    /// fresh `:_set_<column>` names so the SET values cannot collide with
    /// the filter's parameters, and the two maps are merged.
    pub fn update(
        &self,
        table: &str,
        data: &Row,
        filter: Option<&Filter>,
    ) -> QueryResult<(String, Params)> {
        let filter_params = filter.map(Filter::params).unwrap_or_default();

        // An empty named set carries no style information: positional.
        let (set_clause, params) = match filter_params {
            Params::Named(mut pairs) if !pairs.is_empty() => {
                let assignments: Vec<String> = data
                    .iter()
                    .map(|(column, _)| format!("{} = :_set_{}", self.quote(column), column))
                    .collect();
                pairs.extend(
                    data.iter()
                        .map(|(column, value)| (format!(":_set_{}", column), value.clone())),
                );
                (assignments.join(", "), Params::Named(pairs))
            }
            other => {
                let assignments: Vec<String> = data
                    .iter()
                    .map(|(column, _)| format!("{} = ?", self.quote(column)))
                    .collect();
                let mut values: Vec<Value> = data.iter().map(|(_, value)| value.clone()).collect();
                if let Params::Positional(rest) = other {
                    values.extend(rest);
                }
                (assignments.join(", "), Params::Positional(values))
            }
        };

        let mut sql = format!("UPDATE {} SET {}", self.quote(table), set_clause);
        if let Some(filter) = filter {
            sql.push_str(" WHERE ");
            sql.push_str(filter.clause());
        }
        Ok((sql, params))
    }

    /// Compile a DELETE
    pub fn delete(&self, table: &str, filter: Option<&Filter>) -> QueryResult<(String, Params)> {
        let mut sql = format!("DELETE FROM {}", self.quote(table));
        let mut params = Params::default();
        if let Some(filter) = filter {
            sql.push_str(" WHERE ");
            sql.push_str(filter.clause());
            params = filter.params();
        }
        Ok((sql, params))
    }
}
