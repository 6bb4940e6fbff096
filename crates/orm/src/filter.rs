//! Filter and bind-parameter representation
//!
//! A filter is an abstract where/having clause description: either a raw
//! clause, or a clause template with embedded `?` / `:named` placeholders
//! plus the values to bind. The compiler never inspects the template text;
//! it only splices the clause and carries the parameters through, so the
//! binding style the caller picked survives into the compiled statement.

use serde_json::Value;

use crate::error::{QueryError, QueryResult};

/// Ordered bind parameters for one statement
///
/// Sequential values bind positionally (`?`); keyed values bind by name
/// (`:name`). One statement uses one style, never both.
#[derive(Debug, Clone, PartialEq)]
pub enum Params {
    Positional(Vec<Value>),
    Named(Vec<(String, Value)>),
}

impl Default for Params {
    fn default() -> Self {
        Params::Positional(Vec::new())
    }
}

impl Params {
    /// Number of bind values
    pub fn len(&self) -> usize {
        match self {
            Params::Positional(values) => values.len(),
            Params::Named(pairs) => pairs.len(),
        }
    }

    /// Check if there are no bind values
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether these parameters force named binding.
    ///
    /// Normalization rule: any non-empty named set is "named"; an empty
    /// named set carries no style information and counts as positional.
    pub fn is_named_style(&self) -> bool {
        matches!(self, Params::Named(pairs) if !pairs.is_empty())
    }

    /// Merge two parameter sets, keeping the binding style.
    ///
    /// An empty set adopts the other side's style; merging two non-empty
    /// sets of different styles is a usage error.
    pub fn merge(self, other: Params) -> QueryResult<Params> {
        if other.is_empty() {
            return Ok(self);
        }
        if self.is_empty() {
            return Ok(other);
        }
        match (self, other) {
            (Params::Positional(mut left), Params::Positional(right)) => {
                left.extend(right);
                Ok(Params::Positional(left))
            }
            (Params::Named(mut left), Params::Named(right)) => {
                left.extend(right);
                Ok(Params::Named(left))
            }
            _ => Err(QueryError::MixedParameters),
        }
    }
}

/// Abstract where/having clause description
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Raw clause spliced verbatim, no bind values
    Raw(String),
    /// Clause template with `?` placeholders and positional values
    Templated(String, Vec<Value>),
    /// Clause template with `:name` placeholders and named values
    TemplatedNamed(String, Vec<(String, Value)>),
}

impl Filter {
    /// Raw clause with no bind values
    pub fn raw(clause: impl Into<String>) -> Self {
        Filter::Raw(clause.into())
    }

    /// Equality filter on one column, bound positionally
    pub fn eq<T: Into<Value>>(column: &str, value: T) -> Self {
        Filter::Templated(format!("{} = ?", column), vec![value.into()])
    }

    /// Array-membership filter on one column, bound positionally.
    ///
    /// An empty value list compiles to `IN (NULL)`, which matches no row.
    pub fn in_list(column: &str, values: Vec<Value>) -> Self {
        if values.is_empty() {
            return Filter::Raw(format!("{} IN (NULL)", column));
        }
        let placeholders = vec!["?"; values.len()].join(", ");
        Filter::Templated(format!("{} IN ({})", column, placeholders), values)
    }

    /// The clause template text
    pub fn clause(&self) -> &str {
        match self {
            Filter::Raw(clause)
            | Filter::Templated(clause, _)
            | Filter::TemplatedNamed(clause, _) => clause,
        }
    }

    /// The bind values for this clause
    pub fn params(&self) -> Params {
        match self {
            Filter::Raw(_) => Params::default(),
            Filter::Templated(_, values) => Params::Positional(values.clone()),
            Filter::TemplatedNamed(_, pairs) => Params::Named(pairs.clone()),
        }
    }

    /// Conjunction of two filters, merging their bind values
    pub fn and(&self, other: &Filter) -> QueryResult<Filter> {
        let clause = format!("({}) AND ({})", self.clause(), other.clause());
        match self.params().merge(other.params())? {
            Params::Positional(values) if values.is_empty() => Ok(Filter::Raw(clause)),
            Params::Positional(values) => Ok(Filter::Templated(clause, values)),
            Params::Named(pairs) => Ok(Filter::TemplatedNamed(clause, pairs)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_eq_builds_positional_template() {
        let filter = Filter::eq("soulmate", 1);
        assert_eq!(filter.clause(), "soulmate = ?");
        assert_eq!(filter.params(), Params::Positional(vec![json!(1)]));
    }

    #[test]
    fn test_in_list_one_placeholder_per_value() {
        let filter = Filter::in_list("id", vec![json!(3), json!(5), json!(8)]);
        assert_eq!(filter.clause(), "id IN (?, ?, ?)");
        assert_eq!(filter.params().len(), 3);
    }

    #[test]
    fn test_in_list_empty_matches_nothing() {
        let filter = Filter::in_list("id", Vec::new());
        assert_eq!(filter.clause(), "id IN (NULL)");
        assert!(filter.params().is_empty());
    }

    #[test]
    fn test_and_merges_positional_params() {
        let left = Filter::eq("soulmate", 1);
        let right = Filter::eq("active", true);
        let both = left.and(&right).unwrap();
        assert_eq!(both.clause(), "(soulmate = ?) AND (active = ?)");
        assert_eq!(
            both.params(),
            Params::Positional(vec![json!(1), json!(true)])
        );
    }

    #[test]
    fn test_and_with_raw_keeps_other_style() {
        let left = Filter::raw("deleted_at IS NULL");
        let right = Filter::TemplatedNamed(
            "name = :name".to_string(),
            vec![(":name".to_string(), json!("fizz"))],
        );
        let both = left.and(&right).unwrap();
        assert_eq!(both.clause(), "(deleted_at IS NULL) AND (name = :name)");
        assert!(both.params().is_named_style());
    }

    #[test]
    fn test_merge_mixed_styles_is_an_error() {
        let positional = Params::Positional(vec![json!(1)]);
        let named = Params::Named(vec![(":id".to_string(), json!(1))]);
        assert_eq!(positional.merge(named), Err(QueryError::MixedParameters));
    }

    #[test]
    fn test_empty_named_counts_as_positional() {
        let empty_named = Params::Named(Vec::new());
        assert!(!empty_named.is_named_style());
        let merged = empty_named.merge(Params::Positional(vec![json!(2)])).unwrap();
        assert_eq!(merged, Params::Positional(vec![json!(2)]));
    }
}
