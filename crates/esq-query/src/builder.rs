//! Request builder.
//!
//! A [`QueryBuilder`] is bound to one index. Each [`append`](QueryBuilder::append) takes that
//! index's clause from an [`IndexBoolQuery`] map; building flattens the collected clauses one
//! level into a single `bool` query:
//!
//! | entry         | clause has          | output                                       |
//! |---------------|---------------------|----------------------------------------------|
//! | mandatory     | `bool.must`         | its children, spliced into `must`            |
//! | mandatory     | no `bool.must`      | the whole clause, one `must` entry           |
//! | not mandatory | `bool.should`       | its children, spliced into `should`          |
//! | not mandatory | no `bool.should`    | the mandatory rule, applied into `should`    |

use serde_json::{Map, Value, json};
use tracing::debug;

use crate::{QueryError, assemble::IndexBoolQuery, sort::SortField};

/// Composite aggregation page size used when none is given.
pub const DEFAULT_AGGREGATION_SIZE: usize = 1000;

/// A clause collected from one index map.
#[derive(Debug, Clone, PartialEq)]
struct QueryItem {
    /// The index's clause.
    query: Value,
    /// Whether the clause is required (`must`) or optional (`should`).
    is_mandatory: bool,
}

/// Accumulates per-index clauses and renders search or aggregation requests.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryBuilder {
    /// Index every appended map must contain.
    index_name: String,
    /// Clauses, in append order.
    items: Vec<QueryItem>,
}

impl QueryBuilder {
    /// Creates a builder for `index_name`.
    pub fn new(index_name: impl Into<String>) -> Result<Self, QueryError> {
        let index_name = index_name.into();
        if index_name.is_empty() {
            return Err(QueryError::invalid_argument("indexName", "can't be empty"));
        }
        Ok(Self {
            index_name,
            items: Vec::new(),
        })
    }

    /// The bound index.
    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    /// Number of appended clauses.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if nothing was appended.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Appends the bound index's clause from `query_map` as a required condition.
    pub fn append(&mut self, query_map: &IndexBoolQuery) -> Result<(), QueryError> {
        self.append_with(query_map, true)
    }

    /// Appends the bound index's clause from `query_map`.
    ///
    /// Fails with [`QueryError::MissingIndexInMap`] if the map has no clause for the index.
    pub fn append_with(
        &mut self,
        query_map: &IndexBoolQuery,
        is_mandatory: bool,
    ) -> Result<(), QueryError> {
        let query = query_map
            .get(&self.index_name)
            .ok_or_else(|| QueryError::MissingIndexInMap {
                index: self.index_name.clone(),
            })?;

        debug!(index = %self.index_name, is_mandatory, "appended index query");
        self.items.push(QueryItem {
            query: query.clone(),
            is_mandatory,
        });
        Ok(())
    }

    /// Flattens the collected clauses into `{"bool": {"must": [...], "should": [...]}}`.
    pub fn build_bool_query(&self) -> Value {
        let must: Vec<Value> = self
            .items
            .iter()
            .filter(|item| item.is_mandatory)
            .flat_map(|item| must_clauses(&item.query))
            .collect();
        let should: Vec<Value> = self
            .items
            .iter()
            .filter(|item| !item.is_mandatory)
            .flat_map(|item| should_clauses(&item.query))
            .collect();

        json!({
            "bool": {
                "must": must,
                "should": should,
            }
        })
    }

    /// Builds a paginated, sorted search request.
    ///
    /// `from` is `page * size`; sort entries are emitted exactly in the given order.
    pub fn build_search_query(&self, page: usize, size: usize, order_by: &[SortField]) -> Value {
        let sort: Vec<Value> = order_by
            .iter()
            .map(|sort| {
                let mut entry = Map::new();
                entry.insert(sort.field.clone(), Value::from(sort.direction.as_str()));
                Value::Object(entry)
            })
            .collect();

        json!({
            "from": page.saturating_mul(size),
            "size": size,
            "query": self.build_bool_query(),
            "sort": sort,
        })
    }

    /// Builds a hit-less request bucketing documents by `field_name` under `agg_name`.
    ///
    /// Uses a composite page size of [`DEFAULT_AGGREGATION_SIZE`].
    pub fn build_aggregation_query(
        &self,
        agg_name: &str,
        field_name: &str,
        field_key: &str,
    ) -> Result<Value, QueryError> {
        self.build_aggregation_query_with_size(
            agg_name,
            field_name,
            field_key,
            DEFAULT_AGGREGATION_SIZE,
        )
    }

    /// Like [`build_aggregation_query`](Self::build_aggregation_query) with an explicit
    /// composite page size.
    pub fn build_aggregation_query_with_size(
        &self,
        agg_name: &str,
        field_name: &str,
        field_key: &str,
        size: usize,
    ) -> Result<Value, QueryError> {
        for (name, value) in [
            ("aggName", agg_name),
            ("fieldName", field_name),
            ("fieldKey", field_key),
        ] {
            if value.is_empty() {
                return Err(QueryError::invalid_argument(name, "can't be empty"));
            }
        }

        let mut terms = Map::new();
        terms.insert(field_key.to_string(), json!({ "terms": { "field": field_name } }));
        let mut aggs = Map::new();
        aggs.insert(
            agg_name.to_string(),
            json!({
                "composite": {
                    "size": size,
                    "source": [Value::Object(terms)],
                }
            }),
        );

        Ok(json!({
            "size": 0,
            "query": self.build_bool_query(),
            "aggs": Value::Object(aggs),
        }))
    }
}

/// Returns the children to splice from a clause's `bool.<occur>` array, if it has one.
fn bool_children<'a>(query: &'a Value, occur: &str) -> Option<&'a Vec<Value>> {
    query.get("bool")?.get(occur)?.as_array()
}

/// Children of `bool.must`, or the whole clause.
fn must_clauses(query: &Value) -> Vec<Value> {
    match bool_children(query, "must") {
        Some(children) => children.clone(),
        None => vec![query.clone()],
    }
}

/// Children of `bool.should`, or the mandatory flattening of the clause.
fn should_clauses(query: &Value) -> Vec<Value> {
    match bool_children(query, "should") {
        Some(children) => children.clone(),
        None => must_clauses(query),
    }
}
