//! Per-index boolean query assembly.
//!
//! Compiled fragments are grouped by index and split into affirmative and negated lists, then
//! combined into one `bool` clause per index:
//!
//! | mode | affirmative fragments | negated fragments                         |
//! |------|-----------------------|-------------------------------------------|
//! | AND  | `bool.must`           | `bool.must_not`, one entry each            |
//! | OR   | `bool.should`         | one `bool.must_not` entry: `bool.should`   |
//!
//! Empty lists are omitted, so a clause only carries the occurrences it uses.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::{
    QueryError,
    compile::{CompiledFragment, bool_clause, compile_filter, write_pretty},
    filter::FilterSpecification,
    reduce::reduce_filters,
};

/// One `bool` clause per index, in first-seen index order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct IndexBoolQuery {
    /// Clause per index name.
    queries: IndexMap<String, Value>,
    /// Evaluation mode the clauses were assembled with.
    #[serde(skip)]
    evaluate_as_or: bool,
}

impl IndexBoolQuery {
    /// Returns the clause for `index`, if any filter targeted it.
    pub fn get(&self, index: &str) -> Option<&Value> {
        self.queries.get(index)
    }

    /// Returns true if some filter targeted `index`.
    pub fn contains_index(&self, index: &str) -> bool {
        self.queries.contains_key(index)
    }

    /// Index names, in first-seen order.
    pub fn indices(&self) -> impl Iterator<Item = &str> {
        self.queries.keys().map(String::as_str)
    }

    /// `(index, clause)` pairs, in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.queries.iter().map(|(index, query)| (index.as_str(), query))
    }

    /// Number of indices.
    pub fn len(&self) -> usize {
        self.queries.len()
    }

    /// Returns true if there are no indices.
    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    /// Whether affirmative filters were OR-ed together.
    pub fn evaluate_as_or(&self) -> bool {
        self.evaluate_as_or
    }

    /// Converts the map into a JSON object keyed by index.
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.queries
                .iter()
                .map(|(index, query)| (index.clone(), query.clone()))
                .collect(),
        )
    }
}

impl fmt::Display for IndexBoolQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_pretty(f, &self.to_json())
    }
}

/// Builds [`IndexBoolQuery`] maps from filter specifications.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexQueryAssembler {
    /// OR affirmative filters instead of AND-ing them.
    evaluate_as_or: bool,
}

impl IndexQueryAssembler {
    /// Creates an assembler; `evaluate_as_or` selects OR mode.
    pub fn new(evaluate_as_or: bool) -> Self {
        Self { evaluate_as_or }
    }

    /// Whether affirmative filters are OR-ed together.
    pub fn evaluate_as_or(&self) -> bool {
        self.evaluate_as_or
    }

    /// Reduces, compiles and assembles `specs`.
    ///
    /// Any filter that fails to compile aborts the whole assembly.
    pub fn assemble<'a, I>(&self, specs: I) -> Result<IndexBoolQuery, QueryError>
    where
        I: IntoIterator<Item = &'a FilterSpecification>,
    {
        let fragments = reduce_filters(specs)?
            .values()
            .map(compile_filter)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.assemble_fragments(fragments))
    }

    /// Groups already-compiled fragments by index and combines each group.
    pub fn assemble_fragments<I>(&self, fragments: I) -> IndexBoolQuery
    where
        I: IntoIterator<Item = CompiledFragment>,
    {
        let mut groups: IndexMap<String, FragmentGroup> = IndexMap::new();
        for fragment in fragments {
            let group = groups.entry(fragment.index_name().to_string()).or_default();
            if fragment.is_mandatory() {
                group.mandatory.push(fragment.into_query());
            } else {
                group.negated.push(fragment.into_query());
            }
        }

        let queries = groups
            .into_iter()
            .map(|(index, group)| {
                debug!(
                    index = %index,
                    mandatory = group.mandatory.len(),
                    negated = group.negated.len(),
                    or_mode = self.evaluate_as_or,
                    "assembled index query"
                );
                let query = group.into_bool_query(self.evaluate_as_or);
                (index, query)
            })
            .collect();

        IndexBoolQuery {
            queries,
            evaluate_as_or: self.evaluate_as_or,
        }
    }
}

/// The fragments of one index, split by classification.
#[derive(Debug, Default)]
struct FragmentGroup {
    /// Affirmative fragments, in input order.
    mandatory: Vec<Value>,
    /// Negated fragments, in input order.
    negated: Vec<Value>,
}

impl FragmentGroup {
    /// Combines the group into one `bool` clause.
    fn into_bool_query(self, evaluate_as_or: bool) -> Value {
        let mut clauses = Map::new();

        if !self.mandatory.is_empty() {
            let occur = if evaluate_as_or { "should" } else { "must" };
            clauses.insert(occur.to_string(), Value::Array(self.mandatory));
        }

        if !self.negated.is_empty() {
            let must_not = if evaluate_as_or {
                vec![bool_clause("should", self.negated)]
            } else {
                self.negated
            };
            clauses.insert("must_not".to_string(), Value::Array(must_not));
        }

        let mut outer = Map::new();
        outer.insert("bool".to_string(), Value::Object(clauses));
        Value::Object(outer)
    }
}
