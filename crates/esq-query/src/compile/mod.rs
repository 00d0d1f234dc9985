//! Filter compiler.
//!
//! Compiles one [`ReducedFilter`] into a Query DSL fragment. The compiler is selected by the
//! filter's data type: text fields produce `match`/`wildcard` clauses, numbers and dates produce
//! `range` clauses. Each compiler validates its own operator subset and value masks.

mod range;
mod text;

use std::fmt;

use serde_json::{Map, Value};
use tracing::{debug, trace};

pub use range::{RangeCompiler, ValueMask};
pub use text::TextCompiler;

use crate::{
    QueryError,
    filter::{FilterSpecification, FilterType},
    reduce::ReducedFilter,
};

/// A compiled filter: a query clause and whether it selects or excludes documents.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledFragment {
    /// Index the fragment applies to.
    index_name: String,
    /// False for negated operators (`IsNot`, `NotContains`, `NotBetween`).
    is_mandatory: bool,
    /// The compiled clause.
    query: Value,
}

impl CompiledFragment {
    /// Index the fragment applies to.
    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    /// Whether the fragment belongs under `must`/`should` rather than `must_not`.
    pub fn is_mandatory(&self) -> bool {
        self.is_mandatory
    }

    /// The compiled clause.
    pub fn query(&self) -> &Value {
        &self.query
    }

    /// Consumes the fragment, returning the compiled clause.
    pub fn into_query(self) -> Value {
        self.query
    }
}

impl fmt::Display for CompiledFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_pretty(f, &self.query)
    }
}

/// Writes a JSON value in its indented form.
pub fn write_pretty(f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
    let rendered = serde_json::to_string_pretty(value).map_err(|_| fmt::Error)?;
    f.write_str(&rendered)
}

/// Compiler for one data type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterCompiler {
    /// Compiler for `Text` filters.
    Text(TextCompiler),
    /// Compiler for `Number` and `Date` filters.
    Range(RangeCompiler),
}

impl FilterCompiler {
    /// Selects the compiler for a data type.
    pub fn for_type(filter_type: FilterType) -> Self {
        match filter_type {
            FilterType::Text => Self::Text(TextCompiler),
            FilterType::Number => Self::Range(RangeCompiler::new(ValueMask::Number)),
            FilterType::Date => Self::Range(RangeCompiler::new(ValueMask::Date)),
        }
    }

    /// Compiles a reduced filter into a fragment.
    pub fn compile(&self, filter: &ReducedFilter) -> Result<CompiledFragment, QueryError> {
        let query = match self {
            Self::Text(compiler) => compiler.compile(filter)?,
            Self::Range(compiler) => compiler.compile(filter)?,
        };

        debug!(
            index = filter.index_name(),
            field = filter.field_name(),
            operator = %filter.operator(),
            values = filter.values().len(),
            "compiled filter"
        );
        trace!(%query, "compiled fragment");

        Ok(CompiledFragment {
            index_name: filter.index_name().to_string(),
            is_mandatory: filter.is_mandatory(),
            query,
        })
    }
}

/// Compiles a reduced filter with the compiler for its data type.
pub fn compile_filter(filter: &ReducedFilter) -> Result<CompiledFragment, QueryError> {
    FilterCompiler::for_type(filter.filter_type()).compile(filter)
}

/// Compiles a single specification on its own, without merging.
pub fn compile_specification(spec: &FilterSpecification) -> Result<CompiledFragment, QueryError> {
    compile_filter(&ReducedFilter::from(spec))
}

/// Wraps clauses as `{"bool": {occur: [...]}}`.
pub fn bool_clause(occur: &str, clauses: Vec<Value>) -> Value {
    field_clause("bool", occur, Value::Array(clauses))
}

/// Returns the occurrence used to combine a filter's values.
pub fn values_occur(evaluate_values_as_or: bool) -> &'static str {
    if evaluate_values_as_or { "should" } else { "must" }
}

/// Builds `{clause: {field: value}}`.
pub fn field_clause(clause: &str, field: &str, value: Value) -> Value {
    let mut by_field = Map::new();
    by_field.insert(field.to_string(), value);
    let mut outer = Map::new();
    outer.insert(clause.to_string(), Value::Object(by_field));
    Value::Object(outer)
}
