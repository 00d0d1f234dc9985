//! Text filter compilation.
//!
//! `Is`/`IsNot` become one `match` clause per value. `Contains`/`NotContains` split each value
//! into lower-cased word tokens and require every token as a `*token*` wildcard.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use super::{bool_clause, field_clause, values_occur};
use crate::{
    QueryError,
    filter::{FilterOperator, FilterType},
    reduce::ReducedFilter,
};

/// Pattern a `Contains` value must satisfy to yield at least one token.
const WORD_PATTERN: &str = r"\w+";

/// Splits a word into its alphanumeric sub-tokens.
static NON_WORD: OnceLock<Regex> = OnceLock::new();

/// Returns the compiled non-word separator.
fn non_word() -> &'static Regex {
    NON_WORD.get_or_init(|| Regex::new(r"\W+").expect("non-word pattern is valid"))
}

/// Compiler for `Text` filters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextCompiler;

impl TextCompiler {
    /// Compiles a text filter into a `bool` clause over its values.
    pub fn compile(self, filter: &ReducedFilter) -> Result<Value, QueryError> {
        let clauses = match filter.operator() {
            FilterOperator::Is | FilterOperator::IsNot => match_clauses(filter),
            FilterOperator::Contains | FilterOperator::NotContains => wildcard_clauses(filter)?,
            operator => {
                return Err(QueryError::UnsupportedOperator {
                    operator,
                    filter_type: FilterType::Text,
                });
            }
        };

        Ok(bool_clause(
            values_occur(filter.evaluate_values_as_or()),
            clauses,
        ))
    }
}

/// One `match` clause per value.
fn match_clauses(filter: &ReducedFilter) -> Vec<Value> {
    filter
        .values()
        .iter()
        .map(|value| field_clause("match", filter.field_name(), Value::String(value.clone())))
        .collect()
}

/// One `bool.must` of wildcards per value.
fn wildcard_clauses(filter: &ReducedFilter) -> Result<Vec<Value>, QueryError> {
    filter
        .values()
        .iter()
        .map(|value| {
            let tokens = wildcard_tokens(value);
            if tokens.is_empty() {
                return Err(QueryError::InvalidValueFormat {
                    field: filter.field_name().to_string(),
                    value: value.clone(),
                    expected: WORD_PATTERN.to_string(),
                });
            }

            let wildcards = tokens
                .into_iter()
                .map(|token| field_clause("wildcard", filter.field_name(), Value::String(token)))
                .collect();
            Ok(bool_clause("must", wildcards))
        })
        .collect()
}

/// Tokenizes a value into `*token*` wildcard patterns.
///
/// Splits on whitespace, then on non-word characters, drops empty pieces and lower-cases the
/// rest.
fn wildcard_tokens(value: &str) -> Vec<String> {
    value
        .split_whitespace()
        .flat_map(|word| non_word().split(word))
        .filter(|token| !token.is_empty())
        .map(|token| format!("*{}*", token.to_lowercase()))
        .collect()
}
