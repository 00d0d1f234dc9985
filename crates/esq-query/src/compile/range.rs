//! Number and date filter compilation.
//!
//! Every value becomes one `range` clause. A leading `_` on a bound makes it inclusive
//! (`gte`/`lte`); without it the bound is exclusive (`gt`/`lt`). `Is`/`IsNot` set both bounds
//! from the same value, `Between`/`NotBetween` read a `<low>;<high>` pair, and `GreaterThan`/
//! `LessThan` set a single bound. Several clauses are OR-ed under `bool.should`.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};

use super::{bool_clause, field_clause};
use crate::{QueryError, filter::FilterOperator, reduce::ReducedFilter};

/// A number, optionally prefixed with `_`.
const NUMBER_PATTERN: &str = r"[_]?\d+[.]?\d*";

/// An ISO `yyyy-MM-dd` date, optionally prefixed with `_`.
const DATE_PATTERN: &str = r"[_]?(\d{4})-(0[1-9]|1[0-2])-(0[1-9]|[12][0-9]|3[01])";

/// Anchored single-number mask.
static NUMBER_PLAIN: OnceLock<Regex> = OnceLock::new();
/// Anchored `<number>;<number>` mask.
static NUMBER_BETWEEN: OnceLock<Regex> = OnceLock::new();
/// Anchored single-date mask.
static DATE_PLAIN: OnceLock<Regex> = OnceLock::new();
/// Anchored `<date>;<date>` mask.
static DATE_BETWEEN: OnceLock<Regex> = OnceLock::new();

/// The value format a range filter accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueMask {
    /// Decimal numbers.
    Number,
    /// ISO calendar dates.
    Date,
}

impl ValueMask {
    /// Unanchored pattern for one bound.
    fn bound_pattern(self) -> &'static str {
        match self {
            Self::Number => NUMBER_PATTERN,
            Self::Date => DATE_PATTERN,
        }
    }

    /// Anchored pattern for a single value.
    pub fn plain_pattern(self) -> String {
        format!("^{}$", self.bound_pattern())
    }

    /// Anchored pattern for a `<low>;<high>` value.
    pub fn between_pattern(self) -> String {
        let bound = self.bound_pattern();
        format!("^({bound});({bound})$")
    }

    /// Returns the compiled mask for single or between values.
    fn regex(self, between: bool) -> &'static Regex {
        let cell = match (self, between) {
            (Self::Number, false) => &NUMBER_PLAIN,
            (Self::Number, true) => &NUMBER_BETWEEN,
            (Self::Date, false) => &DATE_PLAIN,
            (Self::Date, true) => &DATE_BETWEEN,
        };
        cell.get_or_init(|| {
            let pattern = if between {
                self.between_pattern()
            } else {
                self.plain_pattern()
            };
            Regex::new(&pattern).expect("value mask pattern is valid")
        })
    }
}

/// Which side(s) of the range a value populates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bounds {
    /// Both sides from the same value.
    Exact,
    /// Lower side from the first half, upper side from the second.
    Between,
    /// Lower side only.
    Lower,
    /// Upper side only.
    Upper,
}

/// Compiler for `Number` and `Date` filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeCompiler {
    /// Accepted value format.
    mask: ValueMask,
}

impl RangeCompiler {
    /// Creates a compiler for values of the given format.
    pub fn new(mask: ValueMask) -> Self {
        Self { mask }
    }

    /// The accepted value format.
    pub fn mask(&self) -> ValueMask {
        self.mask
    }

    /// Validates every value, then compiles the filter into `range` clauses.
    pub fn compile(&self, filter: &ReducedFilter) -> Result<Value, QueryError> {
        let bounds = match filter.operator() {
            FilterOperator::Is | FilterOperator::IsNot => Bounds::Exact,
            FilterOperator::Between | FilterOperator::NotBetween => Bounds::Between,
            FilterOperator::GreaterThan => Bounds::Lower,
            FilterOperator::LessThan => Bounds::Upper,
            operator @ (FilterOperator::Contains | FilterOperator::NotContains) => {
                return Err(QueryError::UnsupportedOperator {
                    operator,
                    filter_type: filter.filter_type(),
                });
            }
        };

        self.validate(filter, bounds == Bounds::Between)?;

        let mut clauses: Vec<Value> = filter
            .values()
            .iter()
            .map(|value| range_clause(filter.field_name(), value, bounds))
            .collect();

        Ok(if clauses.len() == 1 {
            clauses.remove(0)
        } else {
            bool_clause("should", clauses)
        })
    }

    /// Checks every value against the mask, failing on the first mismatch.
    fn validate(&self, filter: &ReducedFilter, between: bool) -> Result<(), QueryError> {
        let regex = self.mask.regex(between);
        match filter.values().iter().find(|value| !regex.is_match(value)) {
            Some(value) => Err(QueryError::InvalidValueFormat {
                field: filter.field_name().to_string(),
                value: value.clone(),
                expected: regex.as_str().to_string(),
            }),
            None => Ok(()),
        }
    }
}

/// Builds the `range` clause for one validated value.
fn range_clause(field: &str, value: &str, bounds: Bounds) -> Value {
    let mut range = Map::new();
    match bounds {
        Bounds::Exact => {
            let (lower, bound) = lower_bound(value);
            range.insert(lower.to_string(), Value::String(bound));
            let (upper, bound) = upper_bound(value);
            range.insert(upper.to_string(), Value::String(bound));
        }
        Bounds::Between => {
            let (low, high) = value.split_once(';').unwrap_or((value, value));
            let (lower, bound) = lower_bound(low);
            range.insert(lower.to_string(), Value::String(bound));
            let (upper, bound) = upper_bound(high);
            range.insert(upper.to_string(), Value::String(bound));
        }
        Bounds::Lower => {
            let (lower, bound) = lower_bound(value);
            range.insert(lower.to_string(), Value::String(bound));
        }
        Bounds::Upper => {
            let (upper, bound) = upper_bound(value);
            range.insert(upper.to_string(), Value::String(bound));
        }
    }
    field_clause("range", field, Value::Object(range))
}

/// Returns the lower-bound key (`gte` if inclusive) and the stripped bound.
fn lower_bound(raw: &str) -> (&'static str, String) {
    let key = if raw.starts_with('_') { "gte" } else { "gt" };
    (key, strip_marker(raw))
}

/// Returns the upper-bound key (`lte` if inclusive) and the stripped bound.
fn upper_bound(raw: &str) -> (&'static str, String) {
    let key = if raw.starts_with('_') { "lte" } else { "lt" };
    (key, strip_marker(raw))
}

/// Removes inclusivity markers and surrounding whitespace.
fn strip_marker(raw: &str) -> String {
    raw.replace('_', "").trim().to_string()
}
