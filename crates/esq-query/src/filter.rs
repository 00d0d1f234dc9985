//! Filter specifications: the declarative input to the compiler.
//!
//! A [`FilterSpecification`] says "documents in index I whose field F is/contains/is between
//! value(s) V". Specifications are validated when they are built: required strings must be
//! non-empty, at least one value must be given, and the operator must be one the data type
//! supports. Value *formats* are checked later, by the compiler.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};

use crate::QueryError;

/// Comparison applied by a filter.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, SerializeDisplay, DeserializeFromStr,
)]
pub enum FilterOperator {
    /// Field equals one of the values.
    #[default]
    Is,
    /// Field equals none of the values.
    IsNot,
    /// Field contains every word of a value.
    Contains,
    /// Field doesn't contain the words of a value.
    NotContains,
    /// Field lies inside a `<low>;<high>` interval.
    Between,
    /// Field lies outside a `<low>;<high>` interval.
    NotBetween,
    /// Field is above the value.
    GreaterThan,
    /// Field is below the value.
    LessThan,
}

impl FilterOperator {
    /// Every operator, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::Is,
        Self::IsNot,
        Self::Contains,
        Self::NotContains,
        Self::Between,
        Self::NotBetween,
        Self::GreaterThan,
        Self::LessThan,
    ];

    /// Returns the canonical name of the operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Is => "Is",
            Self::IsNot => "IsNot",
            Self::Contains => "Contains",
            Self::NotContains => "NotContains",
            Self::Between => "Between",
            Self::NotBetween => "NotBetween",
            Self::GreaterThan => "GreaterThan",
            Self::LessThan => "LessThan",
        }
    }

    /// Returns true for operators that exclude documents rather than select them.
    pub fn is_negated(self) -> bool {
        matches!(self, Self::IsNot | Self::NotContains | Self::NotBetween)
    }

    /// Returns true when a fragment compiled with this operator belongs under `must`/`should`.
    pub fn is_mandatory(self) -> bool {
        !self.is_negated()
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterOperator {
    type Err = QueryError;

    /// Parses an operator name, ignoring case, `_` and `-` (`IsNot`, `is_not`, `is-not`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_name(s);
        Self::ALL
            .into_iter()
            .find(|op| op.as_str().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| QueryError::invalid_argument("operator", format!("unknown operator '{s}'")))
    }
}

/// Data type of the field a filter targets.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, SerializeDisplay, DeserializeFromStr,
)]
pub enum FilterType {
    /// Free text, matched or wildcard-searched.
    #[default]
    Text,
    /// Numeric values, compared with ranges.
    Number,
    /// Calendar dates (`yyyy-MM-dd`), compared with ranges.
    Date,
}

impl FilterType {
    /// Every type, in declaration order.
    pub const ALL: [Self; 3] = [Self::Text, Self::Number, Self::Date];

    /// Returns the canonical name of the type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Number => "Number",
            Self::Date => "Date",
        }
    }

    /// Returns true if filters of this type accept `operator`.
    pub fn supports(self, operator: FilterOperator) -> bool {
        use FilterOperator::{
            Between, Contains, GreaterThan, Is, IsNot, LessThan, NotBetween, NotContains,
        };
        match self {
            Self::Text => matches!(operator, Is | IsNot | Contains | NotContains),
            Self::Number | Self::Date => matches!(
                operator,
                Is | IsNot | Between | NotBetween | GreaterThan | LessThan
            ),
        }
    }
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterType {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_name(s);
        Self::ALL
            .into_iter()
            .find(|ty| ty.as_str().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| QueryError::invalid_argument("type", format!("unknown filter type '{s}'")))
    }
}

/// Strips separators so snake and kebab spellings compare equal to the canonical name.
fn normalize_name(s: &str) -> String {
    s.trim().chars().filter(|c| *c != '_' && *c != '-').collect()
}

/// A validated, immutable filter description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "FilterInput")]
pub struct FilterSpecification {
    /// Index the filter targets.
    index_name: String,
    /// Field the filter targets.
    field_name: String,
    /// Nested object path, if the field lives inside one.
    #[serde(skip_serializing_if = "Option::is_none")]
    nested_of: Option<String>,
    /// Comparison to apply.
    operator: FilterOperator,
    /// Data type of the field.
    #[serde(rename = "type")]
    filter_type: FilterType,
    /// Values to compare against, in caller order.
    values: Vec<String>,
    /// Whether multiple values combine with OR instead of AND.
    evaluate_values_as_or: bool,
}

impl FilterSpecification {
    /// Creates a specification, validating its required fields and operator.
    ///
    /// The nested path defaults to absent and values combine with AND; see
    /// [`with_nested_of`](Self::with_nested_of) and
    /// [`with_values_as_or`](Self::with_values_as_or).
    pub fn new<I, V>(
        index_name: impl Into<String>,
        field_name: impl Into<String>,
        operator: FilterOperator,
        filter_type: FilterType,
        values: I,
    ) -> Result<Self, QueryError>
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let index_name = index_name.into();
        let field_name = field_name.into();
        let values: Vec<String> = values.into_iter().map(Into::into).collect();

        if index_name.is_empty() {
            return Err(QueryError::invalid_argument("indexName", "can't be empty"));
        }
        if field_name.is_empty() {
            return Err(QueryError::invalid_argument("fieldName", "can't be empty"));
        }
        if values.is_empty() {
            return Err(QueryError::EmptyInput { what: "values" });
        }
        if !filter_type.supports(operator) {
            return Err(QueryError::UnsupportedOperator {
                operator,
                filter_type,
            });
        }

        Ok(Self {
            index_name,
            field_name,
            nested_of: None,
            operator,
            filter_type,
            values,
            evaluate_values_as_or: false,
        })
    }

    /// Sets the nested object path. An empty path means "not nested".
    #[must_use]
    pub fn with_nested_of(mut self, nested_of: impl Into<String>) -> Self {
        let nested_of = nested_of.into();
        self.nested_of = (!nested_of.is_empty()).then_some(nested_of);
        self
    }

    /// Sets whether multiple values combine with OR (`should`) instead of AND (`must`).
    #[must_use]
    pub fn with_values_as_or(mut self, evaluate_values_as_or: bool) -> Self {
        self.evaluate_values_as_or = evaluate_values_as_or;
        self
    }

    /// Index the filter targets.
    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    /// Field the filter targets.
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// Nested object path, if any.
    pub fn nested_of(&self) -> Option<&str> {
        self.nested_of.as_deref()
    }

    /// Comparison to apply.
    pub fn operator(&self) -> FilterOperator {
        self.operator
    }

    /// Data type of the field.
    pub fn filter_type(&self) -> FilterType {
        self.filter_type
    }

    /// Values to compare against, in caller order.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Whether multiple values combine with OR.
    pub fn evaluate_values_as_or(&self) -> bool {
        self.evaluate_values_as_or
    }

    /// Builds a specification from parts that are already known to be valid.
    pub(crate) fn from_parts(
        index_name: String,
        field_name: String,
        nested_of: Option<String>,
        operator: FilterOperator,
        filter_type: FilterType,
        values: Vec<String>,
        evaluate_values_as_or: bool,
    ) -> Self {
        Self {
            index_name,
            field_name,
            nested_of,
            operator,
            filter_type,
            values,
            evaluate_values_as_or,
        }
    }
}

/// Unvalidated filter description, as read from JSON.
///
/// `evaluateValuesAsOr` is optional here so callers can supply their own default through
/// [`into_specification`](Self::into_specification).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterInput {
    /// Index the filter targets.
    pub index_name: String,
    /// Field the filter targets.
    pub field_name: String,
    /// Nested object path.
    #[serde(default)]
    pub nested_of: Option<String>,
    /// Comparison to apply.
    pub operator: FilterOperator,
    /// Data type of the field.
    #[serde(rename = "type")]
    pub filter_type: FilterType,
    /// Values to compare against.
    #[serde(default)]
    pub values: Vec<String>,
    /// Whether multiple values combine with OR.
    #[serde(default)]
    pub evaluate_values_as_or: Option<bool>,
}

impl FilterInput {
    /// Validates the input, using `default_values_as_or` when the flag is absent.
    pub fn into_specification(
        self,
        default_values_as_or: bool,
    ) -> Result<FilterSpecification, QueryError> {
        let spec = FilterSpecification::new(
            self.index_name,
            self.field_name,
            self.operator,
            self.filter_type,
            self.values,
        )?
        .with_values_as_or(self.evaluate_values_as_or.unwrap_or(default_values_as_or));

        Ok(match self.nested_of {
            Some(nested_of) => spec.with_nested_of(nested_of),
            None => spec,
        })
    }
}

impl TryFrom<FilterInput> for FilterSpecification {
    type Error = QueryError;

    fn try_from(input: FilterInput) -> Result<Self, Self::Error> {
        input.into_specification(false)
    }
}
