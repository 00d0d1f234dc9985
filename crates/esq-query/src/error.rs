//! Error types for filter validation, compilation, and request building.

use thiserror::Error;

use crate::filter::{FilterOperator, FilterType};

/// Errors raised while validating, compiling, or assembling filters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// A required sequence was empty.
    #[error("{what} can't be empty")]
    EmptyInput {
        /// Name of the empty input.
        what: &'static str,
    },

    /// A required argument was missing or malformed.
    #[error("invalid argument '{name}': {reason}")]
    InvalidArgument {
        /// Name of the offending argument.
        name: &'static str,
        /// Why the argument was rejected.
        reason: String,
    },

    /// The operator can't be applied to filters of this type.
    #[error("the operator '{operator}' is not valid for {filter_type} filters")]
    UnsupportedOperator {
        /// The rejected operator.
        operator: FilterOperator,
        /// The filter's data type.
        filter_type: FilterType,
    },

    /// A filter value doesn't match the mask required by its type and operator.
    #[error("value '{value}' for field '{field}' doesn't match the mask {expected}")]
    InvalidValueFormat {
        /// Field the value was supplied for.
        field: String,
        /// The offending value.
        value: String,
        /// The pattern the value must match.
        expected: String,
    },

    /// The index query map has no entry for the builder's target index.
    #[error("index query map doesn't contain a query for '{index}'")]
    MissingIndexInMap {
        /// The builder's target index.
        index: String,
    },
}

/// Fieldless discriminant of [`QueryError`], convenient for matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryErrorKind {
    /// See [`QueryError::EmptyInput`].
    EmptyInput,
    /// See [`QueryError::InvalidArgument`].
    InvalidArgument,
    /// See [`QueryError::UnsupportedOperator`].
    UnsupportedOperator,
    /// See [`QueryError::InvalidValueFormat`].
    InvalidValueFormat,
    /// See [`QueryError::MissingIndexInMap`].
    MissingIndexInMap,
}

impl QueryError {
    /// Shorthand for an [`QueryError::InvalidArgument`] error.
    pub fn invalid_argument(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }

    /// Returns the kind of this error.
    pub fn kind(&self) -> QueryErrorKind {
        match self {
            Self::EmptyInput { .. } => QueryErrorKind::EmptyInput,
            Self::InvalidArgument { .. } => QueryErrorKind::InvalidArgument,
            Self::UnsupportedOperator { .. } => QueryErrorKind::UnsupportedOperator,
            Self::InvalidValueFormat { .. } => QueryErrorKind::InvalidValueFormat,
            Self::MissingIndexInMap { .. } => QueryErrorKind::MissingIndexInMap,
        }
    }

    /// Returns a suggestion for fixing common errors.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::UnsupportedOperator {
                filter_type: FilterType::Text,
                ..
            } => Some("Text filters accept Is, IsNot, Contains and NotContains"),
            Self::UnsupportedOperator { .. } => Some(
                "Number and Date filters accept Is, IsNot, Between, NotBetween, GreaterThan and LessThan",
            ),
            Self::InvalidValueFormat { expected, .. } if expected.contains(';') => Some(
                "Between values use '<low>;<high>'; prefix a bound with '_' to include it (1;_10 means > 1 and <= 10)",
            ),
            Self::InvalidValueFormat { expected, .. } if expected.contains(r"\d{4}") => {
                Some("Date values use 'yyyy-MM-dd'; prefix with '_' to include the value itself")
            }
            Self::InvalidValueFormat { expected, .. } if expected.contains(r"\w") => {
                Some("Contains values need at least one letter or digit")
            }
            Self::InvalidValueFormat { .. } => {
                Some("Number values are digits with an optional decimal part; prefix with '_' to include the value itself")
            }
            Self::MissingIndexInMap { .. } => {
                Some("Append only index maps built from filters that target the builder's index")
            }
            Self::EmptyInput { .. } | Self::InvalidArgument { .. } => None,
        }
    }
}
