//! Configuration validation.
//!
//! Reports settings that load fine but would produce useless or rejected requests.

use std::fmt;

use esq_query::SortField;

use crate::Config;

/// A non-fatal problem with the effective configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// `search.page_size` is zero, so searches return no hits.
    ZeroPageSize,
    /// `aggregation.size` is zero, so aggregations return no buckets.
    ZeroAggregationSize,
    /// `aggregation.key` is empty, which the request builder rejects.
    EmptyAggregationKey,
    /// A `search.sort` entry can't be parsed.
    InvalidSort {
        /// The offending entry.
        entry: String,
        /// Why it was rejected.
        reason: String,
    },
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroPageSize => write!(f, "search.page_size is 0, searches will return no hits"),
            Self::ZeroAggregationSize => {
                write!(f, "aggregation.size is 0, aggregations will return no buckets")
            }
            Self::EmptyAggregationKey => write!(f, "aggregation.key is empty"),
            Self::InvalidSort { entry, reason } => {
                write!(f, "search.sort entry '{entry}' is invalid: {reason}")
            }
        }
    }
}

/// Checks the effective configuration, returning warnings in section order.
pub fn validate_config(config: &Config) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();

    if config.search.page_size == 0 {
        warnings.push(ConfigWarning::ZeroPageSize);
    }
    for entry in &config.search.sort {
        if let Err(err) = entry.parse::<SortField>() {
            warnings.push(ConfigWarning::InvalidSort {
                entry: entry.clone(),
                reason: err.to_string(),
            });
        }
    }

    if config.aggregation.size == 0 {
        warnings.push(ConfigWarning::ZeroAggregationSize);
    }
    if config.aggregation.key.trim().is_empty() {
        warnings.push(ConfigWarning::EmptyAggregationKey);
    }

    warnings
}
