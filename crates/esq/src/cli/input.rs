//! Filter file loading.
//!
//! A filter file is JSON in one of two shapes:
//!
//! - an array of filters, read as one mandatory group
//! - `{"groups": [{"evaluateAsOr": bool, "mandatory": bool, "filters": [...]}]}`, where both
//!   flags are optional
//!
//! Defaults for missing flags come from the `[filters]` config section and the `--or` flag.

use std::{fs, io, path::PathBuf};

use esq_config::FilterSettings;
use esq_query::{
    FilterInput, FilterSpecification, IndexBoolQuery, IndexQueryAssembler, QueryBuilder,
    QueryError,
};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Errors raised while reading a filter file.
#[derive(Debug, Error)]
pub enum InputError {
    /// The file couldn't be read.
    #[error("failed to read filter file {path}: {source}")]
    Read {
        /// Path to the file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The file isn't JSON of either accepted shape.
    #[error("failed to parse filter file {path}: {source}")]
    Parse {
        /// Path to the file.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// The top-level value is neither an array nor an object with `groups`.
    #[error("filter file {path} must hold an array of filters or an object with \"groups\"")]
    Shape {
        /// Path to the file.
        path: PathBuf,
    },

    /// A filter failed validation.
    #[error("group {group}, filter {filter}: {source}")]
    Filter {
        /// Zero-based group position.
        group: usize,
        /// Zero-based filter position within the group.
        filter: usize,
        /// Validation error.
        source: QueryError,
    },
}

impl InputError {
    /// Returns the underlying query error, if any.
    pub fn query_error(&self) -> Option<&QueryError> {
        match self {
            Self::Filter { source, .. } => Some(source),
            Self::Read { .. } | Self::Parse { .. } | Self::Shape { .. } => None,
        }
    }
}

/// A group as written in the file.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawGroup {
    /// OR the group's filters on the same index.
    #[serde(default)]
    evaluate_as_or: Option<bool>,
    /// Append the group as a required condition.
    #[serde(default)]
    mandatory: Option<bool>,
    /// The group's filters.
    filters: Vec<FilterInput>,
}

/// The `{"groups": [...]}` document.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GroupedDocument {
    /// Groups, in file order.
    groups: Vec<RawGroup>,
}

/// A validated group of filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterGroup {
    /// OR filters on the same index.
    pub evaluate_as_or: bool,
    /// Append as a required (`must`) rather than optional (`should`) condition.
    pub mandatory: bool,
    /// Validated filters.
    pub filters: Vec<FilterSpecification>,
}

impl FilterGroup {
    /// Reduces, compiles and assembles the group's filters.
    pub fn assemble(&self) -> Result<IndexBoolQuery, QueryError> {
        IndexQueryAssembler::new(self.evaluate_as_or).assemble(&self.filters)
    }
}

/// A parsed filter file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterFile {
    /// True if the file used the `{"groups": [...]}` shape.
    pub grouped: bool,
    /// Groups, in file order.
    pub groups: Vec<FilterGroup>,
}

/// Defaults applied to flags a file leaves out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupDefaults {
    /// Default group evaluation mode.
    pub evaluate_as_or: bool,
    /// Default for filters without `evaluateValuesAsOr`.
    pub evaluate_values_as_or: bool,
}

impl GroupDefaults {
    /// Config defaults, with `force_or` switching groups to OR mode.
    pub fn new(settings: &FilterSettings, force_or: bool) -> Self {
        Self {
            evaluate_as_or: force_or || settings.evaluate_as_or,
            evaluate_values_as_or: settings.evaluate_values_as_or,
        }
    }
}

impl FilterFile {
    /// Reads and validates a filter file.
    pub fn load(path: PathBuf, defaults: GroupDefaults) -> Result<Self, InputError> {
        let contents = fs::read_to_string(&path).map_err(|source| InputError::Read {
            path: path.clone(),
            source,
        })?;
        Self::parse(&contents, path, defaults)
    }

    /// Parses and validates filter JSON; `path` is only used in errors.
    pub fn parse(contents: &str, path: PathBuf, defaults: GroupDefaults) -> Result<Self, InputError> {
        let parse_error = |source| InputError::Parse {
            path: path.clone(),
            source,
        };
        let value: Value = serde_json::from_str(contents).map_err(parse_error)?;

        let (grouped, raw_groups) = match value {
            Value::Array(_) => {
                let filters = serde_json::from_value(value).map_err(parse_error)?;
                let group = RawGroup {
                    evaluate_as_or: None,
                    mandatory: None,
                    filters,
                };
                (false, vec![group])
            }
            Value::Object(ref object) if object.contains_key("groups") => {
                let document: GroupedDocument =
                    serde_json::from_value(value).map_err(parse_error)?;
                (true, document.groups)
            }
            _ => return Err(InputError::Shape { path }),
        };

        let groups = raw_groups
            .into_iter()
            .enumerate()
            .map(|(group, raw)| validate_group(group, raw, defaults))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            path = %path.display(),
            groups = groups.len(),
            filters = groups.iter().map(|g| g.filters.len()).sum::<usize>(),
            "loaded filter file"
        );
        Ok(Self { grouped, groups })
    }

    /// Assembles every group and appends it to a builder for `index`.
    pub fn builder(&self, index: &str) -> Result<QueryBuilder, QueryError> {
        let mut builder = QueryBuilder::new(index)?;
        for group in &self.groups {
            builder.append_with(&group.assemble()?, group.mandatory)?;
        }
        Ok(builder)
    }
}

/// Validates one group's filters, applying defaults.
fn validate_group(
    group: usize,
    raw: RawGroup,
    defaults: GroupDefaults,
) -> Result<FilterGroup, InputError> {
    let filters = raw
        .filters
        .into_iter()
        .enumerate()
        .map(|(filter, input)| {
            input
                .into_specification(defaults.evaluate_values_as_or)
                .map_err(|source| InputError::Filter {
                    group,
                    filter,
                    source,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(FilterGroup {
        evaluate_as_or: raw.evaluate_as_or.unwrap_or(defaults.evaluate_as_or),
        mandatory: raw.mandatory.unwrap_or(true),
        filters,
    })
}
