//! Configuration system for esq.
//!
//! esq reads TOML files named `.esq.toml`. Files are discovered by walking up from the working
//! directory; `~/.esq.toml` is loaded last with the lowest precedence. A file with `root = true`
//! ends the walk and suppresses the global file.

#![warn(missing_docs)]

mod discovery;
mod error;
mod merge;
mod parse;
mod templates;
#[cfg(test)]
mod test_support;
mod validate;

use std::path::{Path, PathBuf};

pub use discovery::{
    CONFIG_FILENAME, discover_config_files, global_config_path, is_global_config,
    require_global_config_path,
};
pub use error::ConfigError;
use esq_query::{DEFAULT_AGGREGATION_SIZE, QueryError, SortField};
pub use merge::{ParsedConfig, merge_configs};
pub use parse::{
    RawAggregationSettings, RawConfig, RawFilterSettings, RawSearchSettings, parse_config_file,
    parse_config_str,
};
use serde::{Deserialize, Serialize};
pub use templates::{global_template, local_template};
pub use validate::ConfigWarning;
use validate::validate_config;

/// Effective configuration after merging every discovered file.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// How filters are combined.
    pub filters: FilterSettings,
    /// Search request defaults.
    pub search: SearchSettings,
    /// Aggregation request defaults.
    pub aggregation: AggregationSettings,
    /// Directory of the highest-precedence config file.
    pub config_root: Option<PathBuf>,
    /// Files the configuration was merged from, highest precedence first.
    pub sources: Vec<PathBuf>,
}

impl Config {
    /// Discovers and merges every `.esq.toml` that applies to `cwd`.
    ///
    /// Returns the defaults if no file is found.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        Self::load_from_files(&discover_config_files(cwd))
    }

    /// Parses and merges `files`, given highest precedence first.
    pub fn load_from_files(files: &[PathBuf]) -> Result<Self, ConfigError> {
        let parsed = files
            .iter()
            .map(|path| {
                Ok(ParsedConfig {
                    path: path.clone(),
                    config: parse_config_file(path)?,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(merge_configs(&parsed))
    }

    /// Returns non-fatal problems with the effective settings.
    pub fn validate(&self) -> Vec<ConfigWarning> {
        validate_config(self)
    }

    /// Serializes the effective settings in `.esq.toml` form.
    pub fn settings_to_toml(&self) -> Result<String, toml::ser::Error> {
        let serializable = SerializableSettings {
            filters: &self.filters,
            search: &self.search,
            aggregation: &self.aggregation,
        };
        toml::to_string_pretty(&serializable)
    }
}

/// `[filters]`: how filters are combined.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct FilterSettings {
    /// OR filters on the same index instead of AND-ing them.
    pub evaluate_as_or: bool,
    /// OR a filter's values when the filter doesn't say.
    pub evaluate_values_as_or: bool,
}

/// `[search]`: search request defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Hits per page.
    pub page_size: usize,
    /// Sort entries as written, `field:direction`.
    pub sort: Vec<String>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            page_size: 10,
            sort: Vec::new(),
        }
    }
}

impl SearchSettings {
    /// Parses the sort entries, failing on the first malformed one.
    pub fn sort_fields(&self) -> Result<Vec<SortField>, QueryError> {
        self.sort.iter().map(|entry| entry.parse()).collect()
    }
}

/// `[aggregation]`: aggregation request defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AggregationSettings {
    /// Composite aggregation page size.
    pub size: usize,
    /// Name of the composite source.
    pub key: String,
}

impl Default for AggregationSettings {
    fn default() -> Self {
        Self {
            size: DEFAULT_AGGREGATION_SIZE,
            key: String::from("key"),
        }
    }
}

/// The settings sections, in file order.
#[derive(Serialize)]
struct SerializableSettings<'a> {
    /// `[filters]`.
    filters: &'a FilterSettings,
    /// `[search]`.
    search: &'a SearchSettings,
    /// `[aggregation]`.
    aggregation: &'a AggregationSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert!(!config.filters.evaluate_as_or);
        assert!(!config.filters.evaluate_values_as_or);
        assert_eq!(config.search.page_size, 10);
        assert!(config.search.sort.is_empty());
        assert_eq!(config.aggregation.size, 1000);
        assert_eq!(config.aggregation.key, "key");
        assert!(config.config_root.is_none());
    }

    #[test]
    fn sort_fields_parse_entries() {
        let search = SearchSettings {
            page_size: 10,
            sort: vec!["age:desc".into(), "name".into()],
        };
        assert_eq!(
            search.sort_fields().unwrap(),
            [SortField::desc("age"), SortField::asc("name")]
        );

        let bad = SearchSettings {
            page_size: 10,
            sort: vec!["age:sideways".into()],
        };
        assert!(bad.sort_fields().is_err());
    }

    #[test]
    fn settings_to_toml_round_trips() {
        let mut config = Config::default();
        config.search.sort = vec!["age:desc".into()];
        config.aggregation.key = "bucket".into();

        let toml = config.settings_to_toml().unwrap();
        assert!(toml.contains("[filters]"));
        assert!(toml.contains("[search]"));
        assert!(toml.contains("[aggregation]"));
        assert!(toml.contains("page_size = 10"));

        let raw = parse_config_str(&toml, Path::new("effective.toml")).unwrap();
        let reloaded = merge_configs(&[ParsedConfig {
            path: PathBuf::from("/x/.esq.toml"),
            config: raw,
        }]);
        assert_eq!(reloaded.search, config.search);
        assert_eq!(reloaded.aggregation, config.aggregation);
        assert_eq!(reloaded.filters, config.filters);
    }
}
