//! Configuration file parsing.
//!
//! Each `.esq.toml` file is parsed into a [`RawConfig`] whose fields are all optional, so a file
//! only overrides the settings it mentions.

use std::{fs, path::Path};

use serde::Deserialize;
use serde_with::{OneOrMany, serde_as};
#[cfg(test)]
use toml::de::Error as TomlError;

use crate::ConfigError;

/// Configuration as written in one file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawConfig {
    /// When true, discovery stops here: parent and global configs are ignored.
    pub root: Option<bool>,
    /// `[filters]` section.
    pub filters: Option<RawFilterSettings>,
    /// `[search]` section.
    pub search: Option<RawSearchSettings>,
    /// `[aggregation]` section.
    pub aggregation: Option<RawAggregationSettings>,
}

/// Raw `[filters]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawFilterSettings {
    /// OR filters on the same index instead of AND-ing them.
    pub evaluate_as_or: Option<bool>,
    /// OR a filter's values when the filter doesn't say.
    pub evaluate_values_as_or: Option<bool>,
}

/// Raw `[search]` section.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawSearchSettings {
    /// Hits per page.
    pub page_size: Option<usize>,
    /// Sort entries. Accepts a single string or an array.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub sort: Option<Vec<String>>,
}

/// Raw `[aggregation]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawAggregationSettings {
    /// Composite aggregation page size.
    pub size: Option<usize>,
    /// Name of the composite source.
    pub key: Option<String>,
}

/// Parses a configuration file from disk.
pub fn parse_config_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config_str(&contents, path)
}

/// Parses configuration from a TOML string; `path` is only used in errors.
pub fn parse_config_str(contents: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses configuration from a TOML string without path context.
#[cfg(test)]
pub fn parse_config(contents: &str) -> Result<RawConfig, TomlError> {
    toml::from_str(contents)
}

/// Returns true if the file at `path` sets `root = true`.
///
/// Unreadable or malformed files count as not root; loading reports them later.
pub fn is_root_config(path: &Path) -> bool {
    let Ok(contents) = fs::read_to_string(path) else {
        return false;
    };
    let Ok(config) = toml::from_str::<RawConfig>(&contents) else {
        return false;
    };
    config.root == Some(true)
}
