//! Configuration merging.
//!
//! Files are applied lowest precedence first, so for every field the value from the file closest
//! to the working directory wins. Sections and fields a file doesn't mention are left alone.

use std::path::PathBuf;

use crate::{
    AggregationSettings, Config, FilterSettings, SearchSettings,
    parse::{RawAggregationSettings, RawConfig, RawFilterSettings, RawSearchSettings},
};

/// A parsed config file with its source path.
#[derive(Debug, Clone)]
pub struct ParsedConfig {
    /// Path the config was read from.
    pub path: PathBuf,
    /// Parsed contents.
    pub config: RawConfig,
}

/// Merges parsed files, given highest precedence first, into one [`Config`].
pub fn merge_configs(configs: &[ParsedConfig]) -> Config {
    let mut merged = Config {
        config_root: configs
            .first()
            .and_then(|parsed| parsed.path.parent())
            .map(PathBuf::from),
        sources: configs.iter().map(|parsed| parsed.path.clone()).collect(),
        ..Config::default()
    };

    for parsed in configs.iter().rev() {
        let raw = &parsed.config;
        if let Some(filters) = &raw.filters {
            apply_filters(&mut merged.filters, filters);
        }
        if let Some(search) = &raw.search {
            apply_search(&mut merged.search, search);
        }
        if let Some(aggregation) = &raw.aggregation {
            apply_aggregation(&mut merged.aggregation, aggregation);
        }
    }

    merged
}

/// Overwrites filter settings present in `raw`.
fn apply_filters(result: &mut FilterSettings, raw: &RawFilterSettings) {
    if let Some(v) = raw.evaluate_as_or {
        result.evaluate_as_or = v;
    }
    if let Some(v) = raw.evaluate_values_as_or {
        result.evaluate_values_as_or = v;
    }
}

/// Overwrites search settings present in `raw`. A sort list replaces the previous one whole.
fn apply_search(result: &mut SearchSettings, raw: &RawSearchSettings) {
    if let Some(v) = raw.page_size {
        result.page_size = v;
    }
    if let Some(v) = &raw.sort {
        result.sort.clone_from(v);
    }
}

/// Overwrites aggregation settings present in `raw`.
fn apply_aggregation(result: &mut AggregationSettings, raw: &RawAggregationSettings) {
    if let Some(v) = raw.size {
        result.size = v;
    }
    if let Some(v) = &raw.key {
        result.key.clone_from(v);
    }
}
