//! Error types for esq configuration.

use std::{io, path::PathBuf};

use thiserror::Error;
use toml::de;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configuration file couldn't be read.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path to the unreadable file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A configuration file isn't valid TOML or doesn't match the schema.
    #[error("failed to parse config file {path}: {source}")]
    ParseToml {
        /// Path to the malformed file.
        path: PathBuf,
        /// Underlying TOML error.
        source: de::Error,
    },

    /// The home directory couldn't be determined.
    #[error("could not determine home directory")]
    NoHomeDirectory,
}
