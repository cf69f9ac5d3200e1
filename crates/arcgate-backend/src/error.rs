//! Error types for backend descriptors and gateway configuration.

use std::path::PathBuf;

/// Errors raised while loading or validating configuration.
///
/// Descriptor-level variants (`MissingField`, `InvalidTemplate`,
/// `InvalidRegex`) reject a single backend; the registry logs them and
/// keeps going. File-level variants (`Io`, `Toml`, `Parse`) reject the
/// whole load.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required value is absent. Carries the config key.
    #[error("missing configuration value: {0}")]
    MissingField(&'static str),

    /// A request template could not be parsed or formatted.
    #[error("illegal template: {0}")]
    InvalidTemplate(String),

    /// A name pattern does not compile.
    #[error("invalid name pattern {pattern:?}: {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error in {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
}
