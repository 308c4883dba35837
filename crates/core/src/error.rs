//! Configuration error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating handler configuration.
///
/// All of these are fatal at startup: no watching begins until the
/// configuration loads cleanly.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("Unknown action '{0}' (expected CREATE, UPDATE or DELETE)")]
    UnknownAction(String),

    #[error("Handler '{pattern}' has no actions")]
    NoActions { pattern: String },

    #[error("Handler pattern '{pattern}' is not a valid regular expression: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Handler '{pattern}' has an empty script")]
    EmptyScript { pattern: String },

    #[error("Invalid exclude pattern '{pattern}': {reason}")]
    InvalidExclude { pattern: String, reason: String },

    #[error("Configuration defines no handlers")]
    NoHandlers,
}
