//! Core types for pollwatch
//!
//! This crate provides:
//! - Change action kinds (`CREATE`, `UPDATE`, `DELETE`) and action sets
//! - Handler rules (pattern, accepted actions, script)
//! - The ordered handler registry used to route changed paths
//! - Configuration loading and validation (TOML or JSON)

pub mod action;
pub mod config;
pub mod error;
pub mod rules;

// Re-exports
pub use action::{ActionKind, ActionSet};
pub use config::{HandlerConfig, WatchConfig};
pub use error::ConfigError;
pub use rules::{HandlerRegistry, HandlerRule};

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
