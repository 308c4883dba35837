//! Polling file watcher for pollwatch
//!
//! This crate provides snapshot-based change detection with:
//! - Directory snapshots (path -> modification time), recursive or flat
//! - Snapshot diffing into CREATE / UPDATE / DELETE records
//! - Routing of changes to handler scripts, with per-path debouncing
//! - A background polling session with cooperative start/stop
//!
//! # Example
//!
//! ```no_run
//! use pollwatch_core::{HandlerRegistry, WatchConfig};
//! use pollwatch_watcher::Watcher;
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = WatchConfig::load(Path::new("pollwatch.toml"))?;
//! let registry = HandlerRegistry::from_config(&config)?;
//!
//! let mut watcher = Watcher::builder("/path/to/dir")
//!     .recursive(true)
//!     .exclude(config.exclude.clone())
//!     .build(registry)?;
//!
//! watcher.start()?;
//! // ... later
//! watcher.stop()?;
//! # Ok(())
//! # }
//! ```

pub mod debounce;
pub mod diff;
pub mod dispatch;
pub mod error;
pub mod exclude;
pub mod session;
pub mod sink;
pub mod snapshot;

// Re-exports
pub use debounce::{Debouncer, DEBOUNCE_WINDOW};
pub use diff::{diff, ChangeRecord};
pub use dispatch::{Dispatcher, Launcher, ScriptLauncher, ScriptOutput};
pub use error::WatchError;
pub use exclude::ExcludeRules;
pub use session::{Watcher, WatcherBuilder, POLL_INTERVAL};
pub use sink::{FileSink, LogSink, MemorySink, StdoutSink};
pub use snapshot::{display_key, Snapshot};
