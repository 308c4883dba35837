//! Error types for snapshotting and the watch session

use std::path::PathBuf;
use thiserror::Error;

/// Errors from watcher operations
#[derive(Error, Debug)]
pub enum WatchError {
    #[error("Failed to snapshot {path}: {source}")]
    Snapshot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid exclude rules: {reason}")]
    Exclude { reason: String },

    #[error("Watcher is already running")]
    AlreadyRunning,

    #[error("Watcher is not running")]
    NotRunning,

    #[error("Polling thread panicked")]
    WorkerPanicked,

    #[error("Failed to spawn polling thread: {0}")]
    Spawn(#[source] std::io::Error),
}

impl From<walkdir::Error> for WatchError {
    fn from(e: walkdir::Error) -> Self {
        let path = e.path().map(|p| p.to_path_buf()).unwrap_or_default();
        let source = e
            .into_io_error()
            .unwrap_or_else(|| std::io::Error::other("filesystem loop detected"));
        WatchError::Snapshot { path, source }
    }
}
