//! Per-handler, per-path debouncing
//!
//! The same filesystem event can surface on two consecutive polls (for
//! example a write that straddles a poll boundary). A handler that fired
//! for a path is not fired again for that path until the window has
//! elapsed. State is keyed by (handler, path), so two different files
//! routed to the same handler never suppress each other.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::debug;

/// Fixed suppression window
pub const DEBOUNCE_WINDOW: Duration = Duration::from_secs(1);

/// Last successful trigger time per (handler index, path)
#[derive(Debug, Default)]
pub struct Debouncer {
    last_fired: HashMap<(usize, PathBuf), Instant>,
}

impl Debouncer {
    /// Create an empty debouncer
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide whether `handler` may fire for `path` at `now`
    ///
    /// Returns `true` and records `now` as the new trigger time when the
    /// handler has not fired for this path within the window. Suppressed
    /// calls leave the recorded time untouched.
    pub fn try_fire(&mut self, handler: usize, path: impl AsRef<Path>, now: Instant) -> bool {
        let path = path.as_ref();
        let key = (handler, path.to_path_buf());

        if let Some(last) = self.last_fired.get(&key) {
            if now.saturating_duration_since(*last) < DEBOUNCE_WINDOW {
                debug!("Debounced handler #{} for {}", handler, path.display());
                return false;
            }
        }

        self.last_fired.insert(key, now);
        true
    }

    /// Drop entries whose window has already elapsed
    pub fn prune(&mut self, now: Instant) {
        self.last_fired
            .retain(|_, last| now.saturating_duration_since(*last) < DEBOUNCE_WINDOW);
    }

    /// Number of tracked (handler, path) pairs
    pub fn tracked(&self) -> usize {
        self.last_fired.len()
    }
}
