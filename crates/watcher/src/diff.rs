//! Classifying the difference between two snapshots

use crate::snapshot::{display_key, Snapshot};
use pollwatch_core::ActionKind;
use std::fmt;
use std::path::PathBuf;

/// A changed path and how it changed
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChangeRecord {
    /// Root-relative path, `/`-separated, used for matching and logs
    pub path: String,
    /// Root-relative path as found on disk
    pub rel_path: PathBuf,
    /// Kind of change
    pub action: ActionKind,
}

impl ChangeRecord {
    /// Create a new change record for a root-relative path
    pub fn new(rel_path: impl Into<PathBuf>, action: ActionKind) -> Self {
        let rel_path = rel_path.into();
        Self {
            path: display_key(&rel_path),
            rel_path,
            action,
        }
    }
}

impl fmt::Display for ChangeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.action, self.path)
    }
}

/// Compute the changes between `old` and `new`
///
/// - in `old` only: DELETE
/// - in both with a strictly newer time in `new`: UPDATE
/// - in `new` only: CREATE
///
/// Equal (or older) times produce nothing. Each path yields at most one
/// record. The result is sorted by path; callers must not rely on that.
pub fn diff(old: &Snapshot, new: &Snapshot) -> Vec<ChangeRecord> {
    let mut changes = Vec::new();

    for (path, old_time) in old.iter() {
        match new.get(path) {
            None => changes.push(ChangeRecord::new(path, ActionKind::Delete)),
            Some(new_time) if new_time > old_time => {
                changes.push(ChangeRecord::new(path, ActionKind::Update))
            }
            Some(_) => {}
        }
    }

    for (path, _) in new.iter() {
        if !old.contains(path) {
            changes.push(ChangeRecord::new(path, ActionKind::Create));
        }
    }

    changes.sort();
    changes
}
