//! Point-in-time snapshots of a directory tree
//!
//! A snapshot maps every file under the watched root to its last
//! modification time. Entries are keyed by the real root-relative path;
//! [`display_key`] renders one with `/` separators for pattern matching
//! and logs. Symlinks are followed, so a link reports its target's time.

use crate::error::WatchError;
use crate::exclude::ExcludeRules;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Immutable map of root-relative path -> modification time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    entries: BTreeMap<PathBuf, SystemTime>,
}

impl Snapshot {
    /// Capture the tree rooted at `root`
    ///
    /// With `recursive` set, every descendant file is recorded and
    /// directories only contribute their children. Without it, only the
    /// direct children of `root` are visited, and a child directory is
    /// recorded like a file since the walk stops there.
    ///
    /// Fails if `root` is missing, not a directory, or unreadable. Entries
    /// that vanish while the walk is in progress, dangling links and link
    /// cycles are skipped.
    pub fn capture(root: &Path, recursive: bool) -> Result<Self, WatchError> {
        Self::capture_with(root, recursive, &ExcludeRules::none())
    }

    /// Capture, skipping paths matched by `exclude`
    pub fn capture_with(
        root: &Path,
        recursive: bool,
        exclude: &ExcludeRules,
    ) -> Result<Self, WatchError> {
        let root_meta = std::fs::metadata(root).map_err(|source| WatchError::Snapshot {
            path: root.to_path_buf(),
            source,
        })?;
        if !root_meta.is_dir() {
            return Err(WatchError::Snapshot {
                path: root.to_path_buf(),
                source: std::io::Error::other("not a directory"),
            });
        }

        let max_depth = if recursive { usize::MAX } else { 1 };
        let mut entries = BTreeMap::new();

        let walker = WalkDir::new(root)
            .min_depth(1)
            .max_depth(max_depth)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| {
                let rel = e.path().strip_prefix(root).unwrap_or(e.path());
                !exclude.is_excluded(rel, e.file_type().is_dir())
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => return Err(e.into()),
                Err(e) => {
                    if e.io_error().map(|io| io.kind()) == Some(ErrorKind::NotFound) {
                        debug!("Entry vanished during snapshot: {}", e);
                    } else {
                        warn!("Skipping unreadable entry during snapshot: {}", e);
                    }
                    continue;
                }
            };

            // Directories we descend into contribute only their children
            if recursive && entry.file_type().is_dir() {
                continue;
            }

            // Follows links, so edits to a link's target are seen
            let mtime = match std::fs::metadata(entry.path()).and_then(|m| m.modified()) {
                Ok(mtime) => mtime,
                Err(e) => {
                    debug!("Skipping entry without metadata: {}: {}", entry.path().display(), e);
                    continue;
                }
            };

            let rel_path = entry.path().strip_prefix(root).unwrap_or(entry.path());
            entries.insert(rel_path.to_path_buf(), mtime);
        }

        Ok(Self { entries })
    }

    /// Modification time recorded for a root-relative path
    pub fn get(&self, path: impl AsRef<Path>) -> Option<SystemTime> {
        self.entries.get(path.as_ref()).copied()
    }

    /// Check whether a root-relative path was present at capture time
    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.entries.contains_key(path.as_ref())
    }

    /// Iterate entries in path order
    pub fn iter(&self) -> impl Iterator<Item = (&Path, SystemTime)> {
        self.entries.iter().map(|(k, v)| (k.as_path(), *v))
    }

    /// Number of recorded entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the snapshot is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(PathBuf, SystemTime)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (PathBuf, SystemTime)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Render a root-relative path with `/` separators
///
/// Names that are not valid UTF-8 are rendered lossily; the snapshot
/// itself keeps the real path.
pub fn display_key(rel_path: &Path) -> String {
    rel_path
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
