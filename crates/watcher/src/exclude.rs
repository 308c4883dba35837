//! Exclude rules applied while capturing snapshots
//!
//! Patterns use gitignore syntax (`*.swp`, `build/`, `!keep.log`) and are
//! matched against paths relative to the watched root. An excluded
//! directory is never descended into.

use crate::error::WatchError;
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::path::Path;

/// Compiled exclude patterns
#[derive(Debug, Clone, Default)]
pub struct ExcludeRules {
    matcher: Option<Gitignore>,
}

impl ExcludeRules {
    /// Rules that exclude nothing
    pub fn none() -> Self {
        Self::default()
    }

    /// Compile gitignore-style patterns rooted at `root`
    pub fn new<S: AsRef<str>>(root: &Path, patterns: &[S]) -> Result<Self, WatchError> {
        if patterns.is_empty() {
            return Ok(Self::none());
        }

        let mut builder = GitignoreBuilder::new(root);
        for pattern in patterns {
            builder
                .add_line(None, pattern.as_ref())
                .map_err(|e| WatchError::Exclude {
                    reason: e.to_string(),
                })?;
        }

        let matcher = builder.build().map_err(|e| WatchError::Exclude {
            reason: e.to_string(),
        })?;

        Ok(Self {
            matcher: Some(matcher),
        })
    }

    /// Check whether a root-relative path is excluded
    pub fn is_excluded(&self, rel_path: &Path, is_dir: bool) -> bool {
        match &self.matcher {
            Some(matcher) => matcher.matched(rel_path, is_dir).is_ignore(),
            None => false,
        }
    }

    /// Number of compiled patterns
    pub fn len(&self) -> usize {
        self.matcher.as_ref().map(|m| m.num_ignores() as usize + m.num_whitelists() as usize).unwrap_or(0)
    }

    /// Check if no patterns are active
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
