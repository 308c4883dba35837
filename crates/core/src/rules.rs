//! Handler rules and the ordered registry that routes changed paths to them

use crate::action::{ActionKind, ActionSet};
use crate::config::WatchConfig;
use crate::error::ConfigError;
use crate::Result;
use regex::Regex;
use std::path::{Path, PathBuf};

/// A (pattern, accepted actions, script) triple
///
/// The pattern is searched for anywhere in the changed path (unanchored),
/// so `draft` matches `old/draft.pdf`. Use `^`/`$` to anchor explicitly.
#[derive(Debug, Clone)]
pub struct HandlerRule {
    pattern: Regex,
    actions: ActionSet,
    script: PathBuf,
}

impl HandlerRule {
    /// Compile a new rule
    pub fn new(pattern: &str, actions: ActionSet, script: impl Into<PathBuf>) -> Result<Self> {
        let script = script.into();

        if actions.is_empty() {
            return Err(ConfigError::NoActions {
                pattern: pattern.to_string(),
            });
        }
        if script.as_os_str().is_empty() {
            return Err(ConfigError::EmptyScript {
                pattern: pattern.to_string(),
            });
        }

        let regex = Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;

        Ok(Self {
            pattern: regex,
            actions,
            script,
        })
    }

    /// Source text of the pattern
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Accepted action kinds
    pub fn actions(&self) -> ActionSet {
        self.actions
    }

    /// Script invoked when this rule fires
    pub fn script(&self) -> &Path {
        &self.script
    }

    /// Check whether the pattern occurs anywhere in `path`
    pub fn matches(&self, path: &str) -> bool {
        self.pattern.is_match(path)
    }

    /// Check whether this rule fires for `action`
    pub fn accepts(&self, action: ActionKind) -> bool {
        self.actions.contains(action)
    }
}

/// Ordered collection of handler rules
///
/// Registration order is preserved and is the order in which matching
/// rules are returned, so multi-match dispatch is deterministic.
#[derive(Debug, Clone, Default)]
pub struct HandlerRegistry {
    rules: Vec<HandlerRule>,
}

impl HandlerRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a loaded configuration, in file order
    pub fn from_config(config: &WatchConfig) -> Result<Self> {
        let mut registry = Self::new();
        for handler in &config.handlers {
            registry.register(handler.compile()?);
        }
        Ok(registry)
    }

    /// Append a rule; it matches after every rule registered before it
    pub fn register(&mut self, rule: HandlerRule) {
        self.rules.push(rule);
    }

    /// Every rule whose pattern matches `path`, in registration order
    ///
    /// Each item carries the rule's registration index, which stays stable
    /// for the registry's lifetime.
    pub fn resolve<'a>(&'a self, path: &'a str) -> impl Iterator<Item = (usize, &'a HandlerRule)> + 'a {
        self.rules
            .iter()
            .enumerate()
            .filter(move |(_, rule)| rule.matches(path))
    }

    /// All registered rules
    pub fn rules(&self) -> &[HandlerRule] {
        &self.rules
    }

    /// Number of registered rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if no rules are registered
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
