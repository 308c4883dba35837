//! Change action kinds

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// Kind of change observed between two snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActionKind {
    /// Path absent in the old snapshot, present in the new one
    Create,
    /// Path present in both, with a strictly newer modification time
    Update,
    /// Path present in the old snapshot, absent in the new one
    Delete,
}

impl ActionKind {
    /// All action kinds, in declaration order
    pub const ALL: [ActionKind; 3] = [ActionKind::Create, ActionKind::Update, ActionKind::Delete];

    /// Upper-case configuration name of this action
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Create => "CREATE",
            ActionKind::Update => "UPDATE",
            ActionKind::Delete => "DELETE",
        }
    }

    fn bit(self) -> u8 {
        match self {
            ActionKind::Create => 0b001,
            ActionKind::Update => 0b010,
            ActionKind::Delete => 0b100,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = ConfigError;

    /// Parse a configuration action name. Names are case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CREATE" => Ok(ActionKind::Create),
            "UPDATE" => Ok(ActionKind::Update),
            "DELETE" => Ok(ActionKind::Delete),
            other => Err(ConfigError::UnknownAction(other.to_string())),
        }
    }
}

/// Set of accepted action kinds for a handler
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ActionSet(u8);

impl ActionSet {
    /// Empty set
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Set containing every action kind
    pub const fn all() -> Self {
        Self(0b111)
    }

    /// Add an action kind to the set
    pub fn insert(&mut self, action: ActionKind) {
        self.0 |= action.bit();
    }

    /// Check whether the set accepts `action`
    pub fn contains(&self, action: ActionKind) -> bool {
        self.0 & action.bit() != 0
    }

    /// Check if the set is empty
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Iterate over the contained actions in declaration order
    pub fn iter(&self) -> impl Iterator<Item = ActionKind> + '_ {
        ActionKind::ALL.into_iter().filter(move |a| self.contains(*a))
    }
}

impl FromIterator<ActionKind> for ActionSet {
    fn from_iter<I: IntoIterator<Item = ActionKind>>(iter: I) -> Self {
        let mut set = ActionSet::empty();
        for action in iter {
            set.insert(action);
        }
        set
    }
}

impl fmt::Display for ActionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(|a| a.as_str()).collect();
        write!(f, "{}", names.join(", "))
    }
}
