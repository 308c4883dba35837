//! Handler configuration loading
//!
//! Configuration is read once at startup. The format is picked by file
//! extension: `.json` is parsed as JSON, everything else as TOML.
//!
//! ```toml
//! exclude = ["*.swp"]
//!
//! [[handlers]]
//! pattern = "\\.pdf$"
//! actions = ["UPDATE"]
//! script = "./convert.sh"
//! ```

use crate::action::{ActionKind, ActionSet};
use crate::error::ConfigError;
use crate::rules::HandlerRule;
use crate::Result;
use ignore::gitignore::GitignoreBuilder;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WatchConfig {
    /// Gitignore-style patterns excluded from snapshots
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Handler definitions, in registration order
    #[serde(default)]
    pub handlers: Vec<HandlerConfig>,
}

/// One `[[handlers]]` entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HandlerConfig {
    /// Regular expression searched for in changed paths
    pub pattern: String,
    /// Action names: `CREATE`, `UPDATE`, `DELETE`
    pub actions: Vec<String>,
    /// Executable invoked with the changed path
    pub script: PathBuf,
}

impl HandlerConfig {
    /// Parse the action names into a set
    pub fn action_set(&self) -> Result<ActionSet> {
        self.actions
            .iter()
            .map(|name| name.parse::<ActionKind>())
            .collect()
    }

    /// Compile into a [`HandlerRule`]
    pub fn compile(&self) -> Result<HandlerRule> {
        HandlerRule::new(&self.pattern, self.action_set()?, self.script.clone())
    }
}

impl WatchConfig {
    /// Load and validate a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let config = if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
        .map_err(|reason| ConfigError::Parse {
            path: path.to_path_buf(),
            reason,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Parse TOML text without validating it
    pub fn from_toml_str(content: &str) -> std::result::Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Parse JSON text without validating it
    pub fn from_json_str(content: &str) -> std::result::Result<Self, String> {
        serde_json::from_str(content).map_err(|e| e.to_string())
    }

    /// Validate handlers and exclude patterns
    ///
    /// Every handler must compile; every exclude pattern must be a valid
    /// gitignore glob.
    pub fn validate(&self) -> Result<()> {
        if self.handlers.is_empty() {
            return Err(ConfigError::NoHandlers);
        }

        for handler in &self.handlers {
            handler.compile()?;
        }

        let mut builder = GitignoreBuilder::new("");
        for pattern in &self.exclude {
            builder
                .add_line(None, pattern)
                .map_err(|e| ConfigError::InvalidExclude {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const TOML_CONFIG: &str = r#"
exclude = ["*.swp"]

[[handlers]]
pattern = "\\.pdf$"
actions = ["UPDATE"]
script = "./convert.sh"

[[handlers]]
pattern = "draft"
actions = ["CREATE", "DELETE"]
script = "/usr/local/bin/notify"
"#;

    #[test]
    fn test_load_toml_preserves_order() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("pollwatch.toml");
        fs::write(&path, TOML_CONFIG).unwrap();

        let config = WatchConfig::load(&path).unwrap();
        assert_eq!(config.exclude, vec!["*.swp".to_string()]);
        assert_eq!(config.handlers.len(), 2);
        assert_eq!(config.handlers[0].pattern, r"\.pdf$");
        assert_eq!(config.handlers[1].script, PathBuf::from("/usr/local/bin/notify"));

        let actions = config.handlers[1].action_set().unwrap();
        assert!(actions.contains(ActionKind::Create));
        assert!(actions.contains(ActionKind::Delete));
        assert!(!actions.contains(ActionKind::Update));
    }

    #[test]
    fn test_load_json_by_extension() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("handlers.json");
        fs::write(
            &path,
            r#"{"handlers": [{"pattern": "\\.txt$", "actions": ["CREATE", "UPDATE"], "script": "echo"}]}"#,
        )
        .unwrap();

        let config = WatchConfig::load(&path).unwrap();
        assert!(config.exclude.is_empty());
        assert_eq!(config.handlers[0].actions, vec!["CREATE", "UPDATE"]);
    }

    #[test]
    fn test_unknown_action_fails_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.toml");
        fs::write(
            &path,
            "[[handlers]]\npattern = \"x\"\nactions = [\"MOVE\"]\nscript = \"s\"\n",
        )
        .unwrap();

        let err = WatchConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownAction(ref name) if name == "MOVE"));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = WatchConfig::load(&temp_dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let err = WatchConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_validate_rejects_empty_and_bad_patterns() {
        assert!(matches!(
            WatchConfig::default().validate().unwrap_err(),
            ConfigError::NoHandlers
        ));

        let config = WatchConfig::from_toml_str(
            "[[handlers]]\npattern = \"[a-\"\nactions = [\"CREATE\"]\nscript = \"s\"\n",
        )
        .unwrap();
        assert!(matches!(
            config.validate().unwrap_err(),
            ConfigError::InvalidPattern { .. }
        ));

        let config = WatchConfig::from_toml_str(
            "[[handlers]]\npattern = \"a\"\nactions = []\nscript = \"s\"\n",
        )
        .unwrap();
        assert!(matches!(config.validate().unwrap_err(), ConfigError::NoActions { .. }));
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let result = WatchConfig::from_toml_str(
            "[[handlers]]\npattern = \"a\"\nactions = [\"CREATE\"]\ncommand = \"s\"\n",
        );
        assert!(result.is_err());
    }
}
