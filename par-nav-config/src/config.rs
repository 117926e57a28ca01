//! `NavigatorConfig` struct, persistence, and validation.
//!
//! Covers:
//! - `load` / `save` (YAML file I/O with atomic write)
//! - `load_from` / `save_to` for explicit paths
//! - XDG-compliant path helpers (`config_path`, `config_dir`)
//! - Semantic validation (`validate`)

use crate::defaults;
use crate::error::ConfigError;
use crate::types::{LogLevel, PopPolicy};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Runtime settings for a `Navigator`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigatorConfig {
    /// Policy used by `navigate_back`-style pops that are not driven by
    /// `resolve_back`
    #[serde(default = "defaults::pop_policy")]
    pub pop_policy: PopPolicy,

    /// Key given to the root stack when the navigator wraps a bare
    /// destination into a tree
    #[serde(default = "defaults::root_stack_key")]
    pub root_stack_key: String,

    /// Prefix for sequential keys (only used when `use_uuid_keys` is false)
    #[serde(default = "defaults::key_prefix")]
    pub key_prefix: String,

    /// Generate node keys from random UUIDs instead of a counter
    #[serde(default = "defaults::bool_true")]
    pub use_uuid_keys: bool,

    /// Run result cancellation on the committing thread instead of the
    /// reconcile task
    #[serde(default = "defaults::bool_false")]
    pub reconcile_inline: bool,

    /// Upper bound on the pops performed by a single `pop_to`
    #[serde(default = "defaults::max_pop_to_steps")]
    pub max_pop_to_steps: usize,

    /// Level applied to the navigator's `log` output
    #[serde(default = "defaults::log_level")]
    pub log_level: LogLevel,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            pop_policy: defaults::pop_policy(),
            root_stack_key: defaults::root_stack_key(),
            key_prefix: defaults::key_prefix(),
            use_uuid_keys: defaults::bool_true(),
            reconcile_inline: defaults::bool_false(),
            max_pop_to_steps: defaults::max_pop_to_steps(),
            log_level: defaults::log_level(),
        }
    }
}

impl NavigatorConfig {
    /// Load configuration from the default path, falling back to defaults
    /// when no file exists yet.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();
        log::info!("Navigator config path: {:?}", config_path);

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            log::info!("Navigator config not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load and validate configuration from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        log::info!("Loading navigator config from {:?}", path);
        let contents = fs::read_to_string(path).map_err(ConfigError::from)?;
        let config: NavigatorConfig =
            serde_yaml_ng::from_str(&contents).map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Save configuration to an explicit path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(ConfigError::from)?;
        }

        let yaml = serde_yaml_ng::to_string(self).map_err(ConfigError::from)?;

        // Atomic save: write to temp file then rename to prevent corruption on crash
        let temp_path = path.with_extension("yaml.tmp");
        fs::write(&temp_path, &yaml).map_err(ConfigError::from)?;
        fs::rename(&temp_path, path).map_err(ConfigError::from)?;

        Ok(())
    }

    /// Directory holding par-nav configuration files
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("par-nav")
    }

    /// Get the configuration file path (using XDG convention)
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("navigator.yaml")
    }

    /// Check field values that serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.root_stack_key.trim().is_empty() {
            return Err(ConfigError::Validation(
                "root_stack_key must not be empty".to_string(),
            ));
        }
        if !self.use_uuid_keys && self.key_prefix.trim().is_empty() {
            return Err(ConfigError::Validation(
                "key_prefix must not be empty when use_uuid_keys is false".to_string(),
            ));
        }
        if self.max_pop_to_steps == 0 {
            return Err(ConfigError::Validation(
                "max_pop_to_steps must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: NavigatorConfig =
            serde_yaml_ng::from_str("pop_policy: preserve_empty_stacks\n").unwrap();
        assert_eq!(config.pop_policy, PopPolicy::PreserveEmptyStacks);
        assert_eq!(config.root_stack_key, "root");
        assert!(config.use_uuid_keys);
        assert_eq!(config.max_pop_to_steps, 256);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("navigator.yaml");

        let config = NavigatorConfig {
            use_uuid_keys: false,
            key_prefix: "k".to_string(),
            log_level: LogLevel::Debug,
            ..NavigatorConfig::default()
        };
        config.save_to(&path).unwrap();

        assert!(!path.with_extension("yaml.tmp").exists());
        let loaded = NavigatorConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_validation_rejects_empty_root_key() {
        let config = NavigatorConfig {
            root_stack_key: "  ".to_string(),
            ..NavigatorConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(msg)) if msg.contains("root_stack_key")
        ));
    }

    #[test]
    fn test_load_from_reports_typed_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("navigator.yaml");
        fs::write(&path, "pop_policy: [not, a, policy]\n").unwrap();

        let err = NavigatorConfig::load_from(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_from_rejects_zero_pop_to_bound() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("navigator.yaml");
        fs::write(&path, "max_pop_to_steps: 0\n").unwrap();

        let err = NavigatorConfig::load_from(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::Validation(_))
        ));
    }
}
