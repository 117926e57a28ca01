//! Configuration enums.

use serde::{Deserialize, Serialize};

/// How a pop treats a stack that would be left empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PopPolicy {
    /// Collapse a single-entry stack into its owning container: nested
    /// containers are removed from their parent stack, tab branches fall
    /// back to the home branch and non-primary pane roles go idle.
    #[default]
    RemoveEmptyStacks,
    /// Only ever remove screens. Containers are left untouched and the pop
    /// targets the innermost stack on the active path holding more than one
    /// entry.
    PreserveEmptyStacks,
}

impl PopPolicy {
    /// Display name for diagnostics
    pub fn display_name(&self) -> &'static str {
        match self {
            PopPolicy::RemoveEmptyStacks => "Remove empty stacks",
            PopPolicy::PreserveEmptyStacks => "Preserve empty stacks",
        }
    }
}

/// Log level for the navigator's `log` output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// No logging
    Off,
    /// Errors only
    Error,
    /// Warnings and errors
    Warn,
    /// Commits and lifecycle events
    #[default]
    Info,
    /// Mutator decisions
    Debug,
    /// Most verbose
    Trace,
}

impl LogLevel {
    /// All available levels, least verbose first
    pub fn all() -> &'static [LogLevel] {
        &[
            LogLevel::Off,
            LogLevel::Error,
            LogLevel::Warn,
            LogLevel::Info,
            LogLevel::Debug,
            LogLevel::Trace,
        ]
    }

    /// Convert to `log::LevelFilter`
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pop_policy_yaml_names() {
        let yaml = serde_yaml_ng::to_string(&PopPolicy::PreserveEmptyStacks).unwrap();
        assert_eq!(yaml.trim(), "preserve_empty_stacks");
        let parsed: PopPolicy = serde_yaml_ng::from_str("remove_empty_stacks").unwrap();
        assert_eq!(parsed, PopPolicy::RemoveEmptyStacks);
    }

    #[test]
    fn test_log_level_filters_are_ordered() {
        let filters: Vec<_> = LogLevel::all().iter().map(|l| l.to_level_filter()).collect();
        let mut sorted = filters.clone();
        sorted.sort();
        assert_eq!(filters, sorted);
    }
}
