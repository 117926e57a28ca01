//! Typed error variants for the par-nav-config crate.
//!
//! Provides structured error types for config I/O and validation operations
//! so library consumers can match on specific failure modes instead of
//! opaque `anyhow` strings.

use thiserror::Error;

/// Errors that can occur when loading, saving or validating configuration.
///
/// `NavigatorConfig::load` and `NavigatorConfig::save` still return
/// `anyhow::Result`; `ConfigError` values are coerced via the `From` impl
/// that `anyhow` provides for any `std::error::Error`, and can be recovered
/// with `downcast_ref::<ConfigError>()`.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An I/O error occurred reading or writing the config file.
    #[error("I/O error reading navigator config: {0}")]
    Io(#[from] std::io::Error),

    /// The config file contained invalid YAML that could not be parsed.
    #[error("YAML parse error in navigator config: {0}")]
    Parse(#[from] serde_yaml_ng::Error),

    /// A field value failed semantic validation.
    ///
    /// The inner string describes which field is invalid and why.
    #[error("Navigator config validation error: {0}")]
    Validation(String),
}
