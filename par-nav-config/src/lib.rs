//! Configuration system for the par-nav navigation engine.
//!
//! This crate provides configuration loading, saving, and default values
//! for the navigator. It includes:
//!
//! - Pop policy selection for stack collapsing
//! - Key generation settings for new tree nodes
//! - Reconciliation and logging settings
//! - YAML persistence with atomic writes

pub mod config;
pub mod defaults;
pub mod error;
mod types;

pub use config::NavigatorConfig;
pub use error::ConfigError;
pub use types::{LogLevel, PopPolicy};
