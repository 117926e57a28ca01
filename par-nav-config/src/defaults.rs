// Default value functions for configuration

use crate::types::{LogLevel, PopPolicy};

pub fn pop_policy() -> PopPolicy {
    PopPolicy::RemoveEmptyStacks
}

pub fn root_stack_key() -> String {
    "root".to_string()
}

pub fn key_prefix() -> String {
    "nav".to_string()
}

pub fn bool_true() -> bool {
    true
}

pub fn bool_false() -> bool {
    false
}

/// Upper bound on the pops a single `pop_to` may perform
pub fn max_pop_to_steps() -> usize {
    256
}

pub fn log_level() -> LogLevel {
    LogLevel::Info
}
