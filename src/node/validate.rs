//! Invariant checks for whole snapshots.
//!
//! Every tree the mutator returns must pass `validate`. The navigator runs
//! it on externally supplied initial trees and container builder output.

use super::common::PaneRole;
use super::nav_node::NavNode;
use std::collections::HashSet;
use thiserror::Error;

/// A broken tree invariant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("key '{0}' appears more than once")]
    DuplicateKey(String),

    #[error("node '{key}' has parent_key {found:?}, expected {expected:?}")]
    ParentMismatch {
        key: String,
        expected: Option<String>,
        found: Option<String>,
    },

    #[error("stack '{0}' is empty")]
    EmptyStack(String),

    #[error("tab '{0}' has no branches")]
    EmptyTab(String),

    #[error("tab '{key}' {field} {index} is out of range for {len} branches")]
    TabIndexOutOfRange {
        key: String,
        field: &'static str,
        index: usize,
        len: usize,
    },

    #[error("branch {index} of tab '{key}' is not a stack")]
    TabBranchNotStack { key: String, index: usize },

    #[error("pane '{0}' has no primary role")]
    MissingPrimaryPane(String),

    #[error("pane '{key}' focuses role {role} which is {state}")]
    InvalidActiveRole {
        key: String,
        role: PaneRole,
        state: &'static str,
    },
}

/// Check all invariants, returning the first violation
pub fn validate<D>(root: &NavNode<D>) -> Result<(), InvariantViolation> {
    match violations(root).into_iter().next() {
        Some(violation) => Err(violation),
        None => Ok(()),
    }
}

/// Check all invariants, returning every violation found
pub fn violations<D>(root: &NavNode<D>) -> Vec<InvariantViolation> {
    let mut found = Vec::new();
    let mut seen = HashSet::new();
    if root.parent_key().is_some() {
        found.push(InvariantViolation::ParentMismatch {
            key: root.key().to_string(),
            expected: None,
            found: root.parent_key().map(str::to_string),
        });
    }
    // The root stack of an empty tree is the one place an empty stack may
    // stand outside a pane role.
    let root_may_be_empty = matches!(root, NavNode::Stack(_));
    check_node(root, root_may_be_empty, &mut seen, &mut found);
    found
}

fn check_node<'a, D>(
    node: &'a NavNode<D>,
    may_be_empty: bool,
    seen: &mut HashSet<&'a str>,
    found: &mut Vec<InvariantViolation>,
) {
    if !seen.insert(node.key()) {
        found.push(InvariantViolation::DuplicateKey(node.key().to_string()));
    }

    for (_, child) in node.children() {
        if child.parent_key() != Some(node.key()) {
            found.push(InvariantViolation::ParentMismatch {
                key: child.key().to_string(),
                expected: Some(node.key().to_string()),
                found: child.parent_key().map(str::to_string),
            });
        }
    }

    match node {
        NavNode::Screen(_) => {}
        NavNode::Stack(stack) => {
            if stack.children.is_empty() && !may_be_empty {
                found.push(InvariantViolation::EmptyStack(stack.key.clone()));
            }
            for child in &stack.children {
                check_node(child, false, seen, found);
            }
        }
        NavNode::Tab(tab) => {
            if tab.stacks.is_empty() {
                found.push(InvariantViolation::EmptyTab(tab.key.clone()));
            } else {
                for (field, index) in [("active_index", tab.active_index), ("home_index", tab.home_index)] {
                    if index >= tab.stacks.len() {
                        found.push(InvariantViolation::TabIndexOutOfRange {
                            key: tab.key.clone(),
                            field,
                            index,
                            len: tab.stacks.len(),
                        });
                    }
                }
            }
            for (index, branch) in tab.stacks.iter().enumerate() {
                if !matches!(branch.as_ref(), NavNode::Stack(_)) {
                    found.push(InvariantViolation::TabBranchNotStack {
                        key: tab.key.clone(),
                        index,
                    });
                }
                check_node(branch, false, seen, found);
            }
        }
        NavNode::Pane(pane) => {
            if !pane.configurations.contains_key(&PaneRole::Primary) {
                found.push(InvariantViolation::MissingPrimaryPane(pane.key.clone()));
            }
            match pane.configurations.get(&pane.active_role) {
                None => found.push(InvariantViolation::InvalidActiveRole {
                    key: pane.key.clone(),
                    role: pane.active_role,
                    state: "missing",
                }),
                Some(config) if config.is_idle() => {
                    found.push(InvariantViolation::InvalidActiveRole {
                        key: pane.key.clone(),
                        role: pane.active_role,
                        state: "idle",
                    })
                }
                Some(_) => {}
            }
            for (role, config) in &pane.configurations {
                // Idle placeholders of secondary roles are empty stacks.
                check_node(&config.content, *role != PaneRole::Primary, seen, found);
            }
        }
    }
}
