//! Pure tree mutations
//!
//! Every function here takes a snapshot and returns a new one (or a
//! discriminated outcome) without touching shared state. Subtrees that an
//! operation does not affect are returned as the same `Arc`, so sibling
//! branches stay pointer-equal across snapshots.
//!
//! Sub-modules:
//! - [`path`]: Path-based rebuilding with structural sharing
//! - [`push`]: Scope-aware push, targeted push, replace and clear
//! - [`pop`]: Policy-driven pop and pop-to
//! - [`tab`]: Tab switching
//! - [`pane`]: Pane role navigation, focus and pop
//! - [`back`]: The back-navigation state machine

mod back;
mod pane;
mod path;
mod pop;
mod push;
mod tab;

#[cfg(test)]
mod tests;

use crate::node::{NodeKind, NodeRef, PaneRole};
use crate::scope::{ContainerBuilder, KeyGenerator, ScopeResolver};
use thiserror::Error;

pub use back::resolve_back;
pub use pane::{navigate_to_pane, pop_pane, switch_active_pane};
pub use pop::{pop, pop_to};
pub use push::{clear_and_push, push, push_to_stack, replace_current};
pub use tab::{switch_active_tab, switch_tab};

pub use par_nav_config::PopPolicy;

/// Structural error reported by a mutation.
///
/// The input tree is never modified; callers keep rendering the previous
/// snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MutationError {
    #[error("no node with key '{0}'")]
    KeyNotFound(String),

    #[error("node '{key}' is a {found}, expected a {expected}")]
    WrongKind {
        key: String,
        expected: NodeKind,
        found: NodeKind,
    },

    #[error("tab '{key}' has {len} branches, index {index} is out of range")]
    TabIndexOutOfRange { key: String, index: usize, len: usize },

    #[error("pane '{key}' has no {role} role")]
    PaneRoleMissing { key: String, role: PaneRole },

    #[error("{role} role of pane '{key}' is idle")]
    PaneRoleIdle { key: String, role: PaneRole },

    #[error("no tab container on the active path")]
    NoTab,

    #[error("no stack on the active path can take the destination")]
    NoStack,

    #[error("no entry on the active path matches")]
    NoMatch,

    #[error("the navigation tree is empty")]
    EmptyTree,

    #[error("destination {destination} is a container root but no container was built")]
    MissingContainer { destination: String },

    #[error("container built for {destination} is invalid: {reason}")]
    InvalidContainer { destination: String, reason: String },

    #[error("generated key '{0}' collides with an existing node")]
    KeyCollision(String),

    #[error("malformed tree: {0}")]
    Malformed(String),
}

impl MutationError {
    /// Errors caused by the container configuration rather than the caller
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            MutationError::MissingContainer { .. }
                | MutationError::InvalidContainer { .. }
                | MutationError::KeyCollision(_)
        )
    }

    pub(crate) fn wrong_kind<D>(node: &crate::node::NavNode<D>, expected: NodeKind) -> Self {
        MutationError::WrongKind {
            key: node.key().to_string(),
            expected,
            found: node.kind(),
        }
    }
}

/// Outcome of a pop
#[derive(Debug, Clone, PartialEq)]
pub enum PopResult<D> {
    /// The pop was applied
    Popped(NodeRef<D>),
    /// The root stack holds nothing to pop
    AlreadyEmpty,
    /// Nothing on the active path can absorb the pop
    AtRoot,
}

impl<D> PopResult<D> {
    pub fn into_tree(self) -> Option<NodeRef<D>> {
        match self {
            PopResult::Popped(tree) => Some(tree),
            PopResult::AlreadyEmpty | PopResult::AtRoot => None,
        }
    }
}

/// Outcome of back resolution
#[derive(Debug, Clone, PartialEq)]
pub enum BackResult<D> {
    /// The tree absorbed the back step
    Handled(NodeRef<D>),
    /// Nothing left to go back to; the host should exit or suspend
    DelegateToHost,
    /// The tree is malformed and back cannot be evaluated
    CannotHandle(MutationError),
}

/// External lookups a push needs
pub struct PushContext<'a, D> {
    pub scopes: &'a dyn ScopeResolver<D>,
    pub containers: &'a dyn ContainerBuilder<D>,
    pub keys: &'a dyn KeyGenerator,
}

impl<'a, D> PushContext<'a, D> {
    pub fn new(
        scopes: &'a dyn ScopeResolver<D>,
        containers: &'a dyn ContainerBuilder<D>,
        keys: &'a dyn KeyGenerator,
    ) -> Self {
        Self {
            scopes,
            containers,
            keys,
        }
    }
}
