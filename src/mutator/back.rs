//! The back-navigation state machine.

use super::pane::{role_idled, with_role_content};
use super::path::{PathNode, active_chain, replace_at, stack_truncated};
use super::pop::tab_switched_home;
use super::{BackResult, MutationError};
use crate::node::{
    Destination, NavNode, NodeRef, PaneBackBehavior, PaneNode, PaneRole, active_leaf_of,
};
use std::sync::Arc;

/// Resolve one back step against `tree`.
///
/// Containers on the active path are asked innermost first whether they can
/// absorb the step:
/// - a stack with more than one entry pops its last entry, unless it is the
///   content of a pane role, which its pane handles instead
/// - a tab off its home branch returns home
/// - a pane applies its `back_behavior` to the active role
///
/// When none can, the host decides (`DelegateToHost`).
pub fn resolve_back<D: Destination>(tree: &NodeRef<D>) -> BackResult<D> {
    if let NavNode::Stack(root) = tree.as_ref()
        && root.children.is_empty()
    {
        return BackResult::CannotHandle(MutationError::EmptyTree);
    }

    let chain = active_chain(tree);
    let leaf_index = chain.len() - 1;
    if !chain[leaf_index].node.is_screen() {
        return BackResult::CannotHandle(MutationError::Malformed(format!(
            "active path ends at {} '{}' instead of a screen",
            chain[leaf_index].node.kind(),
            chain[leaf_index].node.key()
        )));
    }

    for index in (0..leaf_index).rev() {
        let entry = &chain[index];
        let owned_by_pane = index
            .checked_sub(1)
            .is_some_and(|parent| matches!(chain[parent].node.as_ref(), NavNode::Pane(_)));

        let rewritten = match entry.node.as_ref() {
            NavNode::Stack(stack) if stack.children.len() > 1 && !owned_by_pane => {
                Some(stack_truncated(stack, stack.children.len() - 1))
            }
            NavNode::Tab(tab) if tab.active_index != tab.home_index => Some(tab_switched_home(tab)),
            NavNode::Pane(pane) => pane_back(pane).map(|pane| Arc::new(NavNode::Pane(pane))),
            _ => None,
        };

        if let Some(node) = rewritten {
            return commit(tree, entry, node);
        }
    }

    crate::debug_log!("NAV_BACK", "Nothing to go back to, delegating to host");
    BackResult::DelegateToHost
}

fn commit<D: Destination>(tree: &NodeRef<D>, entry: &PathNode<D>, node: NodeRef<D>) -> BackResult<D> {
    crate::debug_log!(
        "NAV_BACK",
        "Back absorbed by {} '{}'",
        entry.node.kind(),
        entry.node.key()
    );
    match replace_at(tree, &entry.path, |_| Ok(node)) {
        Ok(tree) => BackResult::Handled(tree),
        Err(err) => BackResult::CannotHandle(err),
    }
}

/// Apply the pane's back behavior to its active role, or `None` when the
/// pane cannot absorb the step
fn pane_back<D: Destination>(pane: &PaneNode<D>) -> Option<PaneNode<D>> {
    let role = pane.active_role;
    let content = &pane.configurations.get(&role)?.content;
    let entries: &[NodeRef<D>] = match content.as_ref() {
        NavNode::Stack(stack) => &stack.children,
        _ => std::slice::from_ref(content),
    };
    let secondary = role != PaneRole::Primary;

    let pop_latest = || {
        if entries.len() > 1 {
            truncated(pane, role, entries.len() - 1)
        } else if secondary {
            Some(role_idled(pane, role))
        } else {
            None
        }
    };

    match pane.back_behavior {
        PaneBackBehavior::PopLatest => pop_latest(),
        PaneBackBehavior::PopUntilLayoutChange if secondary => Some(role_idled(pane, role)),
        PaneBackBehavior::PopUntilLayoutChange => pop_latest(),
        PaneBackBehavior::PopUntilContentChange => {
            let shown = |entry: &NodeRef<D>| {
                active_leaf_of(entry).and_then(|leaf| leaf.destination().cloned())
            };
            let current = entries.last().and_then(shown);
            let keep = entries[..entries.len().saturating_sub(1)]
                .iter()
                .rposition(|entry| shown(entry) != current);
            match keep {
                Some(index) => truncated(pane, role, index + 1),
                None if secondary => Some(role_idled(pane, role)),
                None if entries.len() > 1 => truncated(pane, role, 1),
                None => None,
            }
        }
    }
}

fn truncated<D: Destination>(pane: &PaneNode<D>, role: PaneRole, len: usize) -> Option<PaneNode<D>> {
    let config = pane.configurations.get(&role)?;
    let NavNode::Stack(stack) = config.content.as_ref() else {
        return None;
    };
    Some(with_role_content(pane, role, stack_truncated(stack, len)))
}
