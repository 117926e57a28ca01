//! Policy-driven pop and pop-to.

use super::pane::role_idled;
use super::path::{active_chain, replace_at, stack_truncated};
use super::{MutationError, PopPolicy, PopResult};
use crate::node::{Destination, NavNode, NodeRef, PaneRole, TabNode};
use std::sync::Arc;

/// Remove the active leaf of the active stack.
///
/// With `RemoveEmptyStacks` a single-entry stack collapses into its owner,
/// innermost first:
/// - a stack with more than one entry drops its last child (which may be a
///   whole nested container)
/// - a tab off its home branch switches back home
/// - a pane focused on a non-primary role idles that role and refocuses
///   `Primary`
///
/// With `PreserveEmptyStacks` only the leaf's own stack is popped, and only
/// when it holds more than one entry.
pub fn pop<D: Destination>(
    tree: &NodeRef<D>,
    policy: PopPolicy,
) -> Result<PopResult<D>, MutationError> {
    if let NavNode::Stack(root) = tree.as_ref()
        && root.children.is_empty()
    {
        return Ok(PopResult::AlreadyEmpty);
    }

    let chain = active_chain(tree);
    let leaf_index = chain.len() - 1;
    if !chain[leaf_index].node.is_screen() {
        return Err(MutationError::Malformed(format!(
            "active path ends at {} '{}' instead of a screen",
            chain[leaf_index].node.kind(),
            chain[leaf_index].node.key()
        )));
    }

    match policy {
        PopPolicy::PreserveEmptyStacks => {
            let Some(parent) = leaf_index.checked_sub(1).map(|i| &chain[i]) else {
                return Ok(PopResult::AtRoot);
            };
            match parent.node.as_ref() {
                NavNode::Stack(stack) if stack.children.len() > 1 => {
                    let len = stack.children.len() - 1;
                    let popped = replace_at(tree, &parent.path, |_| Ok(stack_truncated(stack, len)))?;
                    Ok(PopResult::Popped(popped))
                }
                _ => Ok(PopResult::AtRoot),
            }
        }
        PopPolicy::RemoveEmptyStacks => {
            for entry in chain[..leaf_index].iter().rev() {
                let rewritten = match entry.node.as_ref() {
                    NavNode::Stack(stack) if stack.children.len() > 1 => {
                        Some(stack_truncated(stack, stack.children.len() - 1))
                    }
                    NavNode::Tab(tab) if tab.active_index != tab.home_index => {
                        Some(tab_switched_home(tab))
                    }
                    NavNode::Pane(pane) if pane.active_role != PaneRole::Primary => Some(Arc::new(
                        NavNode::Pane(role_idled(pane, pane.active_role)),
                    )),
                    _ => None,
                };
                if let Some(node) = rewritten {
                    crate::debug_log!(
                        "NAV_POP",
                        "Pop absorbed by {} '{}'",
                        entry.node.kind(),
                        entry.node.key()
                    );
                    let popped = replace_at(tree, &entry.path, |_| Ok(node))?;
                    return Ok(PopResult::Popped(popped));
                }
            }
            Ok(PopResult::AtRoot)
        }
    }
}

/// Pop until the active leaf matches `predicate`.
///
/// With `inclusive` the matching entry is popped too. Fails with `NoMatch`
/// when the tree runs out of entries (or `max_steps` pops) first; the input
/// tree is left untouched in that case.
pub fn pop_to<D, F>(
    tree: &NodeRef<D>,
    predicate: F,
    inclusive: bool,
    max_steps: usize,
) -> Result<NodeRef<D>, MutationError>
where
    D: Destination,
    F: Fn(&NavNode<D>) -> bool,
{
    let mut current = Arc::clone(tree);
    for _ in 0..max_steps {
        let leaf_matches = current.active_leaf().is_some_and(&predicate);
        if leaf_matches && !inclusive {
            return Ok(current);
        }
        match pop(&current, PopPolicy::RemoveEmptyStacks)? {
            PopResult::Popped(next) => {
                if leaf_matches {
                    return Ok(next);
                }
                current = next;
            }
            PopResult::AlreadyEmpty | PopResult::AtRoot => return Err(MutationError::NoMatch),
        }
    }
    Err(MutationError::NoMatch)
}

pub(super) fn tab_switched_home<D: Destination>(tab: &TabNode<D>) -> NodeRef<D> {
    let mut tab = tab.clone();
    tab.active_index = tab.home_index;
    Arc::new(NavNode::Tab(tab))
}
