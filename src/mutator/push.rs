//! Push-family mutations: scope-aware push, targeted push, replace, clear.

use super::path::{PathNode, active_chain, locate, materialize, replace_at, stack_with_pushed};
use super::{MutationError, PushContext};
use crate::node::{Destination, NavNode, NodeKind, NodeRef, StackNode};
use std::sync::Arc;

/// Push `destination` onto the stack that owns its scope.
///
/// Walks the active path innermost-out. A scope-less destination lands in
/// the innermost stack. A scoped destination lands in the innermost stack
/// whose effective scope (its own `scope_key`, else the nearest enclosing
/// container's) matches, escaping foreign scopes; with no match it lands in
/// the outermost stack on the active path.
pub fn push<D: Destination>(
    tree: &NodeRef<D>,
    destination: D,
    ctx: &PushContext<'_, D>,
) -> Result<NodeRef<D>, MutationError> {
    let chain = active_chain(tree);
    let stacks: Vec<usize> = chain
        .iter()
        .enumerate()
        .filter(|(_, entry)| matches!(entry.node.as_ref(), NavNode::Stack(_)))
        .map(|(i, _)| i)
        .collect();
    let (Some(&outermost), Some(&innermost)) = (stacks.first(), stacks.last()) else {
        return Err(MutationError::NoStack);
    };

    let target = match ctx.scopes.scope_of(&destination) {
        None => innermost,
        Some(scope) => stacks
            .iter()
            .rev()
            .copied()
            .find(|&i| effective_scope(&chain, i) == Some(scope.as_str()))
            .unwrap_or(outermost),
    };

    crate::debug_log!(
        "NAV_PUSH",
        "Pushing {:?} onto stack '{}' (innermost '{}')",
        destination,
        chain[target].node.key(),
        chain[innermost].node.key()
    );
    append_at(tree, &chain[target], destination, ctx)
}

/// Push onto an explicit stack, bypassing scope resolution
pub fn push_to_stack<D: Destination>(
    tree: &NodeRef<D>,
    stack_key: &str,
    destination: D,
    ctx: &PushContext<'_, D>,
) -> Result<NodeRef<D>, MutationError> {
    let (path, _) = locate(tree, stack_key, NodeKind::Stack)?;
    replace_at(tree, &path, |node| {
        let NavNode::Stack(stack) = node.as_ref() else {
            return Err(MutationError::wrong_kind(node, NodeKind::Stack));
        };
        let child = materialize(tree, destination, &stack.key, ctx)?;
        Ok(stack_with_pushed(stack, child))
    })
}

/// Replace the active leaf with `destination` inside the same stack
pub fn replace_current<D: Destination>(
    tree: &NodeRef<D>,
    destination: D,
    ctx: &PushContext<'_, D>,
) -> Result<NodeRef<D>, MutationError> {
    let chain = active_chain(tree);
    let leaf = chain.last().ok_or(MutationError::EmptyTree)?;
    if !leaf.node.is_screen() {
        return Err(MutationError::EmptyTree);
    }
    let parent = chain
        .len()
        .checked_sub(2)
        .map(|i| &chain[i])
        .ok_or(MutationError::NoStack)?;

    replace_at(tree, &parent.path, |node| {
        let NavNode::Stack(stack) = node.as_ref() else {
            return Err(MutationError::NoStack);
        };
        let child = materialize(tree, destination, &stack.key, ctx)?;
        let mut stack = stack.clone();
        if let Some(last) = stack.children.last_mut() {
            *last = child;
        }
        Ok(Arc::new(NavNode::Stack(stack)))
    })
}

/// Reset the outermost stack on the active path to a single `destination`
pub fn clear_and_push<D: Destination>(
    tree: &NodeRef<D>,
    destination: D,
    ctx: &PushContext<'_, D>,
) -> Result<NodeRef<D>, MutationError> {
    let chain = active_chain(tree);
    let outermost = chain
        .iter()
        .find(|entry| matches!(entry.node.as_ref(), NavNode::Stack(_)))
        .ok_or(MutationError::NoStack)?;

    replace_at(tree, &outermost.path, |node| {
        let NavNode::Stack(stack) = node.as_ref() else {
            return Err(MutationError::NoStack);
        };
        let child = materialize(tree, destination, &stack.key, ctx)?;
        Ok(Arc::new(NavNode::Stack(StackNode {
            children: vec![child],
            ..stack.clone()
        })))
    })
}

fn append_at<D: Destination>(
    tree: &NodeRef<D>,
    target: &PathNode<D>,
    destination: D,
    ctx: &PushContext<'_, D>,
) -> Result<NodeRef<D>, MutationError> {
    replace_at(tree, &target.path, |node| {
        let NavNode::Stack(stack) = node.as_ref() else {
            return Err(MutationError::wrong_kind(node, NodeKind::Stack));
        };
        let child = materialize(tree, destination, &stack.key, ctx)?;
        Ok(stack_with_pushed(stack, child))
    })
}

/// Scope of the chain entry at `index`, inherited from the nearest scoped
/// ancestor when the node declares none
fn effective_scope<D>(chain: &[PathNode<D>], index: usize) -> Option<&str> {
    chain[..=index]
        .iter()
        .rev()
        .find_map(|entry| entry.node.scope_key())
}
