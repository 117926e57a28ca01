//! Path-based rebuilding with structural sharing.
//!
//! A mutation locates its target as a list of `ChildSlot`s from the root,
//! rewrites the target, then clones only the containers on that path.
//! Everything off the path keeps its `Arc`.

use super::{MutationError, PushContext};
use crate::node::{
    ChildSlot, Destination, NavNode, NodeKind, NodeRef, PaneRole, ScreenNode, StackNode, validate,
};
use crate::scope::KeyGenerator;
use std::collections::HashSet;
use std::sync::Arc;

/// Attempts at drawing a generated key that is not already in the tree
const KEY_ATTEMPTS: usize = 64;

/// A node on the active path together with its location
pub(super) struct PathNode<D> {
    pub(super) path: Vec<ChildSlot>,
    pub(super) node: NodeRef<D>,
}

/// Nodes on the active path, root first, down to the deepest active node
pub(super) fn active_chain<D>(root: &NodeRef<D>) -> Vec<PathNode<D>> {
    let mut chain = vec![PathNode {
        path: Vec::new(),
        node: Arc::clone(root),
    }];
    loop {
        let Some(last) = chain.last() else { break };
        let Some((slot, child)) = last.node.active_child() else {
            break;
        };
        let mut path = last.path.clone();
        path.push(slot);
        let child = Arc::clone(child);
        chain.push(PathNode { path, node: child });
    }
    chain
}

/// Shallow copy of `node` with the child in `slot` replaced
pub(super) fn with_child<D: Destination>(
    node: &NavNode<D>,
    slot: ChildSlot,
    child: NodeRef<D>,
) -> Result<NavNode<D>, MutationError> {
    match (node, slot) {
        (NavNode::Stack(stack), ChildSlot::StackChild(i)) if i < stack.children.len() => {
            let mut stack = stack.clone();
            stack.children[i] = child;
            Ok(NavNode::Stack(stack))
        }
        (NavNode::Tab(tab), ChildSlot::TabBranch(i)) if i < tab.stacks.len() => {
            let mut tab = tab.clone();
            tab.stacks[i] = child;
            Ok(NavNode::Tab(tab))
        }
        (NavNode::Pane(pane), ChildSlot::PaneRole(role)) => {
            let mut pane = pane.clone();
            let config = pane
                .configurations
                .get_mut(&role)
                .ok_or_else(|| MutationError::PaneRoleMissing {
                    key: pane.key.clone(),
                    role,
                })?;
            config.content = child;
            Ok(NavNode::Pane(pane))
        }
        _ => Err(MutationError::Malformed(format!(
            "{} '{}' has no child at {:?}",
            node.kind(),
            node.key(),
            slot
        ))),
    }
}

/// Rewrite the node at `path` with `f`, rebuilding only its ancestors.
///
/// When `f` hands back the very same `Arc`, the original root is returned.
pub(super) fn replace_at<D, F>(
    root: &NodeRef<D>,
    path: &[ChildSlot],
    f: F,
) -> Result<NodeRef<D>, MutationError>
where
    D: Destination,
    F: FnOnce(&NodeRef<D>) -> Result<NodeRef<D>, MutationError>,
{
    match path.split_first() {
        None => f(root),
        Some((slot, rest)) => {
            let child = root.child(*slot).ok_or_else(|| {
                MutationError::Malformed(format!("no child at {:?} under '{}'", slot, root.key()))
            })?;
            let new_child = replace_at(child, rest, f)?;
            if Arc::ptr_eq(&new_child, child) {
                return Ok(Arc::clone(root));
            }
            Ok(Arc::new(with_child(root, *slot, new_child)?))
        }
    }
}

/// Locate a node by key, checking its variant
pub(super) fn locate<'a, D>(
    root: &'a NavNode<D>,
    key: &str,
    expected: NodeKind,
) -> Result<(Vec<ChildSlot>, &'a NavNode<D>), MutationError> {
    let path = root
        .find_path(key)
        .ok_or_else(|| MutationError::KeyNotFound(key.to_string()))?;
    let node = root
        .descend(&path)
        .ok_or_else(|| MutationError::KeyNotFound(key.to_string()))?;
    if node.kind() != expected {
        return Err(MutationError::wrong_kind(node, expected));
    }
    Ok((path, node))
}

/// Draw a key from `keys` that no node in `tree` uses yet
pub(super) fn fresh_key<D>(tree: &NavNode<D>, keys: &dyn KeyGenerator) -> Result<String, MutationError> {
    let mut last = String::new();
    for _ in 0..KEY_ATTEMPTS {
        let key = keys.next_key();
        if tree.find(&key).is_none() {
            return Ok(key);
        }
        crate::debug_log!("NAV_PUSH", "Generated key '{}' is already taken", key);
        last = key;
    }
    Err(MutationError::KeyCollision(last))
}

/// Copy of `stack` with `child` appended
pub(super) fn stack_with_pushed<D: Destination>(stack: &StackNode<D>, child: NodeRef<D>) -> NodeRef<D> {
    let mut stack = stack.clone();
    stack.children.push(child);
    Arc::new(NavNode::Stack(stack))
}

/// Copy of `stack` keeping only the first `len` children
pub(super) fn stack_truncated<D: Destination>(stack: &StackNode<D>, len: usize) -> NodeRef<D> {
    let mut stack = stack.clone();
    stack.children.truncate(len);
    Arc::new(NavNode::Stack(stack))
}

/// Empty stack standing in for the content of an idle pane role.
///
/// A stack keeps its key; other content gets a key derived from the pane.
pub(super) fn idle_placeholder<D>(content: &NavNode<D>, pane_key: &str, role: PaneRole) -> NodeRef<D> {
    let (key, scope_key) = match content {
        NavNode::Stack(stack) => (stack.key.clone(), stack.scope_key.clone()),
        _ => (format!("{pane_key}:{role}"), None),
    };
    Arc::new(NavNode::Stack(StackNode {
        key,
        parent_key: Some(pane_key.to_string()),
        children: Vec::new(),
        scope_key,
    }))
}

/// Turn a destination into the node a push appends under `parent_key`.
///
/// Container roots are expanded through the container builder; the result
/// must be a valid subtree whose keys do not collide with `tree`.
pub(super) fn materialize<D: Destination>(
    tree: &NavNode<D>,
    destination: D,
    parent_key: &str,
    ctx: &PushContext<'_, D>,
) -> Result<NodeRef<D>, MutationError> {
    if !ctx.containers.is_container_root(&destination) {
        return Ok(Arc::new(NavNode::Screen(ScreenNode {
            key: fresh_key(tree, ctx.keys)?,
            parent_key: Some(parent_key.to_string()),
            destination,
        })));
    }

    let describe = || format!("{destination:?}");
    let built = ctx
        .containers
        .build_container(&destination, ctx.keys)
        .ok_or_else(|| MutationError::MissingContainer {
            destination: describe(),
        })?
        .with_parent_key(None);

    let invalid = |reason: String| MutationError::InvalidContainer {
        destination: describe(),
        reason,
    };
    validate(&built).map_err(|v| invalid(v.to_string()))?;
    if built.active_leaf().is_none() {
        return Err(invalid("container has no active screen".to_string()));
    }
    let existing: HashSet<&str> = tree.keys().into_iter().collect();
    if let Some(clash) = built.keys().into_iter().find(|k| existing.contains(k)) {
        return Err(invalid(format!("key '{clash}' already exists in the tree")));
    }

    crate::debug_log!(
        "NAV_PUSH",
        "Built {} container '{}' for {}",
        built.kind(),
        built.key(),
        describe()
    );
    Ok(Arc::new(built.with_parent_key(Some(parent_key.to_string()))))
}
