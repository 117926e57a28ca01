//! Pane role navigation, focus and pop.

use super::path::{fresh_key, idle_placeholder, locate, materialize, replace_at, stack_truncated, stack_with_pushed};
use super::{MutationError, PopResult, PushContext};
use crate::node::{
    Destination, NavNode, NodeKind, NodeRef, PaneConfiguration, PaneNode, PaneRole, StackNode,
};
use std::sync::Arc;

/// Append `destination` to the content stack of `role` in pane `pane_key`.
///
/// A missing role is created with a fresh stack; an idle role is revived.
/// With `switch_focus` the role also becomes the pane's active role.
pub fn navigate_to_pane<D: Destination>(
    tree: &NodeRef<D>,
    pane_key: &str,
    role: PaneRole,
    destination: D,
    switch_focus: bool,
    ctx: &PushContext<'_, D>,
) -> Result<NodeRef<D>, MutationError> {
    let (path, _) = locate(tree, pane_key, NodeKind::Pane)?;
    replace_at(tree, &path, |node| {
        let NavNode::Pane(pane) = node.as_ref() else {
            return Err(MutationError::wrong_kind(node, NodeKind::Pane));
        };
        let mut pane = pane.clone();
        let content = match pane.configurations.get(&role) {
            Some(config) => {
                let NavNode::Stack(stack) = config.content.as_ref() else {
                    return Err(MutationError::wrong_kind(&config.content, NodeKind::Stack));
                };
                let child = materialize(tree, destination, &stack.key, ctx)?;
                stack_with_pushed(stack, child)
            }
            None => {
                let stack_key = fresh_key(tree, ctx.keys)?;
                let child = materialize(tree, destination, &stack_key, ctx)?;
                crate::debug_info!(
                    "NAV_PANE",
                    "Creating {} role '{}' in pane '{}'",
                    role,
                    stack_key,
                    pane.key
                );
                Arc::new(NavNode::Stack(StackNode {
                    key: stack_key,
                    parent_key: Some(pane.key.clone()),
                    children: vec![child],
                    scope_key: None,
                }))
            }
        };
        let adapt_strategy = pane
            .configurations
            .get(&role)
            .map(|config| config.adapt_strategy)
            .unwrap_or_default();
        pane.configurations.insert(
            role,
            PaneConfiguration {
                content,
                adapt_strategy,
            },
        );
        if switch_focus {
            pane.active_role = role;
        }
        Ok(Arc::new(NavNode::Pane(pane)))
    })
}

/// Move focus to `role` of pane `pane_key`; the role must exist and not be idle
pub fn switch_active_pane<D: Destination>(
    tree: &NodeRef<D>,
    pane_key: &str,
    role: PaneRole,
) -> Result<NodeRef<D>, MutationError> {
    let (path, _) = locate(tree, pane_key, NodeKind::Pane)?;
    replace_at(tree, &path, |node| {
        let NavNode::Pane(pane) = node.as_ref() else {
            return Err(MutationError::wrong_kind(node, NodeKind::Pane));
        };
        let config = role_config(pane, role)?;
        if config.is_idle() {
            return Err(MutationError::PaneRoleIdle {
                key: pane.key.clone(),
                role,
            });
        }
        if pane.active_role == role {
            return Ok(Arc::clone(node));
        }
        crate::debug_info!(
            "NAV_PANE",
            "Focusing {} role of pane '{}' (was {})",
            role,
            pane.key,
            pane.active_role
        );
        let mut pane = pane.clone();
        pane.active_role = role;
        Ok(Arc::new(NavNode::Pane(pane)))
    })
}

/// Pop one entry from `role` of pane `pane_key`.
///
/// A non-primary role holding a single entry goes idle (focus falls back to
/// `Primary` if it was active); `Primary` with a single entry is `AtRoot`.
pub fn pop_pane<D: Destination>(
    tree: &NodeRef<D>,
    pane_key: &str,
    role: PaneRole,
) -> Result<PopResult<D>, MutationError> {
    let (path, node) = locate(tree, pane_key, NodeKind::Pane)?;
    let NavNode::Pane(pane) = node else {
        return Err(MutationError::wrong_kind(node, NodeKind::Pane));
    };
    let config = role_config(pane, role)?;
    if config.is_idle() {
        return Ok(PopResult::AlreadyEmpty);
    }

    let rewritten = match config.content.as_ref() {
        NavNode::Stack(stack) if stack.children.len() > 1 => {
            with_role_content(pane, role, stack_truncated(stack, stack.children.len() - 1))
        }
        _ if role == PaneRole::Primary => return Ok(PopResult::AtRoot),
        _ => role_idled(pane, role),
    };
    let popped = replace_at(tree, &path, |_| Ok(Arc::new(NavNode::Pane(rewritten))))?;
    Ok(PopResult::Popped(popped))
}

fn role_config<D>(pane: &PaneNode<D>, role: PaneRole) -> Result<&PaneConfiguration<D>, MutationError> {
    pane.configurations
        .get(&role)
        .ok_or_else(|| MutationError::PaneRoleMissing {
            key: pane.key.clone(),
            role,
        })
}

/// Copy of `pane` with the content of `role` swapped out
pub(super) fn with_role_content<D: Destination>(
    pane: &PaneNode<D>,
    role: PaneRole,
    content: NodeRef<D>,
) -> PaneNode<D> {
    let mut pane = pane.clone();
    if let Some(config) = pane.configurations.get_mut(&role) {
        config.content = content;
    }
    pane
}

/// Copy of `pane` with `role` reset to an idle placeholder and focus moved
/// to `Primary` when `role` had it
pub(super) fn role_idled<D: Destination>(pane: &PaneNode<D>, role: PaneRole) -> PaneNode<D> {
    let mut pane = pane.clone();
    if let Some(config) = pane.configurations.get_mut(&role) {
        config.content = idle_placeholder(&config.content, &pane.key, role);
    }
    if pane.active_role == role {
        pane.active_role = PaneRole::Primary;
    }
    pane
}
