//! Tab switching.

use super::MutationError;
use super::path::{active_chain, locate, replace_at};
use crate::node::{ChildSlot, Destination, NavNode, NodeKind, NodeRef};
use std::sync::Arc;

/// Make branch `index` of the tab `tab_key` active.
///
/// Switching to the branch that is already active returns the input tree.
pub fn switch_tab<D: Destination>(
    tree: &NodeRef<D>,
    tab_key: &str,
    index: usize,
) -> Result<NodeRef<D>, MutationError> {
    let (path, _) = locate(tree, tab_key, NodeKind::Tab)?;
    switch_at(tree, &path, index)
}

/// Switch the innermost tab container on the active path
pub fn switch_active_tab<D: Destination>(
    tree: &NodeRef<D>,
    index: usize,
) -> Result<NodeRef<D>, MutationError> {
    let chain = active_chain(tree);
    let tab = chain
        .iter()
        .rev()
        .find(|entry| matches!(entry.node.as_ref(), NavNode::Tab(_)))
        .ok_or(MutationError::NoTab)?;
    switch_at(tree, &tab.path, index)
}

fn switch_at<D: Destination>(
    tree: &NodeRef<D>,
    path: &[ChildSlot],
    index: usize,
) -> Result<NodeRef<D>, MutationError> {
    replace_at(tree, path, |node| {
        let NavNode::Tab(tab) = node.as_ref() else {
            return Err(MutationError::wrong_kind(node, NodeKind::Tab));
        };
        if index >= tab.stacks.len() {
            return Err(MutationError::TabIndexOutOfRange {
                key: tab.key.clone(),
                index,
                len: tab.stacks.len(),
            });
        }
        if index == tab.active_index {
            return Ok(Arc::clone(node));
        }
        crate::debug_info!(
            "NAV_TAB",
            "Switching tab '{}' from branch {} to {}",
            tab.key,
            tab.active_index,
            index
        );
        let mut tab = tab.clone();
        tab.active_index = index;
        Ok(Arc::new(NavNode::Tab(tab)))
    })
}
