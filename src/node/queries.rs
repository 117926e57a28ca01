//! Read-only structural queries over a navigation tree.

use super::common::PaneRole;
use super::nav_node::{NavNode, NodeRef};
use std::sync::Arc;

/// Position of a child inside its container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChildSlot {
    /// Index into `StackNode::children`
    StackChild(usize),
    /// Index into `TabNode::stacks`
    TabBranch(usize),
    /// Role of `PaneNode::configurations`
    PaneRole(PaneRole),
}

/// Active leaf of a shared subtree, keeping the `Arc`
pub fn active_leaf_of<D>(node: &NodeRef<D>) -> Option<NodeRef<D>> {
    let mut current = node;
    loop {
        if current.is_screen() {
            return Some(Arc::clone(current));
        }
        let (_, child) = current.active_child()?;
        current = child;
    }
}

impl<D> NavNode<D> {
    /// Direct children together with their slots
    pub fn children(&self) -> Vec<(ChildSlot, &NodeRef<D>)> {
        match self {
            NavNode::Screen(_) => Vec::new(),
            NavNode::Stack(stack) => stack
                .children
                .iter()
                .enumerate()
                .map(|(i, child)| (ChildSlot::StackChild(i), child))
                .collect(),
            NavNode::Tab(tab) => tab
                .stacks
                .iter()
                .enumerate()
                .map(|(i, branch)| (ChildSlot::TabBranch(i), branch))
                .collect(),
            NavNode::Pane(pane) => pane
                .configurations
                .iter()
                .map(|(role, config)| (ChildSlot::PaneRole(*role), &config.content))
                .collect(),
        }
    }

    /// Child stored in `slot`, if the slot matches this variant
    pub fn child(&self, slot: ChildSlot) -> Option<&NodeRef<D>> {
        match (self, slot) {
            (NavNode::Stack(stack), ChildSlot::StackChild(i)) => stack.children.get(i),
            (NavNode::Tab(tab), ChildSlot::TabBranch(i)) => tab.stacks.get(i),
            (NavNode::Pane(pane), ChildSlot::PaneRole(role)) => {
                pane.configurations.get(&role).map(|config| &config.content)
            }
            _ => None,
        }
    }

    /// The child that currently has focus
    pub fn active_child(&self) -> Option<(ChildSlot, &NodeRef<D>)> {
        match self {
            NavNode::Screen(_) => None,
            NavNode::Stack(stack) => {
                let index = stack.children.len().checked_sub(1)?;
                Some((ChildSlot::StackChild(index), &stack.children[index]))
            }
            NavNode::Tab(tab) => tab
                .stacks
                .get(tab.active_index)
                .map(|branch| (ChildSlot::TabBranch(tab.active_index), branch)),
            NavNode::Pane(pane) => pane
                .configurations
                .get(&pane.active_role)
                .map(|config| (ChildSlot::PaneRole(pane.active_role), &config.content)),
        }
    }

    /// The screen the user is looking at
    pub fn active_leaf(&self) -> Option<&NavNode<D>> {
        let mut current = self;
        loop {
            if current.is_screen() {
                return Some(current);
            }
            let (_, child) = current.active_child()?;
            current = child.as_ref();
        }
    }

    /// Slots from this node down to the deepest active descendant
    pub fn active_path(&self) -> Vec<ChildSlot> {
        let mut path = Vec::new();
        let mut current = self;
        while let Some((slot, child)) = current.active_child() {
            path.push(slot);
            current = child.as_ref();
        }
        path
    }

    /// Node reached by following `path` from this node
    pub fn descend(&self, path: &[ChildSlot]) -> Option<&NavNode<D>> {
        let mut current = self;
        for slot in path {
            current = current.child(*slot)?.as_ref();
        }
        Some(current)
    }

    /// Whether a back step would be absorbed by the tree rather than the host
    pub fn can_go_back(&self) -> bool {
        let mut current = self;
        loop {
            match current {
                NavNode::Screen(_) => return false,
                NavNode::Stack(stack) if stack.children.len() > 1 => return true,
                NavNode::Tab(tab) if tab.active_index != tab.home_index => return true,
                NavNode::Pane(pane) if pane.active_role != PaneRole::Primary => return true,
                _ => {}
            }
            match current.active_child() {
                Some((_, child)) => current = child.as_ref(),
                None => return false,
            }
        }
    }

    /// Total number of nodes in this subtree
    pub fn size(&self) -> usize {
        1 + self
            .children()
            .into_iter()
            .map(|(_, child)| child.size())
            .sum::<usize>()
    }

    /// Find a node by key (depth-first)
    pub fn find(&self, key: &str) -> Option<&NavNode<D>> {
        if self.key() == key {
            return Some(self);
        }
        self.children()
            .into_iter()
            .find_map(|(_, child)| child.find(key))
    }

    /// Slots leading from this node to the node with `key`
    pub fn find_path(&self, key: &str) -> Option<Vec<ChildSlot>> {
        if self.key() == key {
            return Some(Vec::new());
        }
        for (slot, child) in self.children() {
            if let Some(mut rest) = child.find_path(key) {
                rest.insert(0, slot);
                return Some(rest);
            }
        }
        None
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// Every key in this subtree, depth-first
    pub fn keys(&self) -> Vec<&str> {
        let mut keys = vec![self.key()];
        for (_, child) in self.children() {
            keys.extend(child.keys());
        }
        keys
    }

    /// Keys of all screen leaves in this subtree
    pub fn screen_keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        self.collect_screen_keys(&mut keys);
        keys
    }

    pub(crate) fn collect_screen_keys(&self, out: &mut Vec<String>) {
        match self {
            NavNode::Screen(screen) => out.push(screen.key.clone()),
            _ => {
                for (_, child) in self.children() {
                    child.collect_screen_keys(out);
                }
            }
        }
    }
}
