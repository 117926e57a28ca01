//! `NavNode`: the navigation tree sum type and its variant structs.

use super::common::{AdaptStrategy, NodeKind, PaneBackBehavior, PaneRole, TabMetadata};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Shared handle to a subtree.
///
/// Snapshots share every subtree an operation did not touch, so callers can
/// short-circuit work with `Arc::ptr_eq`.
pub type NodeRef<D> = Arc<NavNode<D>>;

/// Tree node for navigation state
///
/// - `Screen` nodes are leaves carrying a destination
/// - `Stack` nodes keep an ordered history whose last child is active
/// - `Tab` nodes hold parallel stacks with one active branch
/// - `Pane` nodes hold role-keyed content shown side by side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NavNode<D> {
    Screen(ScreenNode<D>),
    Stack(StackNode<D>),
    Tab(TabNode<D>),
    Pane(PaneNode<D>),
}

/// Leaf node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenNode<D> {
    pub key: String,
    #[serde(default)]
    pub parent_key: Option<String>,
    pub destination: D,
}

/// Ordered history; the last child is the active one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackNode<D> {
    pub key: String,
    #[serde(default)]
    pub parent_key: Option<String>,
    pub children: Vec<NodeRef<D>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope_key: Option<String>,
}

/// Parallel stacks with a single active branch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabNode<D> {
    pub key: String,
    #[serde(default)]
    pub parent_key: Option<String>,
    /// Branches; every entry is a `Stack`
    pub stacks: Vec<NodeRef<D>>,
    pub active_index: usize,
    /// Branch that back navigation returns to before leaving the tab, and
    /// the fallback when the active branch cannot be popped any further
    #[serde(default)]
    pub home_index: usize,
    /// Handle used by the presentation layer to look up tab chrome
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrapper_key: Option<String>,
    /// Per-branch label/icon, indexed like `stacks` (may be shorter)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metadata: Vec<TabMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope_key: Option<String>,
}

/// Content of one pane role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaneConfiguration<D> {
    pub content: NodeRef<D>,
    #[serde(default)]
    pub adapt_strategy: AdaptStrategy,
}

impl<D> PaneConfiguration<D> {
    /// An idle role holds an empty stack as a placeholder
    pub fn is_idle(&self) -> bool {
        matches!(self.content.as_ref(), NavNode::Stack(stack) if stack.children.is_empty())
    }
}

/// Adaptive multi-pane container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaneNode<D> {
    pub key: String,
    #[serde(default)]
    pub parent_key: Option<String>,
    pub configurations: BTreeMap<PaneRole, PaneConfiguration<D>>,
    pub active_role: PaneRole,
    #[serde(default)]
    pub back_behavior: PaneBackBehavior,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope_key: Option<String>,
}

// ============================================================================
// Constructors
// ============================================================================

impl<D> ScreenNode<D> {
    pub fn new(key: impl Into<String>, destination: D) -> Self {
        Self {
            key: key.into(),
            parent_key: None,
            destination,
        }
    }
}

impl<D> StackNode<D> {
    /// Create a stack, re-parenting `children` onto it
    pub fn new(key: impl Into<String>, children: Vec<NavNode<D>>) -> Self {
        let key = key.into();
        let children = adopt(&key, children);
        Self {
            key,
            parent_key: None,
            children,
            scope_key: None,
        }
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope_key = Some(scope.into());
        self
    }
}

impl<D> TabNode<D> {
    /// Create a tab container on its first branch, re-parenting `branches`
    pub fn new(key: impl Into<String>, branches: Vec<NavNode<D>>) -> Self {
        let key = key.into();
        let stacks = adopt(&key, branches);
        Self {
            key,
            parent_key: None,
            stacks,
            active_index: 0,
            home_index: 0,
            wrapper_key: None,
            metadata: Vec::new(),
            scope_key: None,
        }
    }

    pub fn with_active_index(mut self, index: usize) -> Self {
        self.active_index = index;
        self
    }

    pub fn with_home_index(mut self, index: usize) -> Self {
        self.home_index = index;
        self
    }

    pub fn with_wrapper_key(mut self, wrapper_key: impl Into<String>) -> Self {
        self.wrapper_key = Some(wrapper_key.into());
        self
    }

    pub fn with_metadata(mut self, metadata: Vec<TabMetadata>) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope_key = Some(scope.into());
        self
    }

    /// Metadata for a branch, if any was configured
    pub fn branch_metadata(&self, index: usize) -> Option<&TabMetadata> {
        self.metadata.get(index)
    }
}

impl<D> PaneNode<D> {
    /// Create a pane container focused on its `primary` content
    pub fn new(key: impl Into<String>, primary: NavNode<D>) -> Self {
        let key = key.into();
        let mut configurations = BTreeMap::new();
        configurations.insert(
            PaneRole::Primary,
            PaneConfiguration {
                content: Arc::new(primary.with_parent_key(Some(key.clone()))),
                adapt_strategy: AdaptStrategy::default(),
            },
        );
        Self {
            key,
            parent_key: None,
            configurations,
            active_role: PaneRole::Primary,
            back_behavior: PaneBackBehavior::default(),
            scope_key: None,
        }
    }

    /// Add or replace the content of a role
    pub fn with_pane(mut self, role: PaneRole, content: NavNode<D>, strategy: AdaptStrategy) -> Self {
        self.configurations.insert(
            role,
            PaneConfiguration {
                content: Arc::new(content.with_parent_key(Some(self.key.clone()))),
                adapt_strategy: strategy,
            },
        );
        self
    }

    pub fn with_active_role(mut self, role: PaneRole) -> Self {
        self.active_role = role;
        self
    }

    pub fn with_back_behavior(mut self, behavior: PaneBackBehavior) -> Self {
        self.back_behavior = behavior;
        self
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope_key = Some(scope.into());
        self
    }

    /// Roles whose content is not an idle placeholder
    pub fn visible_roles(&self) -> Vec<PaneRole> {
        self.configurations
            .iter()
            .filter(|(_, config)| !config.is_idle())
            .map(|(role, _)| *role)
            .collect()
    }
}

fn adopt<D>(parent: &str, children: Vec<NavNode<D>>) -> Vec<NodeRef<D>> {
    children
        .into_iter()
        .map(|child| Arc::new(child.with_parent_key(Some(parent.to_string()))))
        .collect()
}

impl<D> From<ScreenNode<D>> for NavNode<D> {
    fn from(node: ScreenNode<D>) -> Self {
        NavNode::Screen(node)
    }
}

impl<D> From<StackNode<D>> for NavNode<D> {
    fn from(node: StackNode<D>) -> Self {
        NavNode::Stack(node)
    }
}

impl<D> From<TabNode<D>> for NavNode<D> {
    fn from(node: TabNode<D>) -> Self {
        NavNode::Tab(node)
    }
}

impl<D> From<PaneNode<D>> for NavNode<D> {
    fn from(node: PaneNode<D>) -> Self {
        NavNode::Pane(node)
    }
}

// ============================================================================
// Accessors
// ============================================================================

impl<D> NavNode<D> {
    /// Create a screen leaf
    pub fn screen(key: impl Into<String>, destination: D) -> Self {
        NavNode::Screen(ScreenNode::new(key, destination))
    }

    /// Create an unscoped stack
    pub fn stack(key: impl Into<String>, children: Vec<NavNode<D>>) -> Self {
        NavNode::Stack(StackNode::new(key, children))
    }

    pub fn key(&self) -> &str {
        match self {
            NavNode::Screen(node) => &node.key,
            NavNode::Stack(node) => &node.key,
            NavNode::Tab(node) => &node.key,
            NavNode::Pane(node) => &node.key,
        }
    }

    pub fn parent_key(&self) -> Option<&str> {
        match self {
            NavNode::Screen(node) => node.parent_key.as_deref(),
            NavNode::Stack(node) => node.parent_key.as_deref(),
            NavNode::Tab(node) => node.parent_key.as_deref(),
            NavNode::Pane(node) => node.parent_key.as_deref(),
        }
    }

    /// Scope declared directly on this node (screens never declare one)
    pub fn scope_key(&self) -> Option<&str> {
        match self {
            NavNode::Screen(_) => None,
            NavNode::Stack(node) => node.scope_key.as_deref(),
            NavNode::Tab(node) => node.scope_key.as_deref(),
            NavNode::Pane(node) => node.scope_key.as_deref(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            NavNode::Screen(_) => NodeKind::Screen,
            NavNode::Stack(_) => NodeKind::Stack,
            NavNode::Tab(_) => NodeKind::Tab,
            NavNode::Pane(_) => NodeKind::Pane,
        }
    }

    /// Return this node attached to a different parent
    pub fn with_parent_key(mut self, parent_key: Option<String>) -> Self {
        match &mut self {
            NavNode::Screen(node) => node.parent_key = parent_key,
            NavNode::Stack(node) => node.parent_key = parent_key,
            NavNode::Tab(node) => node.parent_key = parent_key,
            NavNode::Pane(node) => node.parent_key = parent_key,
        }
        self
    }

    pub fn is_screen(&self) -> bool {
        matches!(self, NavNode::Screen(_))
    }

    pub fn as_screen(&self) -> Option<&ScreenNode<D>> {
        match self {
            NavNode::Screen(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_stack(&self) -> Option<&StackNode<D>> {
        match self {
            NavNode::Stack(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_tab(&self) -> Option<&TabNode<D>> {
        match self {
            NavNode::Tab(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_pane(&self) -> Option<&PaneNode<D>> {
        match self {
            NavNode::Pane(node) => Some(node),
            _ => None,
        }
    }

    /// Destination of a screen leaf
    pub fn destination(&self) -> Option<&D> {
        self.as_screen().map(|screen| &screen.destination)
    }
}
