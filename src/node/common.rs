//! Shared enums and traits for the navigation tree.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Application-defined destination carried by screen leaves.
///
/// The tree never interprets a destination beyond equality. Any cloneable,
/// comparable, thread-safe type qualifies.
pub trait Destination: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {}

impl<T> Destination for T where T: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {}

/// Slot of an adaptive pane container
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PaneRole {
    /// Main content, always present
    Primary,
    /// Detail content shown beside or over the primary pane
    Secondary,
    /// Supplementary content (third column on wide layouts)
    Extra,
}

impl PaneRole {
    /// All roles in display order
    pub fn all() -> &'static [PaneRole] {
        &[PaneRole::Primary, PaneRole::Secondary, PaneRole::Extra]
    }
}

impl fmt::Display for PaneRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaneRole::Primary => write!(f, "primary"),
            PaneRole::Secondary => write!(f, "secondary"),
            PaneRole::Extra => write!(f, "extra"),
        }
    }
}

/// How the presentation layer adapts a pane that does not fit.
///
/// Opaque to the core; carried for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AdaptStrategy {
    /// Hide the pane when space runs out
    #[default]
    Hide,
    /// Float the pane above the others
    Levitate,
    /// Move the pane under its sibling
    Reflow,
}

/// Back-navigation behaviour of a pane container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaneBackBehavior {
    /// Clear a focused non-primary role in one step so the layout changes
    #[default]
    PopUntilLayoutChange,
    /// Pop until the displayed destination of the focused role differs
    PopUntilContentChange,
    /// Pop exactly one entry from the focused role
    PopLatest,
}

/// Opaque per-branch chrome data of a tab container
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct TabMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl TabMetadata {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            icon: None,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

/// Variant tag of a `NavNode`, used in error messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Screen,
    Stack,
    Tab,
    Pane,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Screen => write!(f, "screen"),
            NodeKind::Stack => write!(f, "stack"),
            NodeKind::Tab => write!(f, "tab"),
            NodeKind::Pane => write!(f, "pane"),
        }
    }
}
