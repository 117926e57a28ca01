//! Navigation tree model
//!
//! This module defines the immutable tree that describes where the user is:
//! - `NavNode`: Sum type over screens, stacks, tabs and panes
//! - `PaneRole` / `PaneConfiguration`: Adaptive pane slots
//! - Structural queries (`active_leaf`, `can_go_back`, `size`, lookups)
//! - Invariant checking for whole snapshots
//!
//! Sub-modules:
//! - [`common`]: `Destination`, `PaneRole`, `AdaptStrategy`, `PaneBackBehavior`, `TabMetadata`
//! - [`nav_node`]: `NavNode` and the per-variant node structs
//! - [`queries`]: read-only structural queries
//! - [`validate`]: invariant checks (`validate`, `violations`)
//! - [`display`]: indented outline rendering

mod common;
mod display;
mod nav_node;
mod queries;
mod validate;


pub use common::{AdaptStrategy, Destination, NodeKind, PaneBackBehavior, PaneRole, TabMetadata};
pub use nav_node::{
    NavNode, NodeRef, PaneConfiguration, PaneNode, ScreenNode, StackNode, TabNode,
};
pub use queries::{ChildSlot, active_leaf_of};
pub use validate::{InvariantViolation, validate, violations};
