//! Published navigator state.

use crate::node::{Destination, NodeRef};
use std::sync::Arc;

/// One committed tree together with the values derived from it.
///
/// Derived fields are computed once at commit so readers never walk the
/// tree.
#[derive(Debug, Clone, PartialEq)]
pub struct NavSnapshot<D> {
    /// Increases by one per commit, starting at 0 for the initial tree
    pub version: u64,
    pub root: NodeRef<D>,
    /// Key of the active screen
    pub current_key: Option<String>,
    /// Destination of the active screen
    pub current_destination: Option<D>,
    pub can_go_back: bool,
}

impl<D: Destination> NavSnapshot<D> {
    pub fn new(version: u64, root: NodeRef<D>) -> Self {
        let leaf = root.active_leaf();
        let current_key = leaf.map(|leaf| leaf.key().to_string());
        let current_destination = leaf.and_then(|leaf| leaf.destination().cloned());
        let can_go_back = root.can_go_back();
        Self {
            version,
            root,
            current_key,
            current_destination,
            can_go_back,
        }
    }
}

/// Advisory state of a speculative back gesture
#[derive(Debug, Clone, PartialEq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    InProgress {
        /// Gesture completion in `0.0..=1.0`
        progress: f32,
        /// Screen that becomes active if the gesture commits; `None` when
        /// committing hands the back step to the host
        target_key: Option<String>,
    },
}

impl GestureState {
    pub fn is_active(&self) -> bool {
        matches!(self, GestureState::InProgress { .. })
    }
}

/// Outcome of a back command
#[derive(Debug, Clone, PartialEq)]
pub enum BackOutcome<D> {
    /// The tree absorbed the step and a new snapshot was published
    Handled(Arc<NavSnapshot<D>>),
    /// Nothing to go back to; the host should exit or suspend
    DelegateToHost,
}

impl<D> BackOutcome<D> {
    pub fn is_handled(&self) -> bool {
        matches!(self, BackOutcome::Handled(_))
    }
}

/// Outcome of a pop command
#[derive(Debug, Clone, PartialEq)]
pub enum PopOutcome<D> {
    Popped(Arc<NavSnapshot<D>>),
    /// The root stack holds nothing to pop
    AlreadyEmpty,
    /// Nothing on the active path can absorb the pop
    AtRoot,
}
