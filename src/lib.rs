// Library exports for the navigation engine and its replay CLI
//
// # Mutex Usage Policy
//
// par-nav uses two synchronization primitives:
//
//   - `parking_lot::Mutex`    : the navigator's writer lock and the result
//                               channel's slot table. Both are sync-only and
//                               held for the duration of one pure mutation or
//                               one table update; never held across `.await`.
//
//   - `arc_swap::ArcSwap`     : the published snapshot. Readers never lock;
//                               only the writer (under the writer lock) stores.
//
// Error handlers run after the writer lock is released, so a handler may call
// back into the navigator.

/// Application version (root crate version, for use by sub-crates).
/// Sub-crates should receive this via parameter rather than using
/// `env!("CARGO_PKG_VERSION")` which resolves to the sub-crate's version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[macro_use]
pub mod debug;

pub mod cli;
pub mod diff;
pub mod mutator;
pub mod navigator;
pub mod node;
pub mod result_channel;
pub mod scope;

pub use mutator::{BackResult, MutationError, PopResult, PushContext};
pub use navigator::{
    BackOutcome, GestureState, LogErrorHandler, NavError, NavErrorHandler, NavSnapshot, Navigator,
    NavigatorBuilder, PanicOnConfigError, PopOutcome, RecordingErrorHandler,
};
pub use node::{
    AdaptStrategy, Destination, NavNode, NodeRef, PaneBackBehavior, PaneRole, TabMetadata,
};
pub use par_nav_config::{NavigatorConfig, PopPolicy};
pub use result_channel::{DeliveryOutcome, ResultChannel, ResultError, ResultHandle};
pub use scope::{
    ContainerBuilder, DeepLinkResolver, KeyGenerator, NoContainers, NoScopes, ScopeId,
    ScopeResolver, SequentialKeys, UuidKeys,
};
