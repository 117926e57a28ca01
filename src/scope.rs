//! External collaborators of the navigation core.
//!
//! The core consumes these lookups but never implements the tables behind
//! them; those come from the application's configuration layer:
//!
//! - [`ScopeResolver`]: destination → scope membership
//! - [`ContainerBuilder`]: destinations that expand into whole containers
//! - [`KeyGenerator`]: fresh node keys
//! - [`DeepLinkResolver`]: raw link string → destination
//!
//! Plain closures implement `ScopeResolver` and `DeepLinkResolver`.

use crate::node::NavNode;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identifier of a logical group of destinations
pub type ScopeId = String;

/// Maps a destination to the scope it belongs to
pub trait ScopeResolver<D>: Send + Sync {
    /// `None` means the destination is scope-less and may be pushed anywhere
    fn scope_of(&self, destination: &D) -> Option<ScopeId>;
}

impl<D, F> ScopeResolver<D> for F
where
    F: Fn(&D) -> Option<ScopeId> + Send + Sync,
{
    fn scope_of(&self, destination: &D) -> Option<ScopeId> {
        self(destination)
    }
}

/// Resolver for applications without scopes
#[derive(Debug, Clone, Copy, Default)]
pub struct NoScopes;

impl<D> ScopeResolver<D> for NoScopes {
    fn scope_of(&self, _destination: &D) -> Option<ScopeId> {
        None
    }
}

/// Builds container subtrees for destinations that are container roots
pub trait ContainerBuilder<D>: Send + Sync {
    /// Whether pushing `destination` must produce a container instead of a
    /// bare screen
    fn is_container_root(&self, destination: &D) -> bool;

    /// Build the container for `destination`.
    ///
    /// `keys` must be used for every node key so the result cannot collide
    /// with the tree it is inserted into. Parent keys inside the subtree
    /// must be consistent; the caller attaches the returned root to its new
    /// parent. Returning `None` for a container root is a configuration
    /// error.
    fn build_container(&self, destination: &D, keys: &dyn KeyGenerator) -> Option<NavNode<D>>;
}

/// Builder for applications whose destinations are all plain screens
#[derive(Debug, Clone, Copy, Default)]
pub struct NoContainers;

impl<D> ContainerBuilder<D> for NoContainers {
    fn is_container_root(&self, _destination: &D) -> bool {
        false
    }

    fn build_container(&self, _destination: &D, _keys: &dyn KeyGenerator) -> Option<NavNode<D>> {
        None
    }
}

/// Source of unique node keys
pub trait KeyGenerator: Send + Sync {
    fn next_key(&self) -> String;
}

/// Random v4 UUID keys
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidKeys;

impl KeyGenerator for UuidKeys {
    fn next_key(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Deterministic `prefix-N` keys, counting from 1
#[derive(Debug)]
pub struct SequentialKeys {
    prefix: String,
    next: AtomicU64,
}

impl SequentialKeys {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }

    /// Move the counter past every `prefix-N` key in `existing`
    pub fn resume_after<'a>(&self, existing: impl IntoIterator<Item = &'a str>) {
        let highest = existing
            .into_iter()
            .filter_map(|key| key.strip_prefix(self.prefix.as_str())?.strip_prefix('-'))
            .filter_map(|n| n.parse::<u64>().ok())
            .max();
        if let Some(highest) = highest {
            self.next.fetch_max(highest.saturating_add(1), Ordering::Relaxed);
        }
    }
}

impl KeyGenerator for SequentialKeys {
    fn next_key(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}-{}", self.prefix, n)
    }
}

/// Resolves a raw deep link into a destination.
///
/// Pattern matching lives outside the core; callers resolve first and
/// then hand the destination to `Navigator::handle_deep_link`.
pub trait DeepLinkResolver<D>: Send + Sync {
    fn resolve(&self, raw_link: &str) -> Option<D>;
}

impl<D, F> DeepLinkResolver<D> for F
where
    F: Fn(&str) -> Option<D> + Send + Sync,
{
    fn resolve(&self, raw_link: &str) -> Option<D> {
        self(raw_link)
    }
}
