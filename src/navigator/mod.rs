//! Stateful navigation controller.
//!
//! The [`Navigator`] owns the current snapshot and is its only writer.
//! Commands run the pure mutator under a single `parking_lot` mutex and
//! publish the result through an `ArcSwap` (cheap reads) and a `tokio`
//! watch channel (change notification). Every commit is diffed against the
//! previous snapshot and removed screens are handed to the result channel.
//!
//! Sub-modules:
//! - [`builder`]: Navigator construction
//! - [`commands`]: Navigation commands
//! - [`speculative`]: Predictive back gestures
//! - [`snapshot`]: Published state types
//! - [`error`]: `NavError` and error handlers
//! - `reconcile`: Background result cancellation

mod builder;
mod commands;
mod error;
mod reconcile;
mod snapshot;
mod speculative;


pub use builder::NavigatorBuilder;
pub use error::{LogErrorHandler, NavError, NavErrorHandler, PanicOnConfigError, RecordingErrorHandler};
pub use snapshot::{BackOutcome, GestureState, NavSnapshot, PopOutcome};

use crate::diff::diff;
use crate::mutator::{MutationError, PushContext};
use crate::node::{Destination, NodeRef};
use crate::result_channel::{DeliveryOutcome, ResultChannel};
use crate::scope::{ContainerBuilder, KeyGenerator, ScopeResolver};
use arc_swap::ArcSwap;
use par_nav_config::NavigatorConfig;
use parking_lot::Mutex;
use reconcile::Reconciler;
use std::sync::Arc;
use tokio::sync::watch;

/// Writer-side state, only touched with the writer lock held
struct WriterState<D> {
    reconciler: Reconciler,
    speculation: Option<Speculation<D>>,
    disposed: bool,
}

/// An open speculative back gesture
struct Speculation<D> {
    /// Tree published if the gesture commits; `None` delegates to the host
    candidate: Option<NodeRef<D>>,
}

/// Navigation controller
pub struct Navigator<D: Destination> {
    writer: Mutex<WriterState<D>>,
    published: ArcSwap<NavSnapshot<D>>,
    snapshot_tx: watch::Sender<Arc<NavSnapshot<D>>>,
    gesture_tx: watch::Sender<GestureState>,
    results: Arc<ResultChannel>,
    scopes: Box<dyn ScopeResolver<D>>,
    containers: Box<dyn ContainerBuilder<D>>,
    keys: Box<dyn KeyGenerator>,
    error_handler: Box<dyn NavErrorHandler>,
    config: NavigatorConfig,
}

impl<D: Destination> Navigator<D> {
    pub fn builder() -> NavigatorBuilder<D> {
        NavigatorBuilder::new()
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// The latest published snapshot
    pub fn snapshot(&self) -> Arc<NavSnapshot<D>> {
        self.published.load_full()
    }

    /// Root of the current tree
    pub fn current(&self) -> NodeRef<D> {
        Arc::clone(&self.published.load().root)
    }

    pub fn current_destination(&self) -> Option<D> {
        self.published.load().current_destination.clone()
    }

    pub fn current_key(&self) -> Option<String> {
        self.published.load().current_key.clone()
    }

    pub fn can_go_back(&self) -> bool {
        self.published.load().can_go_back
    }

    pub fn version(&self) -> u64 {
        self.published.load().version
    }

    /// Receiver notified on every commit
    pub fn subscribe(&self) -> watch::Receiver<Arc<NavSnapshot<D>>> {
        self.snapshot_tx.subscribe()
    }

    /// Channel holding the pending results of screens opened for result
    pub fn results(&self) -> &Arc<ResultChannel> {
        &self.results
    }

    /// Deliver `value` to the screen `key` without navigating
    pub fn deliver_result<R: Send + 'static>(&self, key: &str, value: R) -> DeliveryOutcome {
        self.results.deliver(key, value)
    }

    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    pub fn is_disposed(&self) -> bool {
        self.writer.lock().disposed
    }

    /// Whether the reconcile task is alive (false when reconciling inline)
    pub fn is_reconciling_in_background(&self) -> bool {
        self.writer.lock().reconciler.is_running()
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Stop reconciliation and cancel every pending result.
    ///
    /// Later commands fail with `NavError::Disposed`. Idempotent.
    pub fn dispose(&self) {
        let mut state = self.writer.lock();
        if state.disposed {
            return;
        }
        state.disposed = true;
        state.speculation = None;
        state.reconciler.shutdown();
        drop(state);

        self.gesture_tx.send_replace(GestureState::Idle);
        log::info!("Navigator disposed at version {}", self.version());
    }

    // ========================================================================
    // Commit path
    // ========================================================================

    fn push_context(&self) -> PushContext<'_, D> {
        PushContext::new(self.scopes.as_ref(), self.containers.as_ref(), self.keys.as_ref())
    }

    /// Reject commands on a disposed navigator or while a gesture is open
    fn ensure_writable(state: &WriterState<D>) -> Result<(), NavError> {
        if state.disposed {
            return Err(NavError::Disposed);
        }
        if state.speculation.is_some() {
            return Err(NavError::GestureInProgress);
        }
        Ok(())
    }

    /// Publish `root` as the next snapshot.
    ///
    /// Returns the current snapshot untouched when `root` is the tree that
    /// is already published.
    fn commit(&self, state: &mut WriterState<D>, root: NodeRef<D>) -> Arc<NavSnapshot<D>> {
        let old = self.published.load_full();
        if Arc::ptr_eq(&old.root, &root) {
            return old;
        }
        debug_assert!(crate::node::validate(&root).is_ok());

        let snapshot = Arc::new(NavSnapshot::new(old.version + 1, root));
        self.published.store(Arc::clone(&snapshot));
        self.snapshot_tx.send_replace(Arc::clone(&snapshot));

        let removed = diff(&old.root, &snapshot.root);
        crate::debug_info!(
            "NAV_COMMIT",
            "v{} -> {:?} ({} screens removed)",
            snapshot.version,
            snapshot.current_key,
            removed.len()
        );
        if !removed.is_empty() {
            state.reconciler.submit(removed);
        }
        snapshot
    }

    /// Run a mutation against the current tree and commit its result
    fn mutate<F>(&self, f: F) -> Result<Arc<NavSnapshot<D>>, NavError>
    where
        F: FnOnce(&NodeRef<D>, &PushContext<'_, D>) -> Result<NodeRef<D>, MutationError>,
    {
        let result = {
            let mut state = self.writer.lock();
            Self::ensure_writable(&state).and_then(|()| {
                let current = self.published.load_full();
                let root = f(&current.root, &self.push_context())?;
                Ok(self.commit(&mut state, root))
            })
        };
        result.map_err(|err| self.report(err))
    }

    /// Hand `error` to the error handler and give it back for returning
    fn report(&self, error: NavError) -> NavError {
        crate::debug_info!("NAV_ERROR", "{}", error);
        self.error_handler.handle(&error);
        error
    }
}

impl<D: Destination> Drop for Navigator<D> {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<D: Destination> std::fmt::Debug for Navigator<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let snapshot = self.published.load();
        f.debug_struct("Navigator")
            .field("version", &snapshot.version)
            .field("current_key", &snapshot.current_key)
            .field("results", &self.results)
            .finish()
    }
}
