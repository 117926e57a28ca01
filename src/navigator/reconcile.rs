//! Background cancellation of results for removed screens.

use crate::result_channel::ResultChannel;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Feeds removed-key sets to the reconcile task.
///
/// Sets are processed in commit order. The task holds the result channel
/// only, never a snapshot.
pub(super) struct Reconciler {
    results: Arc<ResultChannel>,
    tx: Option<mpsc::UnboundedSender<HashSet<String>>>,
    task: Option<JoinHandle<()>>,
}

impl Reconciler {
    /// Spawn the reconcile task on `runtime`; without a runtime every set
    /// is cancelled inline by `submit`
    pub(super) fn new(results: Arc<ResultChannel>, runtime: Option<Handle>) -> Self {
        let Some(runtime) = runtime else {
            log::debug!("Navigator reconciles inline");
            return Self {
                results,
                tx: None,
                task: None,
            };
        };

        let (tx, mut rx) = mpsc::unbounded_channel::<HashSet<String>>();
        let task_results = Arc::clone(&results);
        let task = runtime.spawn(async move {
            while let Some(keys) = rx.recv().await {
                crate::debug_log!("NAV_RECONCILE", "Cancelling results for {} screens", keys.len());
                for key in &keys {
                    task_results.cancel(key);
                }
            }
        });

        Self {
            results,
            tx: Some(tx),
            task: Some(task),
        }
    }

    /// Tombstone `removed` now and cancel it on the reconcile task
    pub(super) fn submit(&self, removed: HashSet<String>) {
        self.results.mark_doomed(removed.iter().cloned());
        let removed = match &self.tx {
            Some(tx) => match tx.send(removed) {
                Ok(()) => return,
                // Task is gone; fall through to inline cancellation
                Err(mpsc::error::SendError(removed)) => removed,
            },
            None => removed,
        };
        for key in &removed {
            self.results.cancel(key);
        }
    }

    /// Stop the reconcile task and cancel everything still pending
    pub(super) fn shutdown(&mut self) {
        self.tx = None;
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.results.cancel_all();
    }

    pub(super) fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for Reconciler {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
