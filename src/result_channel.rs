//! Pending screen results.
//!
//! A screen opened "for result" registers a single-shot slot under its key.
//! The slot resolves when a value is delivered for that key, or is cancelled
//! when the screen leaves the tree.
//!
//! Removal is two-phase. At commit time the navigator tombstones the removed
//! keys with [`ResultChannel::mark_doomed`], which rejects any later delivery
//! immediately; the reconcile task then runs [`ResultChannel::cancel`] to
//! drop the slots and wake the waiting callers.

use parking_lot::Mutex;
use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::marker::PhantomData;
use thiserror::Error;
use tokio::sync::oneshot;

type Payload = Box<dyn Any + Send>;

/// Outcome of [`ResultChannel::deliver`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The waiting caller received the value
    Delivered,
    /// Nobody is waiting on this key (never registered, already resolved,
    /// or the caller stopped listening)
    NoPendingRequest,
    /// The screen was removed from the tree before the value arrived
    Cancelled,
}

/// Why a [`ResultHandle`] resolved without a value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResultError {
    #[error("result for '{key}' was cancelled")]
    Cancelled { key: String },

    #[error("result for '{key}' is not a {expected}")]
    TypeMismatch { key: String, expected: &'static str },
}

#[derive(Default)]
struct ChannelState {
    pending: HashMap<String, oneshot::Sender<Payload>>,
    doomed: HashSet<String>,
}

/// Keyed map of pending single-shot result slots
#[derive(Default)]
pub struct ResultChannel {
    state: Mutex<ChannelState>,
}

impl ResultChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a slot for the screen `key`.
    ///
    /// Registering a key that already has a slot replaces it; the previous
    /// handle resolves as cancelled.
    pub fn register<R: Send + 'static>(&self, key: impl Into<String>) -> ResultHandle<R> {
        let key = key.into();
        let (tx, rx) = oneshot::channel();
        let mut state = self.state.lock();
        if state.doomed.contains(&key) {
            crate::debug_log!("NAV_RESULT", "Register for doomed key '{}' is cancelled", key);
        } else if state.pending.insert(key.clone(), tx).is_some() {
            crate::debug_info!("NAV_RESULT", "Replaced pending result slot for '{}'", key);
        }
        ResultHandle {
            key,
            rx,
            _marker: PhantomData,
        }
    }

    /// Resolve the slot for `key` with `value`
    pub fn deliver<R: Send + 'static>(&self, key: &str, value: R) -> DeliveryOutcome {
        let sender = {
            let mut state = self.state.lock();
            if state.doomed.contains(key) {
                crate::debug_info!("NAV_RESULT", "Rejected result for removed screen '{}'", key);
                return DeliveryOutcome::Cancelled;
            }
            state.pending.remove(key)
        };
        let Some(tx) = sender else {
            return DeliveryOutcome::NoPendingRequest;
        };
        if tx.send(Box::new(value)).is_err() {
            return DeliveryOutcome::NoPendingRequest;
        }
        crate::debug_log!("NAV_RESULT", "Delivered result for '{}'", key);
        DeliveryOutcome::Delivered
    }

    /// Tombstone `keys` so deliveries made from now on are rejected
    pub fn mark_doomed<I, S>(&self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut state = self.state.lock();
        state.doomed.extend(keys.into_iter().map(Into::into));
    }

    /// Drop the slot for `key`, waking its caller with `Cancelled`.
    ///
    /// No-op for keys that are unknown or already resolved.
    pub fn cancel(&self, key: &str) {
        let mut state = self.state.lock();
        state.doomed.remove(key);
        if state.pending.remove(key).is_some() {
            crate::debug_log!("NAV_RESULT", "Cancelled pending result for '{}'", key);
        }
    }

    /// Cancel every pending slot
    pub fn cancel_all(&self) {
        let mut state = self.state.lock();
        let count = state.pending.len();
        state.pending.clear();
        state.doomed.clear();
        if count > 0 {
            log::debug!("Cancelled {} pending navigation results", count);
        }
    }

    pub fn is_pending(&self, key: &str) -> bool {
        self.state.lock().pending.contains_key(key)
    }

    pub fn is_doomed(&self, key: &str) -> bool {
        self.state.lock().doomed.contains(key)
    }

    pub fn pending_count(&self) -> usize {
        self.state.lock().pending.len()
    }
}

impl std::fmt::Debug for ResultChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("ResultChannel")
            .field("pending", &state.pending.len())
            .field("doomed", &state.doomed.len())
            .finish()
    }
}

/// Receiving side of a registered slot
pub struct ResultHandle<R> {
    key: String,
    rx: oneshot::Receiver<Payload>,
    _marker: PhantomData<fn() -> R>,
}

impl<R> std::fmt::Debug for ResultHandle<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultHandle")
            .field("key", &self.key)
            .field("type", &std::any::type_name::<R>())
            .finish()
    }
}

impl<R: 'static> ResultHandle<R> {
    /// Key of the screen the result belongs to
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Wait for the value
    pub async fn recv(self) -> Result<R, ResultError> {
        let Self { key, rx, .. } = self;
        match rx.await {
            Ok(payload) => downcast(key, payload),
            Err(_) => Err(ResultError::Cancelled { key }),
        }
    }

    /// Poll without waiting; `Ok(None)` while the slot is still open
    pub fn try_recv(&mut self) -> Result<Option<R>, ResultError> {
        match self.rx.try_recv() {
            Ok(payload) => downcast(self.key.clone(), payload).map(Some),
            Err(oneshot::error::TryRecvError::Empty) => Ok(None),
            Err(oneshot::error::TryRecvError::Closed) => Err(ResultError::Cancelled {
                key: self.key.clone(),
            }),
        }
    }
}

fn downcast<R: 'static>(key: String, payload: Payload) -> Result<R, ResultError> {
    payload
        .downcast::<R>()
        .map(|value| *value)
        .map_err(|_| ResultError::TypeMismatch {
            key,
            expected: std::any::type_name::<R>(),
        })
}
