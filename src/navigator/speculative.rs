//! Predictive back gestures.
//!
//! `start` computes the back result without publishing it, `update` only
//! moves the advisory progress, and `commit` publishes the precomputed
//! candidate through the normal commit path. While a gesture is open every
//! other command is rejected with `NavError::GestureInProgress`, so the
//! candidate can never go stale.

use super::error::NavError;
use super::snapshot::{BackOutcome, GestureState};
use super::{Navigator, Speculation};
use crate::mutator::{self, BackResult};
use crate::node::Destination;
use tokio::sync::watch;

impl<D: Destination> Navigator<D> {
    /// Open a back gesture and preview its outcome
    pub fn start_speculative_back(&self) -> Result<GestureState, NavError> {
        let result = {
            let mut state = self.writer.lock();
            Self::ensure_writable(&state).and_then(|()| {
                let current = self.published.load_full();
                let candidate = match mutator::resolve_back(&current.root) {
                    BackResult::Handled(root) => Some(root),
                    BackResult::DelegateToHost => None,
                    BackResult::CannotHandle(err) => return Err(err.into()),
                };
                let target_key = candidate
                    .as_ref()
                    .and_then(|root| root.active_leaf())
                    .map(|leaf| leaf.key().to_string());
                state.speculation = Some(Speculation { candidate });

                let gesture = GestureState::InProgress {
                    progress: 0.0,
                    target_key,
                };
                self.gesture_tx.send_replace(gesture.clone());
                crate::debug_info!("NAV_GESTURE", "Speculative back started: {:?}", gesture);
                Ok(gesture)
            })
        };
        result.map_err(|err| self.report(err))
    }

    /// Report gesture progress; clamped to `0.0..=1.0`
    pub fn update_speculative_back(&self, progress: f32) -> Result<(), NavError> {
        let result = {
            let state = self.writer.lock();
            if state.disposed {
                Err(NavError::Disposed)
            } else if state.speculation.is_none() {
                Err(NavError::NoGesture)
            } else {
                let progress = if progress.is_nan() { 0.0 } else { progress.clamp(0.0, 1.0) };
                self.gesture_tx.send_modify(|gesture| {
                    if let GestureState::InProgress { progress: p, .. } = gesture {
                        *p = progress;
                    }
                });
                crate::debug_trace!("NAV_GESTURE", "Speculative back progress {:.2}", progress);
                Ok(())
            }
        };
        result.map_err(|err| self.report(err))
    }

    /// Abandon the gesture; the published snapshot is unchanged
    pub fn cancel_speculative_back(&self) -> Result<(), NavError> {
        let result = {
            let mut state = self.writer.lock();
            match state.speculation.take() {
                _ if state.disposed => Err(NavError::Disposed),
                Some(_) => {
                    self.gesture_tx.send_replace(GestureState::Idle);
                    crate::debug_info!("NAV_GESTURE", "Speculative back cancelled");
                    Ok(())
                }
                None => Err(NavError::NoGesture),
            }
        };
        result.map_err(|err| self.report(err))
    }

    /// Publish the previewed back result
    pub fn commit_speculative_back(&self) -> Result<BackOutcome<D>, NavError> {
        let result = {
            let mut state = self.writer.lock();
            match state.speculation.take() {
                _ if state.disposed => Err(NavError::Disposed),
                Some(Speculation { candidate }) => {
                    self.gesture_tx.send_replace(GestureState::Idle);
                    crate::debug_info!("NAV_GESTURE", "Speculative back committed");
                    Ok(match candidate {
                        Some(root) => BackOutcome::Handled(self.commit(&mut state, root)),
                        None => BackOutcome::DelegateToHost,
                    })
                }
                None => Err(NavError::NoGesture),
            }
        };
        result.map_err(|err| self.report(err))
    }

    /// Current advisory gesture state
    pub fn gesture(&self) -> GestureState {
        self.gesture_tx.borrow().clone()
    }

    pub fn subscribe_gesture(&self) -> watch::Receiver<GestureState> {
        self.gesture_tx.subscribe()
    }
}
