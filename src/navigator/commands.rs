//! Navigation commands.
//!
//! Every command either publishes exactly one new snapshot or leaves the
//! current one in place and returns a `NavError`. Commands that change
//! nothing (switching to the active tab, say) publish nothing.

use super::error::NavError;
use super::snapshot::{BackOutcome, NavSnapshot, PopOutcome};
use super::{Navigator, WriterState};
use crate::mutator::{self, BackResult, PopResult};
use crate::node::{Destination, NavNode, PaneRole};
use crate::result_channel::ResultHandle;
use crate::scope::DeepLinkResolver;
use std::sync::Arc;

impl<D: Destination> Navigator<D> {
    /// Push `destination` onto the stack that owns its scope
    pub fn navigate(&self, destination: D) -> Result<Arc<NavSnapshot<D>>, NavError> {
        self.mutate(|tree, ctx| mutator::push(tree, destination, ctx))
    }

    /// Resolve one back step
    pub fn navigate_back(&self) -> Result<BackOutcome<D>, NavError> {
        let result = {
            let mut state = self.writer.lock();
            Self::ensure_writable(&state).and_then(|()| self.back_locked(&mut state))
        };
        result.map_err(|err| self.report(err))
    }

    /// Replace the active screen with `destination`
    pub fn navigate_and_replace(&self, destination: D) -> Result<Arc<NavSnapshot<D>>, NavError> {
        self.mutate(|tree, ctx| mutator::replace_current(tree, destination, ctx))
    }

    /// Pop back to the entry matching `predicate`, then push `destination`.
    ///
    /// Both steps publish as a single snapshot.
    pub fn navigate_and_clear_to<F>(
        &self,
        destination: D,
        predicate: F,
        inclusive: bool,
    ) -> Result<Arc<NavSnapshot<D>>, NavError>
    where
        F: Fn(&NavNode<D>) -> bool,
    {
        let max_steps = self.config.max_pop_to_steps;
        self.mutate(|tree, ctx| {
            let cleared = mutator::pop_to(tree, predicate, inclusive, max_steps)?;
            mutator::push(&cleared, destination, ctx)
        })
    }

    /// Reset the outermost stack to `destination`
    pub fn navigate_and_clear_all(&self, destination: D) -> Result<Arc<NavSnapshot<D>>, NavError> {
        self.mutate(|tree, ctx| mutator::clear_and_push(tree, destination, ctx))
    }

    /// Push onto an explicit stack, ignoring scopes
    pub fn push_to_stack(
        &self,
        stack_key: &str,
        destination: D,
    ) -> Result<Arc<NavSnapshot<D>>, NavError> {
        self.mutate(|tree, ctx| mutator::push_to_stack(tree, stack_key, destination, ctx))
    }

    /// Pop the active entry using the configured pop policy
    pub fn pop(&self) -> Result<PopOutcome<D>, NavError> {
        let policy = self.config.pop_policy;
        self.pop_with(|tree| mutator::pop(tree, policy))
    }

    /// Pop until the active screen matches `predicate`
    pub fn pop_to<F>(&self, predicate: F, inclusive: bool) -> Result<Arc<NavSnapshot<D>>, NavError>
    where
        F: Fn(&NavNode<D>) -> bool,
    {
        let max_steps = self.config.max_pop_to_steps;
        self.mutate(|tree, _| mutator::pop_to(tree, predicate, inclusive, max_steps))
    }

    /// Switch branch `index` of the tab `tab_key`.
    ///
    /// Without a key this targets the innermost tab on the active path, not
    /// the outermost one. With nested tabs, pass the outer tab's key to
    /// switch its branches.
    pub fn switch_tab(
        &self,
        tab_key: Option<&str>,
        index: usize,
    ) -> Result<Arc<NavSnapshot<D>>, NavError> {
        match tab_key {
            Some(key) => self.mutate(|tree, _| mutator::switch_tab(tree, key, index)),
            None => self.switch_active_tab(index),
        }
    }

    pub fn switch_active_tab(&self, index: usize) -> Result<Arc<NavSnapshot<D>>, NavError> {
        self.mutate(|tree, _| mutator::switch_active_tab(tree, index))
    }

    /// Show `destination` in `role` of the pane `pane_key`
    pub fn navigate_to_pane(
        &self,
        pane_key: &str,
        role: PaneRole,
        destination: D,
        switch_focus: bool,
    ) -> Result<Arc<NavSnapshot<D>>, NavError> {
        self.mutate(|tree, ctx| {
            mutator::navigate_to_pane(tree, pane_key, role, destination, switch_focus, ctx)
        })
    }

    pub fn switch_active_pane(
        &self,
        pane_key: &str,
        role: PaneRole,
    ) -> Result<Arc<NavSnapshot<D>>, NavError> {
        self.mutate(|tree, _| mutator::switch_active_pane(tree, pane_key, role))
    }

    /// Pop one entry from `role` of the pane `pane_key`
    pub fn pop_pane(&self, pane_key: &str, role: PaneRole) -> Result<PopOutcome<D>, NavError> {
        self.pop_with(|tree| mutator::pop_pane(tree, pane_key, role))
    }

    /// Navigate to a destination produced by a deep link
    pub fn handle_deep_link(&self, destination: D) -> Result<Arc<NavSnapshot<D>>, NavError> {
        log::info!("Handling deep link to {:?}", destination);
        self.navigate(destination)
    }

    /// Resolve `raw_link` with `resolver` and navigate to the result
    pub fn handle_deep_link_uri(
        &self,
        raw_link: &str,
        resolver: &dyn DeepLinkResolver<D>,
    ) -> Result<Arc<NavSnapshot<D>>, NavError> {
        match resolver.resolve(raw_link) {
            Some(destination) => self.handle_deep_link(destination),
            None => Err(self.report(NavError::UnresolvedDeepLink(raw_link.to_string()))),
        }
    }

    /// Navigate to `destination` and wait for the value it sends back.
    ///
    /// The slot is registered before the writer lock is released, so no
    /// delivery can race the registration.
    pub fn navigate_for_result<R: Send + 'static>(
        &self,
        destination: D,
    ) -> Result<ResultHandle<R>, NavError> {
        let result = {
            let mut state = self.writer.lock();
            Self::ensure_writable(&state).and_then(|()| {
                let current = self.published.load_full();
                let root = mutator::push(&current.root, destination, &self.push_context())?;
                let snapshot = self.commit(&mut state, root);
                let key = snapshot
                    .current_key
                    .clone()
                    .ok_or(mutator::MutationError::EmptyTree)?;
                Ok(self.results.register::<R>(key))
            })
        };
        result.map_err(|err| self.report(err))
    }

    /// Deliver `value` to the active screen's caller, then go back
    pub fn navigate_back_with_result<R: Send + 'static>(
        &self,
        value: R,
    ) -> Result<BackOutcome<D>, NavError> {
        let result = {
            let mut state = self.writer.lock();
            Self::ensure_writable(&state).and_then(|()| {
                if let Some(key) = self.published.load().current_key.as_deref() {
                    let outcome = self.results.deliver(key, value);
                    crate::debug_log!("NAV_RESULT", "Result for '{}': {:?}", key, outcome);
                }
                self.back_locked(&mut state)
            })
        };
        result.map_err(|err| self.report(err))
    }

    pub(super) fn back_locked(&self, state: &mut WriterState<D>) -> Result<BackOutcome<D>, NavError> {
        let current = self.published.load_full();
        match mutator::resolve_back(&current.root) {
            BackResult::Handled(root) => Ok(BackOutcome::Handled(self.commit(state, root))),
            BackResult::DelegateToHost => {
                log::debug!("Back delegated to host at version {}", current.version);
                Ok(BackOutcome::DelegateToHost)
            }
            BackResult::CannotHandle(err) => Err(err.into()),
        }
    }

    fn pop_with<F>(&self, f: F) -> Result<PopOutcome<D>, NavError>
    where
        F: FnOnce(&crate::node::NodeRef<D>) -> Result<PopResult<D>, mutator::MutationError>,
    {
        let result = {
            let mut state = self.writer.lock();
            Self::ensure_writable(&state).and_then(|()| {
                let current = self.published.load_full();
                Ok(match f(&current.root)? {
                    PopResult::Popped(root) => PopOutcome::Popped(self.commit(&mut state, root)),
                    PopResult::AlreadyEmpty => PopOutcome::AlreadyEmpty,
                    PopResult::AtRoot => PopOutcome::AtRoot,
                })
            })
        };
        result.map_err(|err| self.report(err))
    }
}
