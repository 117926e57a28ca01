//! Navigator errors and pluggable error handling.

use crate::mutator::MutationError;
use crate::node::InvariantViolation;
use parking_lot::Mutex;
use thiserror::Error;

/// Error returned by a navigator command
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavError {
    #[error("navigation failed: {0}")]
    Mutation(MutationError),

    /// The container configuration could not serve a destination
    #[error("navigation configuration error: {0}")]
    Configuration(MutationError),

    #[error("a speculative back gesture is in progress")]
    GestureInProgress,

    #[error("no speculative back gesture is in progress")]
    NoGesture,

    #[error("navigator has been disposed")]
    Disposed,

    #[error("no destination matches deep link '{0}'")]
    UnresolvedDeepLink(String),

    #[error("invalid navigation tree: {0}")]
    InvalidTree(#[from] InvariantViolation),

    #[error("invalid navigator config: {0}")]
    InvalidConfig(String),
}

impl From<MutationError> for NavError {
    fn from(err: MutationError) -> Self {
        if err.is_configuration_error() {
            NavError::Configuration(err)
        } else {
            NavError::Mutation(err)
        }
    }
}

impl NavError {
    /// Errors that point at the application's setup rather than at the call
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            NavError::Configuration(_) | NavError::InvalidTree(_) | NavError::InvalidConfig(_)
        )
    }
}

/// Decides what happens to a failed command besides returning the error.
///
/// Called synchronously from the command that failed, with the writer lock
/// released.
pub trait NavErrorHandler: Send + Sync {
    fn handle(&self, error: &NavError);
}

/// Logs errors through the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogErrorHandler;

impl NavErrorHandler for LogErrorHandler {
    fn handle(&self, error: &NavError) {
        if error.is_configuration_error() {
            log::error!("{}", error);
        } else {
            log::warn!("{}", error);
        }
    }
}

/// Panics on configuration errors, logs the rest.
///
/// Meant for development builds where a missing container should stop the
/// program at the offending call.
#[derive(Debug, Default, Clone, Copy)]
pub struct PanicOnConfigError;

impl NavErrorHandler for PanicOnConfigError {
    fn handle(&self, error: &NavError) {
        if error.is_configuration_error() {
            panic!("{error}");
        }
        LogErrorHandler.handle(error);
    }
}

/// Keeps every reported error; used by tests and the replay CLI
#[derive(Debug, Default)]
pub struct RecordingErrorHandler {
    errors: Mutex<Vec<NavError>>,
}

impl RecordingErrorHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Errors reported so far, oldest first
    pub fn errors(&self) -> Vec<NavError> {
        self.errors.lock().clone()
    }

    pub fn take(&self) -> Vec<NavError> {
        std::mem::take(&mut *self.errors.lock())
    }

    pub fn is_empty(&self) -> bool {
        self.errors.lock().is_empty()
    }
}

impl NavErrorHandler for RecordingErrorHandler {
    fn handle(&self, error: &NavError) {
        self.errors.lock().push(error.clone());
    }
}

impl<T: NavErrorHandler + ?Sized> NavErrorHandler for std::sync::Arc<T> {
    fn handle(&self, error: &NavError) {
        (**self).handle(error);
    }
}
