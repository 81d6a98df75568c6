//! Progress and confirmation traits
//!
//! These traits allow the declarative crate to be used without
//! depending on a specific terminal UI.

use crate::change::Change;
use crate::error::Error;
use crate::retry::RetryCallback;
use crate::types::ApplyResult;
use std::time::Duration;

/// Progress callback for execution operations
///
/// Implement this trait to receive progress updates during execution.
pub trait ProgressCallback {
    /// Called when starting to apply a single resource
    fn on_resource_start(&mut self, name: &str, change: &Change);

    /// Called after a failed attempt that will be retried
    fn on_retry(&mut self, _name: &str, _attempt: u32, _tries: u32, _error: &Error, _delay: Duration) {}

    /// Called when a resource application completes
    fn on_resource_complete(&mut self, name: &str, result: &ApplyResult);
}

/// Confirmation callback for user interaction
///
/// Implement this trait to handle user confirmations.
pub trait ConfirmCallback {
    /// Ask the user to confirm an action
    ///
    /// # Arguments
    /// * `prompt` - The confirmation prompt to show
    ///
    /// # Returns
    /// `true` if the user confirmed, `false` otherwise
    fn confirm(&mut self, prompt: &str) -> std::io::Result<bool>;
}

/// No-op progress callback
pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_resource_start(&mut self, _name: &str, _change: &Change) {}
    fn on_resource_complete(&mut self, _name: &str, _result: &ApplyResult) {}
}

/// Auto-confirm callback (always returns true)
pub struct AutoConfirm;

impl ConfirmCallback for AutoConfirm {
    fn confirm(&mut self, _prompt: &str) -> std::io::Result<bool> {
        Ok(true)
    }
}

/// Auto-decline callback (always returns false)
pub struct AutoDecline;

impl ConfirmCallback for AutoDecline {
    fn confirm(&mut self, _prompt: &str) -> std::io::Result<bool> {
        Ok(false)
    }
}

/// Forwards retry notifications of one resource to a [`ProgressCallback`].
pub(crate) struct RetryReporter<'a, P: ?Sized> {
    name: &'a str,
    progress: &'a mut P,
}

impl<'a, P: ProgressCallback + ?Sized> RetryReporter<'a, P> {
    pub(crate) fn new(name: &'a str, progress: &'a mut P) -> Self {
        Self { name, progress }
    }
}

impl<P: ProgressCallback + ?Sized> RetryCallback for RetryReporter<'_, P> {
    fn on_retry(&mut self, attempt: u32, tries: u32, error: &Error, delay: Duration) {
        self.progress.on_retry(self.name, attempt, tries, error, delay);
    }
}
