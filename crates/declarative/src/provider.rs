//! Applies a staged change to one resource
//!
//! Each attempt issues exactly one of `remove`, `add` or an atomic batch of
//! attribute operations, chosen by the [`Change`] alone. Attempts run under
//! the resource's [`RetryPolicy`].

use crate::change::Change;
use crate::diff::{AttributeOp, defined_options, diff};
use crate::error::{Error, Result};
use crate::retry::{RetryCallback, RetryPolicy, Sleeper, with_retry};
use crate::types::{ApplyResult, DesiredResource};
use mgmtkit::backend::Transport;
use mgmtkit::{Command, Endpoint, Options, Outcome, ResourceAddress};

/// Attempt message when `remove` fails
pub const REMOVE_FAILED: &str = "Error removing resource";
/// Attempt message when `add` fails
pub const CREATE_FAILED: &str = "Error creating resource";

/// Applies changes to resources on one endpoint
pub struct Provider<'a, T: ?Sized> {
    endpoint: &'a Endpoint,
    transport: &'a T,
    sleeper: &'a dyn Sleeper,
}

impl<'a, T> Provider<'a, T>
where
    T: Transport + ?Sized,
{
    /// Create a provider for `endpoint`.
    pub fn new(endpoint: &'a Endpoint, transport: &'a T, sleeper: &'a dyn Sleeper) -> Self {
        Self {
            endpoint,
            transport,
            sleeper,
        }
    }

    /// Commit `change` for `resource`.
    ///
    /// `current` holds the options the resource had when the pass read the
    /// endpoint; it is only consulted for updates. A [`Change::NoOp`], or an
    /// update whose diff is empty, returns [`ApplyResult::NoChange`] without
    /// touching the endpoint.
    pub fn flush(
        &self,
        resource: &DesiredResource,
        address: &ResourceAddress,
        current: &Options,
        change: &Change,
        callback: Option<&mut dyn RetryCallback>,
    ) -> Result<ApplyResult> {
        let policy = RetryPolicy::for_resource(resource);

        match change {
            Change::NoOp => Ok(ApplyResult::NoChange),
            Change::Destroy => with_retry(&policy, self.sleeper, callback, |_| {
                self.submit(&[Command::remove(address.clone())], false, |_| {
                    REMOVE_FAILED.to_string()
                })?;
                log::info!("Removed {address}");
                Ok(ApplyResult::Removed)
            }),
            Change::Create => {
                let attributes = defined_options(&resource.options);
                with_retry(&policy, self.sleeper, callback, |_| {
                    self.submit(&[Command::add(address.clone(), &attributes)], false, |_| {
                        CREATE_FAILED.to_string()
                    })?;
                    log::info!("Created {address}");
                    Ok(ApplyResult::Created)
                })
            }
            Change::UpdateAttributes(desired) => {
                let ops = diff(current, desired);
                if ops.is_empty() {
                    log::debug!("{address} already matches desired attributes");
                    return Ok(ApplyResult::NoChange);
                }

                let commands = to_commands(&ops, address);
                with_retry(&policy, self.sleeper, callback, |_| {
                    self.submit(&commands, true, |outcome| {
                        format!("Failed setting attribute, {}", outcome.failure_text())
                    })?;
                    log::info!("Updated {} attribute(s) of {address}", ops.len());
                    Ok(ApplyResult::Modified)
                })
            }
        }
    }

    /// Run one attempt's commands and turn a failed outcome into an
    /// attempt error.
    fn submit<F>(&self, commands: &[Command], atomic: bool, failure: F) -> Result<()>
    where
        F: FnOnce(&Outcome) -> String,
    {
        for command in commands {
            log::debug!("{}", command.to_cli());
        }

        let outcome = self
            .transport
            .execute(self.endpoint, commands, atomic)
            .map_err(|e| Error::attempt(e.to_string()))?;

        if outcome.success {
            Ok(())
        } else {
            log::debug!("Operation failed: {}", outcome.failure_text());
            Err(Error::attempt(failure(&outcome)))
        }
    }
}

fn to_commands(ops: &[AttributeOp], address: &ResourceAddress) -> Vec<Command> {
    ops.iter().map(|op| op.to_command(address)).collect()
}
