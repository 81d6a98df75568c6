//! Transport abstraction for management operations.
//!
//! The [`Transport`] trait is the boundary between the reconciler and a
//! live server, allowing for different implementations (real CLI, in-memory
//! recorders for testing).

pub mod jboss_cli;

use crate::error::Result;
use crate::format::Command;
use crate::types::{Endpoint, Outcome};

/// Executes management operations against an endpoint.
pub trait Transport {
    /// Execute one or more commands and return the final outcome.
    ///
    /// With `atomic` set, multiple commands run as a single batch that the
    /// server applies all-or-nothing.
    fn execute(&self, endpoint: &Endpoint, commands: &[Command], atomic: bool) -> Result<Outcome>;

    /// Execute a single command.
    fn execute_one(&self, endpoint: &Endpoint, command: &Command) -> Result<Outcome> {
        self.execute(endpoint, std::slice::from_ref(command), false)
    }
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, endpoint: &Endpoint, commands: &[Command], atomic: bool) -> Result<Outcome> {
        (**self).execute(endpoint, commands, atomic)
    }
}

/// Get the default transport (real `jboss-cli.sh`).
pub fn default_transport() -> jboss_cli::JbossCliBackend {
    jboss_cli::JbossCliBackend::new()
}
