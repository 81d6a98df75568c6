//! Core types for declarative resource management

use mgmtkit::{Endpoint, Options};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Endpoints by name, as referenced by a resource's `server`.
pub type Endpoints = BTreeMap<String, Endpoint>;

/// Server a resource targets when it names none.
pub const DEFAULT_SERVER: &str = "default";

/// Desired or observed lifecycle state of a resource
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ensure {
    /// Resource exists
    #[default]
    Present,
    /// Resource does not exist
    Absent,
}

impl fmt::Display for Ensure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ensure::Present => write!(f, "present"),
            Ensure::Absent => write!(f, "absent"),
        }
    }
}

/// A declared management-model resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesiredResource {
    /// Unique name of the declaration
    pub name: String,
    /// Resource address, e.g. `subsystem/datasources/data-source/ExampleDS`
    pub address: String,
    /// Desired attributes; `"undefined"` asks for an attribute to be cleared
    #[serde(default)]
    pub options: Options,
    /// Desired lifecycle state
    #[serde(default)]
    pub ensure: Ensure,
    /// Endpoint name
    #[serde(default = "default_server")]
    pub server: String,
    /// Maximum apply attempts
    #[serde(default = "default_tries")]
    pub tries: u32,
    /// Seconds to wait between attempts
    #[serde(default)]
    pub try_sleep: f64,
    /// Skip this resource entirely
    #[serde(default)]
    pub noop: bool,
}

fn default_server() -> String {
    DEFAULT_SERVER.to_string()
}

fn default_tries() -> u32 {
    1
}

impl DesiredResource {
    /// Create a resource that should be present with no options.
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            options: Options::new(),
            ensure: Ensure::Present,
            server: default_server(),
            tries: default_tries(),
            try_sleep: 0.0,
            noop: false,
        }
    }

    /// Set the desired lifecycle state.
    pub fn with_ensure(mut self, ensure: Ensure) -> Self {
        self.ensure = ensure;
        self
    }

    /// Add a desired option.
    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.options.insert(name.into(), value.into());
        self
    }

    /// Target a named server.
    pub fn on_server(mut self, server: impl Into<String>) -> Self {
        self.server = server.into();
        self
    }

    /// Set attempts and delay between them.
    pub fn with_retries(mut self, tries: u32, try_sleep: f64) -> Self {
        self.tries = tries;
        self.try_sleep = try_sleep;
        self
    }

    /// Mark as no-op.
    pub fn noop(mut self) -> Self {
        self.noop = true;
        self
    }

    /// Delay between attempts; negative or non-finite values count as zero.
    pub fn try_sleep_duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.try_sleep).unwrap_or_default()
    }
}

/// State of a resource as found in the endpoint's resource tree
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentState {
    /// Whether the address resolved to a node
    pub ensure: Ensure,
    /// Entries of the resolved node; empty when absent
    pub options: Options,
}

impl CurrentState {
    /// A resource that exists with the given entries.
    pub fn present(options: Options) -> Self {
        Self {
            ensure: Ensure::Present,
            options,
        }
    }

    /// A resource that does not exist.
    pub fn absent() -> Self {
        Self {
            ensure: Ensure::Absent,
            options: Options::new(),
        }
    }

    /// Check if state represents presence
    pub fn is_present(&self) -> bool {
        self.ensure == Ensure::Present
    }
}

/// Result of applying a resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplyResult {
    /// No changes needed
    NoChange,
    /// Resource was created
    Created,
    /// Resource attributes were modified
    Modified,
    /// Resource was removed
    Removed,
    /// Apply failed
    Failed { error: String },
    /// Apply was skipped
    Skipped { reason: String },
}

impl ApplyResult {
    /// Check if the result represents success (no failure)
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }

    /// Check if the result represents a change
    pub fn is_change(&self) -> bool {
        matches!(self, Self::Created | Self::Modified | Self::Removed)
    }
}

/// Summary of execution results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecuteSummary {
    pub created: usize,
    pub modified: usize,
    pub removed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub no_change: usize,
}

impl ExecuteSummary {
    /// Total number of actual changes made
    pub fn total_changes(&self) -> usize {
        self.created + self.modified + self.removed
    }

    /// Check if execution was fully successful (no failures)
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Total number of resources processed
    pub fn total(&self) -> usize {
        self.created + self.modified + self.removed + self.skipped + self.failed + self.no_change
    }

    /// Add a result to the summary
    pub fn add_result(&mut self, result: &ApplyResult) {
        match result {
            ApplyResult::NoChange => self.no_change += 1,
            ApplyResult::Created => self.created += 1,
            ApplyResult::Modified => self.modified += 1,
            ApplyResult::Removed => self.removed += 1,
            ApplyResult::Failed { .. } => self.failed += 1,
            ApplyResult::Skipped { .. } => self.skipped += 1,
        }
    }
}
