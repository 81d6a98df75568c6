//! Staged changes for a single resource
//!
//! A [`PendingChange`] collects what the reconciler asked for during one
//! pass; [`PendingChange::into_change`] turns it into exactly one
//! [`Change`] that the flush consumes.

use crate::diff::diff;
use crate::types::{CurrentState, DesiredResource, Ensure};
use mgmtkit::Options;
use std::fmt;

/// The single kind of change applied to a resource
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    /// `add` the resource with its desired options
    Create,
    /// `remove` the resource
    Destroy,
    /// Write/undefine attributes towards these desired options
    UpdateAttributes(Options),
    /// Nothing to do
    NoOp,
}

impl Change {
    /// Check if this change touches the endpoint
    pub fn is_change(&self) -> bool {
        !matches!(self, Self::NoOp)
    }

    /// Plan symbol, as shown by `plan`
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Create => "+",
            Self::Destroy => "-",
            Self::UpdateAttributes(_) => "~",
            Self::NoOp => "=",
        }
    }
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::Destroy => write!(f, "destroy"),
            Self::UpdateAttributes(_) => write!(f, "update"),
            Self::NoOp => write!(f, "no-op"),
        }
    }
}

/// Mutations requested for a resource before they are committed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PendingChange {
    create: bool,
    destroy: bool,
    options: Option<Options>,
}

impl PendingChange {
    /// Start with nothing staged
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage creation
    pub fn mark_create(&mut self) {
        self.create = true;
    }

    /// Stage removal
    pub fn mark_destroy(&mut self) {
        self.destroy = true;
    }

    /// Stage an attribute update towards `options`
    pub fn mark_update(&mut self, options: Options) {
        self.options = Some(options);
    }

    /// Whether anything is staged
    pub fn is_empty(&self) -> bool {
        !self.create && !self.destroy && self.options.is_none()
    }

    /// Resolve to one change; create wins over destroy, destroy over update.
    pub fn into_change(self) -> Change {
        if self.create {
            Change::Create
        } else if self.destroy {
            Change::Destroy
        } else if let Some(options) = self.options {
            Change::UpdateAttributes(options)
        } else {
            Change::NoOp
        }
    }
}

/// Stage what `desired` needs given `current`.
///
/// An existing resource is only staged for update when the attribute diff
/// is non-empty.
pub fn stage(desired: &DesiredResource, current: &CurrentState) -> PendingChange {
    let mut pending = PendingChange::new();

    match (desired.ensure, current.ensure) {
        (Ensure::Present, Ensure::Absent) => pending.mark_create(),
        (Ensure::Absent, Ensure::Present) => pending.mark_destroy(),
        (Ensure::Present, Ensure::Present) => {
            if !diff(&current.options, &desired.options).is_empty() {
                pending.mark_update(desired.options.clone());
            }
        }
        (Ensure::Absent, Ensure::Absent) => {}
    }

    pending
}
