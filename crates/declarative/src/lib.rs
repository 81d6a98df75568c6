//! # Declarative
//!
//! Declarative reconciliation of JBoss/WildFly management resources.
//!
//! This crate compares a declared resource (address, attributes, `ensure`)
//! with what an endpoint reports and applies the smallest set of management
//! operations that converges the two.
//!
//! ## Core Concepts
//!
//! - **DesiredResource**: A declared resource and its retry policy
//! - **PrefetchCache**: One recursive read per endpoint per pass
//! - **Change**: The single create, destroy or attribute update a resource needs
//! - **Plan**: Resources of a pass, resolved and classified
//! - **Executor**: Applies the plan with bounded retries
//!
//! ## Example
//!
//! ```no_run
//! use declarative::{
//!     AutoConfirm, DesiredResource, Endpoints, NoProgress, ThreadSleeper, run_pass,
//! };
//! use mgmtkit::Endpoint;
//! use mgmtkit::backend::default_transport;
//!
//! let mut endpoints = Endpoints::new();
//! endpoints.insert(
//!     "default".into(),
//!     Endpoint::new("default", "localhost:9990", "/opt/wildfly/bin/jboss-cli.sh"),
//! );
//!
//! let resources = vec![
//!     DesiredResource::new("ExampleDS", "subsystem/datasources/data-source/ExampleDS")
//!         .with_option("jndi-name", "java:jboss/datasources/ExampleDS")
//!         .with_option("pool-size", 10)
//!         .with_retries(3, 2.0),
//! ];
//!
//! let summary = run_pass(
//!     &resources,
//!     &endpoints,
//!     &default_transport(),
//!     &ThreadSleeper,
//!     &mut NoProgress,
//!     &mut AutoConfirm,
//! )?;
//! println!("{} change(s)", summary.total_changes());
//! # Ok::<(), declarative::Error>(())
//! ```
//!
//! ## Provider Traits
//!
//! The crate uses traits for dependency injection:
//!
//! - [`mgmtkit::backend::Transport`]: Executes management operations
//! - [`Sleeper`]: Pauses between retry attempts
//! - [`ProgressCallback`]: Receives progress updates
//! - [`ConfirmCallback`]: Handles user confirmations
//!
//! This allows the crate to be tested without a running server.

pub mod change;
pub mod context;
pub mod diff;
pub mod error;
pub mod executor;
pub mod planner;
pub mod prefetch;
pub mod provider;
pub mod retry;
pub mod types;

// Re-export main types at crate root
pub use change::{Change, PendingChange, stage};
pub use context::{AutoConfirm, AutoDecline, ConfirmCallback, NoProgress, ProgressCallback};
pub use diff::{AttributeOp, UNDEFINED, diff};
pub use error::{Error, Result};
pub use executor::{execute, run_pass};
pub use planner::{Plan, PlannedResource, filter_resources};
pub use prefetch::{PrefetchCache, resolve};
pub use provider::Provider;
pub use retry::{RetryPolicy, Sleeper, ThreadSleeper, with_retry};
pub use types::{
    ApplyResult, CurrentState, DEFAULT_SERVER, DesiredResource, Endpoints, Ensure, ExecuteSummary,
};
