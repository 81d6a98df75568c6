//! # mgmtkit
//!
//! Pure Rust library for the JBoss/WildFly management CLI.
//!
//! This crate provides functionality for:
//! - Parsing resource addresses and locating them in a recursive dump
//! - Building management operations and rendering them as CLI lines
//! - Running operations through `jboss-cli.sh` and reading the response
//!
//! ## Example
//!
//! ```no_run
//! use mgmtkit::backend::{Transport, default_transport};
//! use mgmtkit::{Command, Endpoint, ResourceAddress};
//!
//! let endpoint = Endpoint::new("default", "localhost:9990", "/opt/wildfly/bin/jboss-cli.sh");
//! let transport = default_transport();
//!
//! // Dump the whole server once
//! let dump = transport
//!     .execute_one(&endpoint, &Command::read_resource_recursive(ResourceAddress::root()))
//!     .expect("read failed");
//!
//! // Find a data source in the dump
//! let address = ResourceAddress::parse("subsystem/datasources/data-source/ExampleDS").unwrap();
//! let node = dump.result.as_ref().and_then(|tree| address.locate(tree));
//! println!("ExampleDS present: {}", node.is_some());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod address;
pub mod backend;
pub mod dmr;
pub mod error;
pub mod format;
pub mod types;

pub use address::{ResourceAddress, Segment};
pub use error::{Error, ErrorCategory, Result};
pub use format::{Command, format_command, render_value};
pub use types::{DEFAULT_CONTROLLER, Endpoint, Options, Outcome, ResourceTree};
