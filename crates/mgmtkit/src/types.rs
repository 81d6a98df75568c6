//! Core types for management CLI operations.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;

/// Nested resource tree returned by a recursive `read-resource`.
///
/// Each node maps attribute names to values and child types to
/// `{child-name => node}` maps.
pub type ResourceTree = Value;

/// Attribute map of a single resource, in declaration order.
pub type Options = serde_json::Map<String, Value>;

/// Default management controller address.
pub const DEFAULT_CONTROLLER: &str = "localhost:9990";

/// A managed server connection.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Name the endpoint is referenced by (the `server` of a resource)
    pub name: String,
    /// Controller address (`host:port`)
    pub controller: String,
    /// Management user
    pub user: Option<String>,
    /// Management password
    pub password: Option<String>,
    /// Path to `jboss-cli.sh`
    pub cli: PathBuf,
    /// Per-command timeout in milliseconds, passed through to the CLI
    pub timeout_ms: Option<u64>,
}

impl Endpoint {
    /// Create an endpoint with no credentials.
    pub fn new(name: impl Into<String>, controller: impl Into<String>, cli: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            controller: controller.into(),
            user: None,
            password: None,
            cli: cli.into(),
            timeout_ms: None,
        }
    }

    /// Set the management credentials.
    pub fn with_credentials(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self.password = Some(password.into());
        self
    }

    /// Set the per-command timeout.
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("name", &self.name)
            .field("controller", &self.controller)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("cli", &self.cli)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

/// Parsed response of a management operation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Outcome {
    /// Whether `outcome` was `"success"`
    pub success: bool,
    /// The `failure-description` field, rendered as text
    pub failure_description: Option<String>,
    /// The `result` payload
    pub result: Option<Value>,
}

impl Outcome {
    /// A successful outcome carrying `result`.
    pub fn success(result: Option<Value>) -> Self {
        Self {
            success: true,
            failure_description: None,
            result,
        }
    }

    /// A failed outcome with the given description.
    pub fn failed(description: impl Into<String>) -> Self {
        Self {
            success: false,
            failure_description: Some(description.into()),
            result: None,
        }
    }

    /// Build an outcome from a management response object.
    ///
    /// A `failure-description` that is not a string (batch failures report
    /// an object keyed by step) is kept as compact JSON.
    pub fn from_response(response: &Value) -> Result<Self> {
        let outcome = response
            .get("outcome")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::ResponseParse {
                message: "response has no `outcome` field".to_string(),
            })?;

        let failure_description = response.get("failure-description").map(|d| match d {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        });

        Ok(Self {
            success: outcome == "success",
            failure_description,
            result: response.get("result").cloned(),
        })
    }

    /// The failure description, or an empty string.
    pub fn failure_text(&self) -> &str {
        self.failure_description.as_deref().unwrap_or_default()
    }
}
