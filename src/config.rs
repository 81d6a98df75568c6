//! Manifest loading and validation
//!
//! A manifest is a TOML file with `[servers.NAME]` tables and a
//! `[[resources]]` array. A manifest without servers gets a single
//! `default` server on the local controller.

use anyhow::{Context, Result, bail};
use declarative::{DEFAULT_SERVER, DesiredResource, Endpoints};
use mgmtkit::backend::jboss_cli::cli_from_home;
use mgmtkit::{DEFAULT_CONTROLLER, Endpoint, ResourceAddress};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::paths;

/// Connection settings for one server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// `host:port` of the management interface
    #[serde(default = "default_controller")]
    pub controller: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// Path to `jboss-cli.sh`; `~` and `$VARS` are expanded
    #[serde(default)]
    pub cli: Option<String>,
    /// CLI timeout in milliseconds
    #[serde(default)]
    pub timeout: Option<u64>,
}

fn default_controller() -> String {
    DEFAULT_CONTROLLER.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            controller: default_controller(),
            user: None,
            password: None,
            cli: None,
            timeout: None,
        }
    }
}

impl ServerConfig {
    /// Path of the CLI executable
    ///
    /// Falls back to `<jboss_home>/bin/jboss-cli.sh` when no `cli` is set.
    pub fn cli_path(&self, jboss_home: Option<&Path>) -> Option<PathBuf> {
        match (&self.cli, jboss_home) {
            (Some(cli), _) => Some(paths::expand(cli)),
            (None, Some(home)) => Some(cli_from_home(home)),
            (None, None) => None,
        }
    }

    /// Build the endpoint for server `name`
    pub fn to_endpoint(&self, name: &str, jboss_home: Option<&Path>) -> Result<Endpoint> {
        let Some(cli) = self.cli_path(jboss_home) else {
            bail!(
                "No CLI for server '{name}': set `cli` in the manifest or {}",
                paths::ENV_JBOSS_HOME
            );
        };

        let mut endpoint = Endpoint::new(name, &self.controller, cli);
        if let Some(user) = &self.user {
            endpoint = endpoint.with_credentials(user, self.password.as_deref().unwrap_or_default());
        }
        if let Some(timeout) = self.timeout {
            endpoint = endpoint.with_timeout_ms(timeout);
        }
        Ok(endpoint)
    }
}

/// Servers and the resources declared for them
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub servers: BTreeMap<String, ServerConfig>,
    #[serde(default)]
    pub resources: Vec<DesiredResource>,
}

impl Manifest {
    /// Load a manifest file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("Invalid manifest {}", path.display()))
    }

    /// Parse a manifest from TOML
    pub fn from_toml(content: &str) -> Result<Self> {
        let mut manifest: Self = toml::from_str(content)?;
        if manifest.servers.is_empty() {
            manifest
                .servers
                .insert(DEFAULT_SERVER.to_string(), ServerConfig::default());
        }
        Ok(manifest)
    }

    /// Collect every problem in the manifest
    ///
    /// An empty list means the manifest is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let mut seen = HashSet::new();

        for resource in &self.resources {
            let name = &resource.name;

            if name.trim().is_empty() {
                problems.push(format!("resource at '{}' has an empty name", resource.address));
            } else if !seen.insert(name.as_str()) {
                problems.push(format!("duplicate resource name '{name}'"));
            }

            if let Err(e) = ResourceAddress::parse(&resource.address) {
                problems.push(format!("resource '{name}': {e}"));
            }

            if !resource.noop && !self.servers.contains_key(&resource.server) {
                problems.push(format!(
                    "resource '{name}' references unknown server '{}'",
                    resource.server
                ));
            }

            if resource.tries < 1 {
                problems.push(format!("resource '{name}': tries must be at least 1"));
            }

            if !resource.try_sleep.is_finite() || resource.try_sleep < 0.0 {
                problems.push(format!(
                    "resource '{name}': try_sleep must be a non-negative number of seconds"
                ));
            }
        }

        for (name, server) in &self.servers {
            if server.controller.trim().is_empty() {
                problems.push(format!("server '{name}' has an empty controller"));
            }
            if server.password.is_some() && server.user.is_none() {
                problems.push(format!("server '{name}' sets a password without a user"));
            }
        }

        problems
    }

    /// Build endpoints for every server
    pub fn endpoints(&self, jboss_home: Option<&Path>) -> Result<Endpoints> {
        self.servers
            .iter()
            .map(|(name, server)| -> Result<(String, Endpoint)> {
                Ok((name.clone(), server.to_endpoint(name, jboss_home)?))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use declarative::Ensure;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MANIFEST: &str = r#"
[servers.default]
controller = "10.0.0.5:9990"
user = "admin"
password = "secret"
cli = "/opt/wildfly/bin/jboss-cli.sh"
timeout = 30000

[[resources]]
name = "ExampleDS"
address = "subsystem/datasources/data-source/ExampleDS"
tries = 3
try_sleep = 2

[resources.options]
jndi-name = "java:jboss/datasources/ExampleDS"
pool-size = 10
check-valid-connection-sql = "undefined"

[[resources]]
name = "old-mail"
address = "subsystem/mail/mail-session/legacy"
ensure = "absent"
"#;

    #[test]
    fn test_load_manifest() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(MANIFEST.as_bytes()).unwrap();

        let manifest = Manifest::load(file.path()).unwrap();
        assert!(manifest.validate().is_empty());
        assert_eq!(manifest.resources.len(), 2);

        let ds = &manifest.resources[0];
        assert_eq!(ds.tries, 3);
        assert!((ds.try_sleep - 2.0).abs() < f64::EPSILON);
        let keys: Vec<&str> = ds.options.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["jndi-name", "pool-size", "check-valid-connection-sql"]
        );
        assert_eq!(manifest.resources[1].ensure, Ensure::Absent);
    }

    #[test]
    fn test_endpoints_from_servers() {
        let manifest = Manifest::from_toml(MANIFEST).unwrap();
        let endpoints = manifest.endpoints(None).unwrap();
        let endpoint = &endpoints["default"];
        assert_eq!(endpoint.controller, "10.0.0.5:9990");
        assert_eq!(endpoint.user.as_deref(), Some("admin"));
        assert_eq!(endpoint.timeout_ms, Some(30000));
        assert_eq!(endpoint.cli, PathBuf::from("/opt/wildfly/bin/jboss-cli.sh"));
    }

    #[test]
    fn test_implicit_default_server_uses_jboss_home() {
        let manifest = Manifest::from_toml(
            r#"
[[resources]]
name = "mail"
address = "subsystem/mail"
"#,
        )
        .unwrap();
        assert!(manifest.validate().is_empty());

        let endpoints = manifest.endpoints(Some(Path::new("/opt/wildfly"))).unwrap();
        assert_eq!(endpoints["default"].controller, DEFAULT_CONTROLLER);
        assert!(endpoints["default"].cli.starts_with("/opt/wildfly/bin"));
    }

    #[test]
    fn test_missing_cli_is_an_error() {
        let manifest = Manifest::from_toml("").unwrap();
        let err = manifest.endpoints(None).unwrap_err();
        assert!(err.to_string().contains("JBOSS_HOME"));
    }

    #[test]
    fn test_validate_reports_every_problem() {
        let manifest = Manifest::from_toml(
            r#"
[[resources]]
name = "ds"
address = "subsystem/datasources/data-source"
tries = 0

[[resources]]
name = "ds"
address = "subsystem/mail"
server = "standby"
try_sleep = -1
"#,
        )
        .unwrap();

        let problems = manifest.validate();
        assert_eq!(problems.len(), 5, "{problems:#?}");
        assert!(problems.iter().any(|p| p.contains("duplicate resource name 'ds'")));
        assert!(problems.iter().any(|p| p.contains("malformed address")));
        assert!(problems.iter().any(|p| p.contains("unknown server 'standby'")));
        assert!(problems.iter().any(|p| p.contains("tries must be at least 1")));
        assert!(problems.iter().any(|p| p.contains("try_sleep")));
    }

    #[test]
    fn test_noop_resource_may_name_unknown_server() {
        let manifest = Manifest::from_toml(
            r#"
[[resources]]
name = "parked"
address = "subsystem/mail"
server = "decommissioned"
noop = true
"#,
        )
        .unwrap();
        assert!(manifest.validate().is_empty());
    }

    #[test]
    fn test_invalid_ensure_is_rejected() {
        let result = Manifest::from_toml(
            r#"
[[resources]]
name = "ds"
address = "subsystem/mail"
ensure = "running"
"#,
        );
        assert!(result.is_err());
    }
}
