//! Centralized path resolution for jconverge
//!
//! # Environment Variables
//!
//! - `JCONVERGE_MANIFEST` - Override the manifest file
//! - `JCONVERGE_CONFIG_DIR` - Override the config directory
//! - `JBOSS_HOME` - Server installation used to locate `bin/jboss-cli.sh`
//!
//! # Path Resolution Priority
//!
//! For manifest_path():
//! 1. `--manifest` flag
//! 2. `JCONVERGE_MANIFEST` environment variable
//! 3. `<config_dir>/manifest.toml`
//!
//! For config_dir():
//! 1. `JCONVERGE_CONFIG_DIR` environment variable
//! 2. `XDG_CONFIG_HOME/jconverge` (if set)
//! 3. Platform default:
//!    - Windows: `%APPDATA%\jconverge`
//!    - macOS/Linux: `~/.config/jconverge`

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Environment variable for manifest override
pub const ENV_MANIFEST: &str = "JCONVERGE_MANIFEST";

/// Environment variable for config directory override
pub const ENV_CONFIG_DIR: &str = "JCONVERGE_CONFIG_DIR";

/// Environment variable naming the server installation
pub const ENV_JBOSS_HOME: &str = "JBOSS_HOME";

/// Manifest file name inside the config directory
pub const MANIFEST_FILE: &str = "manifest.toml";

/// Get the jconverge config directory path
pub fn config_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = expand(&dir);
        log::debug!(
            "Using config dir from {}: {}",
            ENV_CONFIG_DIR,
            path.display()
        );
        return Ok(path);
    }

    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        let path = PathBuf::from(xdg_config).join("jconverge");
        log::debug!("Using XDG_CONFIG_HOME: {}", path.display());
        return Ok(path);
    }

    #[cfg(windows)]
    {
        if let Some(app_data) = dirs::config_dir() {
            let path = app_data.join("jconverge");
            log::debug!("Using Windows config dir: {}", path.display());
            return Ok(path);
        }
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    let path = home.join(".config").join("jconverge");
    log::debug!("Using default config dir: {}", path.display());
    Ok(path)
}

/// Get the manifest path
///
/// An explicit path wins over `JCONVERGE_MANIFEST`, which wins over the
/// config directory default.
pub fn manifest_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    if let Ok(file) = std::env::var(ENV_MANIFEST) {
        let path = expand(&file);
        log::debug!("Using manifest from {}: {}", ENV_MANIFEST, path.display());
        return Ok(path);
    }

    Ok(config_dir()?.join(MANIFEST_FILE))
}

/// Get the server installation named by `JBOSS_HOME`, if any
pub fn jboss_home() -> Option<PathBuf> {
    std::env::var(ENV_JBOSS_HOME)
        .ok()
        .filter(|home| !home.trim().is_empty())
        .map(|home| expand(&home))
}

/// Expand ~ and environment variables in a path string.
///
/// # Examples
///
/// ```ignore
/// // Expands ~ to home directory
/// let cli = paths::expand("~/wildfly/bin/jboss-cli.sh");
///
/// // Expands environment variables
/// let cli = paths::expand("$JBOSS_HOME/bin/jboss-cli.sh");
/// ```
pub fn expand(path: &str) -> PathBuf {
    let expanded = shellexpand::full(path).unwrap_or(std::borrow::Cow::Borrowed(path));
    PathBuf::from(expanded.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    /// Helper to run a test with temporary env var
    ///
    /// # Safety
    /// This function uses unsafe env::set_var/remove_var which can cause issues
    /// if other threads read environment variables concurrently.
    /// Only use in single-threaded test contexts.
    fn with_env_var<F, R>(key: &str, value: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let original = env::var(key).ok();
        // SAFETY: Tests run in isolation and don't read env vars concurrently
        unsafe { env::set_var(key, value) };
        let result = f();
        match original {
            // SAFETY: Tests run in isolation
            Some(v) => unsafe { env::set_var(key, v) },
            None => unsafe { env::remove_var(key) },
        }
        result
    }

    #[test]
    fn test_explicit_manifest_wins() {
        let path = manifest_path(Some(Path::new("/explicit.toml"))).unwrap();
        assert_eq!(path, PathBuf::from("/explicit.toml"));
    }

    #[test]
    fn test_manifest_env_override() {
        with_env_var(ENV_MANIFEST, "/srv/jconverge/prod.toml", || {
            let path = manifest_path(None).unwrap();
            assert_eq!(path, PathBuf::from("/srv/jconverge/prod.toml"));
        });
    }

    #[test]
    fn test_config_dir_env_override() {
        with_env_var(ENV_CONFIG_DIR, "/custom/config/path", || {
            let result = config_dir().unwrap();
            assert_eq!(result, PathBuf::from("/custom/config/path"));
        });
    }

    #[test]
    fn test_expand_tilde() {
        let home = dirs::home_dir().unwrap();
        assert_eq!(
            expand("~/wildfly/bin/jboss-cli.sh"),
            home.join("wildfly/bin/jboss-cli.sh")
        );
    }

    #[test]
    fn test_expand_plain_path_unchanged() {
        assert_eq!(
            expand("/opt/wildfly/bin/jboss-cli.sh"),
            PathBuf::from("/opt/wildfly/bin/jboss-cli.sh")
        );
    }
}
