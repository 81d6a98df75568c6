//! Real management CLI backend using `jboss-cli.sh`.

use crate::backend::Transport;
use crate::dmr;
use crate::error::{Error, Result};
use crate::format::Command;
use crate::types::{Endpoint, Outcome};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command as Process;

/// Name of the CLI launcher inside `$JBOSS_HOME/bin`.
#[cfg(windows)]
pub const CLI_LAUNCHER: &str = "jboss-cli.bat";
/// Name of the CLI launcher inside `$JBOSS_HOME/bin`.
#[cfg(not(windows))]
pub const CLI_LAUNCHER: &str = "jboss-cli.sh";

/// Path of the CLI launcher for an installation directory.
pub fn cli_from_home(home: &Path) -> PathBuf {
    home.join("bin").join(CLI_LAUNCHER)
}

/// Transport that runs the management CLI as a child process.
///
/// Commands are written to a script file and passed with `--file`, one
/// process per call. Responses are requested as JSON.
#[derive(Debug, Clone, Default)]
pub struct JbossCliBackend;

impl JbossCliBackend {
    /// Create a new backend.
    pub fn new() -> Self {
        Self
    }

    /// Render the script for a call.
    ///
    /// Batches end in `run-batch --verbose` so the CLI prints the composite
    /// response instead of a plain success line.
    fn script(commands: &[Command], atomic: bool) -> String {
        let batch = atomic && commands.len() > 1;
        let mut lines = Vec::with_capacity(commands.len() + 2);
        if batch {
            lines.push("batch".to_string());
        }
        lines.extend(commands.iter().map(Command::to_cli));
        if batch {
            lines.push("run-batch --verbose".to_string());
        }
        lines.join("\n") + "\n"
    }

    /// Arguments for a call, credentials included.
    fn args(endpoint: &Endpoint, script: &Path) -> Vec<String> {
        let mut args = vec![
            "--connect".to_string(),
            format!("--controller={}", endpoint.controller),
        ];
        if let Some(user) = &endpoint.user {
            args.push(format!("--user={user}"));
        }
        if let Some(password) = &endpoint.password {
            args.push(format!("--password={password}"));
        }
        if let Some(timeout) = endpoint.timeout_ms {
            args.push(format!("--timeout={timeout}"));
        }
        args.push("--output-json".to_string());
        args.push(format!("--file={}", script.display()));
        args
    }
}

impl Transport for JbossCliBackend {
    fn execute(&self, endpoint: &Endpoint, commands: &[Command], atomic: bool) -> Result<Outcome> {
        if commands.is_empty() {
            return Err(Error::Other("no commands to execute".to_string()));
        }
        if !endpoint.cli.exists() {
            return Err(Error::CliNotFound(endpoint.cli.clone()));
        }

        let script = Self::script(commands, atomic);
        for line in script.lines() {
            log::debug!("[{}] {}", endpoint.name, line);
        }

        let mut file = tempfile::Builder::new()
            .prefix("jconverge-")
            .suffix(".cli")
            .tempfile()?;
        file.write_all(script.as_bytes())?;
        file.flush()?;

        let output = Process::new(&endpoint.cli)
            .args(Self::args(endpoint, file.path()))
            .output()
            .map_err(|e| Error::CommandFailed {
                message: format!("failed to execute {}: {}", endpoint.cli.display(), e),
                stderr: String::new(),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        log::trace!("[{}] stdout: {}", endpoint.name, stdout.trim());
        if !stderr.trim().is_empty() {
            log::trace!("[{}] stderr: {}", endpoint.name, stderr.trim());
        }

        match dmr::parse_response(&stdout) {
            Ok(response) => Outcome::from_response(&response),
            Err(_) if !output.status.success() => Err(Error::from_cli_output(
                &format!("{stderr}\n{stdout}"),
                &endpoint.controller,
            )),
            Err(e) => Err(e),
        }
    }
}
