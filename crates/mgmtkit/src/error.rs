//! Error types for management CLI operations.
//!
//! Errors are categorized so callers can tell a controller that is not
//! reachable apart from a request the controller rejected, and give the
//! user an actionable hint.

use std::path::PathBuf;
use thiserror::Error;

/// Categories of management CLI errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Controller unreachable, connection refused or timed out
    Connection,
    /// Credentials rejected by the controller
    Authentication,
    /// The `jboss-cli.sh` executable could not be found
    CliNotFound,
    /// A resource address could not be parsed
    Address,
    /// The CLI produced output that is not a management response
    Response,
    /// Other/unknown errors
    Other,
}

impl ErrorCategory {
    /// Whether this error category is typically transient.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Connection)
    }

    /// Get a user-friendly description of this error category.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Connection => "Controller not reachable",
            Self::Authentication => "Authentication failed",
            Self::CliNotFound => "Management CLI not found",
            Self::Address => "Malformed resource address",
            Self::Response => "Unreadable management response",
            Self::Other => "Unexpected error",
        }
    }

    /// Get actionable advice for resolving this error category.
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Connection => "Check that the server is running and the controller address is correct",
            Self::Authentication => "Check the user and password configured for this server",
            Self::CliNotFound => "Set `cli` for the server or point JBOSS_HOME at the installation",
            Self::Address => "Use `type/name/type/name` or `/type=name/type=name` addresses",
            Self::Response => "Run with -vv to see the raw CLI output",
            Self::Other => "Check the error details for more information",
        }
    }
}

/// Errors that can occur while talking to a management endpoint.
#[derive(Debug, Error)]
pub enum Error {
    /// Resource address could not be parsed
    #[error("malformed address '{address}': {reason}")]
    MalformedAddress {
        /// The raw address as given
        address: String,
        /// Why it was rejected
        reason: String,
    },

    /// CLI executable not found
    #[error("management CLI not found: {}", .0.display())]
    CliNotFound(PathBuf),

    /// Could not connect to the controller
    #[error("cannot connect to {controller}: {message}")]
    Connection {
        /// Controller address (`host:port`)
        controller: String,
        /// Detail reported by the CLI
        message: String,
    },

    /// The controller rejected the credentials
    #[error("authentication failed for {controller}")]
    Authentication {
        /// Controller address (`host:port`)
        controller: String,
    },

    /// CLI process exited unsuccessfully without a usable response
    #[error("command failed: {message}")]
    CommandFailed {
        /// Description of what failed
        message: String,
        /// Standard error output from the CLI
        stderr: String,
    },

    /// CLI output did not contain a management response
    #[error("unreadable CLI response: {message}")]
    ResponseParse {
        /// What was wrong with the response
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a malformed address error.
    pub fn malformed(address: &str, reason: impl Into<String>) -> Self {
        Error::MalformedAddress {
            address: address.to_string(),
            reason: reason.into(),
        }
    }

    /// Get the error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Connection { .. } => ErrorCategory::Connection,
            Error::Authentication { .. } => ErrorCategory::Authentication,
            Error::CliNotFound(_) => ErrorCategory::CliNotFound,
            Error::MalformedAddress { .. } => ErrorCategory::Address,
            Error::ResponseParse { .. } | Error::Json(_) => ErrorCategory::Response,
            _ => ErrorCategory::Other,
        }
    }

    /// Whether this error is typically transient.
    pub fn is_transient(&self) -> bool {
        self.category().is_transient()
    }

    /// Create an error from CLI output that carried no management response.
    ///
    /// Analyzes the output to categorize the error appropriately.
    pub fn from_cli_output(output: &str, controller: &str) -> Self {
        let lower = output.to_lowercase();

        if lower.contains("failed to connect")
            || lower.contains("connection refused")
            || lower.contains("timed out")
            || lower.contains("timeout")
            || lower.contains("no route to host")
            || lower.contains("unknownhost")
            || lower.contains("the controller is not available")
        {
            return Error::Connection {
                controller: controller.to_string(),
                message: first_line(output),
            };
        }

        if lower.contains("authentication failed")
            || lower.contains("unable to authenticate")
            || lower.contains("unauthorized")
        {
            return Error::Authentication {
                controller: controller.to_string(),
            };
        }

        let detail = first_line(output);
        let message = if detail.is_empty() {
            format!("jboss-cli failed against {controller}")
        } else {
            format!("jboss-cli failed against {controller}: {detail}")
        };
        Error::CommandFailed {
            message,
            stderr: output.trim().to_string(),
        }
    }
}

fn first_line(output: &str) -> String {
    output
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// Result type for management CLI operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_category_transient() {
        assert!(ErrorCategory::Connection.is_transient());
        assert!(!ErrorCategory::Authentication.is_transient());
        assert!(!ErrorCategory::Address.is_transient());
    }

    #[test]
    fn test_from_cli_output_connection() {
        let err = Error::from_cli_output(
            "Failed to connect to the controller: The controller is not available at localhost:9990",
            "localhost:9990",
        );
        assert_eq!(err.category(), ErrorCategory::Connection);
        assert!(err.is_transient());
        assert!(err.to_string().contains("localhost:9990"));
    }

    #[test]
    fn test_from_cli_output_authentication() {
        let err = Error::from_cli_output("Unable to authenticate against controller", "h:9990");
        assert_eq!(err.category(), ErrorCategory::Authentication);
    }

    #[test]
    fn test_from_cli_output_fallback() {
        let err = Error::from_cli_output("  something odd\n", "h:9990");
        match err {
            Error::CommandFailed { message, stderr } => {
                assert_eq!(stderr, "something odd");
                assert_eq!(message, "jboss-cli failed against h:9990: something odd");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_from_cli_output_keeps_batch_failure_text() {
        let output = "The batch failed with the following error (you are remaining in the batch editing mode to have a chance to correct the error): WFLYCTL0062: Composite operation failed";
        let err = Error::from_cli_output(output, "h:9990");
        assert!(err.to_string().ends_with(output));
    }

    #[test]
    fn test_malformed_message() {
        let err = Error::malformed("a/b/c", "odd number of segments");
        assert_eq!(
            err.to_string(),
            "malformed address 'a/b/c': odd number of segments"
        );
        assert_eq!(err.category(), ErrorCategory::Address);
    }
}
