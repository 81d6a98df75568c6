//! Error types for reconciliation.

use thiserror::Error;

/// Errors that can occur while resolving or applying a resource.
#[derive(Debug, Error)]
pub enum Error {
    /// Addressing or transport failure outside the retry loop
    #[error(transparent)]
    Cli(#[from] mgmtkit::Error),

    /// A resource names a server that is not configured
    #[error("unknown server '{server}' for resource '{resource}'")]
    UnknownServer {
        /// Server name as given
        server: String,
        /// Resource that referenced it
        resource: String,
    },

    /// The bulk read of an endpoint's root resource did not succeed
    #[error("could not read resource tree of '{server}': {message}")]
    Prefetch {
        /// Server name
        server: String,
        /// Failure description reported by the server
        message: String,
    },

    /// One attempt of a remove/add/update batch failed
    #[error("{message}")]
    AttemptFailure {
        /// Attempt-level message
        message: String,
    },

    /// The confirmation prompt could not be answered
    #[error("confirmation failed: {0}")]
    Confirm(#[from] std::io::Error),

    /// Every attempt failed; carries the last attempt's error
    #[error("{last}")]
    ExhaustedRetries {
        /// Number of attempts made
        attempts: u32,
        /// Error of the final attempt
        last: Box<Error>,
    },
}

impl Error {
    /// Create an attempt-level failure.
    pub fn attempt(message: impl Into<String>) -> Self {
        Error::AttemptFailure {
            message: message.into(),
        }
    }

    /// Whether the error was produced inside the retry loop.
    pub fn is_apply_failure(&self) -> bool {
        matches!(
            self,
            Error::AttemptFailure { .. } | Error::ExhaustedRetries { .. }
        )
    }
}

/// Result type for reconciliation.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exhausted_retries_shows_last_message() {
        let err = Error::ExhaustedRetries {
            attempts: 3,
            last: Box::new(Error::attempt("Error removing resource")),
        };
        assert_eq!(err.to_string(), "Error removing resource");
        assert!(err.is_apply_failure());
    }

    #[test]
    fn test_cli_errors_are_transparent() {
        let err: Error = mgmtkit::Error::malformed("a/b/c", "odd number of segments (3)").into();
        assert_eq!(
            err.to_string(),
            "malformed address 'a/b/c': odd number of segments (3)"
        );
        assert!(!err.is_apply_failure());
    }
}
