//! Error types shared by the transport, the commands, and the shell.

use std::fmt::{self, Display, Formatter};
use std::io;

use reqwest::StatusCode;
use thiserror::Error;

/// Result alias for command execution.
pub type CommandResult<T> = Result<T, CommandError>;

/// Failure raised while a command performs its single request/response round trip.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The outbound request could not be built (malformed URL or body).
    #[error("failed to build request for '{url}': {reason}")]
    RequestConstruction {
        /// URL (or resolved URL text) the request was aimed at.
        url: String,
        /// Human-readable cause.
        reason: String,
    },
    /// The transport could not complete the exchange.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The response body could not be fully read.
    #[error("failed to read response body")]
    ResponseRead {
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// The response body did not match the expected shape.
    #[error("failed to decode {expected} from response body")]
    Decode {
        /// Description of the expected payload.
        expected: &'static str,
        /// Underlying serde error.
        #[source]
        source: serde_json::Error,
    },
    /// Writing to the output stream failed.
    #[error("failed to write command output")]
    Output {
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// `help` was asked about a command that is not registered.
    #[error("no help topic for \"{name}\"")]
    UnknownTopic {
        /// Requested topic.
        name: String,
    },
}

/// Failure raised by a [`crate::client::Transport`] implementation.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The HTTP client could not be configured.
    #[error("failed to set up HTTP client: {reason}")]
    Setup {
        /// What went wrong during setup.
        reason: &'static str,
        /// Underlying cause.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// The request never produced a response (connect, TLS, or transfer error).
    #[error("request to {url} failed")]
    Send {
        /// Target URL.
        url: String,
        /// Underlying cause.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// The server answered with a client or server error status.
    #[error("{message} (status {status})")]
    Status {
        /// Status returned by the server.
        status: StatusCode,
        /// Response body text, or the canonical reason when the body was empty.
        message: String,
    },
}

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub enum CliError {
    /// Invocation problem (unknown command, missing arguments).
    Validation(String),
    /// Command failed while talking to the server or rendering output.
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Build a validation error from a message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Wrap an operational failure.
    pub fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    /// Process exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    /// Message shown on the error stream, including the cause chain for failures.
    #[must_use]
    pub fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

impl From<CommandError> for CliError {
    fn from(error: CommandError) -> Self {
        match error {
            CommandError::UnknownTopic { .. } => Self::validation(error.to_string()),
            other => Self::failure(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_separate_validation_from_failure() {
        assert_eq!(CliError::validation("bad").exit_code(), 2);
        assert_eq!(CliError::failure(anyhow::anyhow!("boom")).exit_code(), 3);
    }

    #[test]
    fn failure_message_includes_cause_chain() {
        let err = CliError::from(CommandError::ResponseRead {
            source: io::Error::other("connection reset"),
        });
        assert_eq!(
            err.display_message(),
            "failed to read response body: connection reset"
        );
    }

    #[test]
    fn unknown_help_topic_is_a_validation_error() {
        let err = CliError::from(CommandError::UnknownTopic {
            name: "app-destroy".to_string(),
        });
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.display_message(), "no help topic for \"app-destroy\"");
    }

    #[test]
    fn status_error_mentions_status_code() {
        let err = TransportError::Status {
            status: StatusCode::NOT_FOUND,
            message: "App not found".to_string(),
        };
        assert_eq!(err.to_string(), "App not found (status 404 Not Found)");
    }
}
