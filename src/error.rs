//! Client error types
//!
//! Every failure carries an [`ErrorKind`] tag. The interceptor classifies
//! failures by tag when it looks up a fallback.

use std::fmt;
use thiserror::Error;

/// Result alias used throughout the client
pub type Result<T> = std::result::Result<T, ClientError>;

/// Failure category used as the fallback registry key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Raised by the transport-level connect/disconnect actions
    Transport,
    /// An operation required a connected client
    NotConnected,
    /// A query did not satisfy the request constraints
    InvalidQuery,
    /// The backend rejected or failed an operation
    Backend,
    /// A fallback escalated a failure past the interceptor
    Escalated,
    /// Invalid configuration value
    Config,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Transport => "transport",
            Self::NotConnected => "not_connected",
            Self::InvalidQuery => "invalid_query",
            Self::Backend => "backend",
            Self::Escalated => "escalated",
            Self::Config => "config",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors produced by the client and its backends
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Transport action failed
    #[error("{operation} failed: {message}")]
    Transport {
        /// The transport action that failed
        operation: String,
        /// Failure description
        message: String,
    },

    /// Client is not connected
    #[error("Not connected")]
    NotConnected,

    /// Query shorter than the accepted minimum
    #[error("Query too short: {len} characters (min: {min})")]
    InvalidQuery {
        /// Actual query length in characters
        len: usize,
        /// Minimum accepted length
        min: usize,
    },

    /// Backend-side failure
    #[error("Backend error: {message}")]
    Backend {
        /// Failure description
        message: String,
    },

    /// Failure re-raised by a fallback
    #[error("Escalated {kind} failure: {message}")]
    Escalated {
        /// Category of the original failure
        kind: ErrorKind,
        /// Escalation message
        message: String,
    },

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Create a transport error
    pub fn transport(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create a backend error
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }

    /// Create an escalation error, for use inside fallbacks
    pub fn escalated(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::Escalated {
            kind,
            message: message.into(),
        }
    }

    /// Classify the failure
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport { .. } => ErrorKind::Transport,
            Self::NotConnected => ErrorKind::NotConnected,
            Self::InvalidQuery { .. } => ErrorKind::InvalidQuery,
            Self::Backend { .. } => ErrorKind::Backend,
            Self::Escalated { .. } => ErrorKind::Escalated,
            Self::Config(_) => ErrorKind::Config,
        }
    }
}
