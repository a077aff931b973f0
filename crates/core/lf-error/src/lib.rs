//! Error types and classification for loadflow.
//!
//! This crate provides:
//! - [`LfError`] - Top-level error enum for everything an iteration can fail with
//! - Domain-specific errors ([`ConfigError`], [`RemoteError`], [`TransportError`])
//! - [`ErrorKind`] for outcome codes and statistics
//!
//! No category here is retryable: a failed iteration is reported as a failed
//! sample and the next iteration starts from scratch.

use thiserror::Error;

/// Top-level error type for loadflow.
#[derive(Error, Debug)]
pub enum LfError {
    /// Missing or invalid parameter, missing local file
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The remote service answered with an error
    #[error("Remote service error: {0}")]
    Remote(#[from] RemoteError),

    /// Local I/O failure while moving object bytes
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Generic errors (wrapped anyhow)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LfError {
    /// The response code recorded on a failed sample.
    ///
    /// Remote errors keep the service's own code verbatim; everything else
    /// is reported under its [`ErrorKind`] code.
    pub fn response_code(&self) -> String {
        match self {
            Self::Remote(e) => e.code.clone(),
            other => classify_error(other).code().to_string(),
        }
    }

    /// The human-readable message recorded on a failed sample.
    pub fn response_message(&self) -> String {
        match self {
            Self::Config(e) => e.to_string(),
            Self::Remote(e) => e.message.clone(),
            Self::Transport(e) => e.to_string(),
            Self::Other(e) => e.to_string(),
        }
    }
}

/// Configuration errors.
///
/// Raised while converting string parameters into typed settings, or when a
/// local resource named by a parameter is unusable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required parameter is absent or empty
    #[error("Missing required parameter: {0}")]
    Missing(String),

    /// A numeric parameter did not parse
    #[error("Parameter '{name}' must be an integer, got '{value}'")]
    InvalidInteger { name: String, value: String },

    /// A numeric parameter parsed but is outside its allowed range
    #[error("Parameter '{name}' must be in {min}..={max}, got {value}")]
    OutOfRange {
        name: String,
        value: i64,
        min: i64,
        max: i64,
    },

    /// A parameter has an unusable value
    #[error("Invalid value for '{name}': {reason}")]
    InvalidValue { name: String, reason: String },

    /// Identity fields are missing or inconsistent
    #[error("Invalid credentials: {0}")]
    Credentials(String),

    /// The configured local path is missing or not a regular file
    #[error("The file does not exist or is not a file: {0}")]
    LocalFile(String),

    /// Unknown operation kind
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),
}

/// An error reported by the remote service.
///
/// Code and message are kept exactly as the service returned them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{code}: {message}")]
pub struct RemoteError {
    /// Service error code (e.g. `AWS.SimpleQueueService.NonExistentQueue`)
    pub code: String,

    /// Service error message
    pub message: String,
}

impl RemoteError {
    /// Create a new remote error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Transport errors while streaming object bytes to local storage.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// I/O error reading the body or writing the destination
    #[error("I/O error: {0}")]
    Io(String),

    /// The body ended before the declared content length
    #[error("Stream ended after {actual} of {expected} bytes")]
    ShortRead { expected: u64, actual: u64 },
}

impl From<std::io::Error> for TransportError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

/// Error classification used for response codes and failure statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Fatal to the iteration, caused by the supplied configuration
    Configuration,

    /// The remote service rejected the call
    RemoteService,

    /// Local I/O failed while transferring bytes
    Transport,

    /// Anything else
    Internal,
}

impl ErrorKind {
    /// Synthetic response code for this kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Configuration => "ConfigurationError",
            Self::RemoteService => "RemoteServiceError",
            Self::Transport => "TransportError",
            Self::Internal => "InternalError",
        }
    }

    /// Recover the kind from a recorded response code.
    ///
    /// Any code that is not one of the synthetic local codes came from the
    /// remote service.
    pub fn from_response_code(code: &str) -> Self {
        match code {
            "ConfigurationError" => Self::Configuration,
            "TransportError" => Self::Transport,
            "InternalError" => Self::Internal,
            _ => Self::RemoteService,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Classifies an error into its [`ErrorKind`].
pub fn classify_error(error: &LfError) -> ErrorKind {
    match error {
        LfError::Config(_) => ErrorKind::Configuration,
        LfError::Remote(_) => ErrorKind::RemoteService,
        LfError::Transport(_) => ErrorKind::Transport,
        LfError::Other(_) => ErrorKind::Internal,
    }
}

/// Result type alias using LfError.
pub type Result<T> = std::result::Result<T, LfError>;
