//! # Error Types
//!
//! Error types for the PodSec service using `thiserror`.

use std::fmt;

/// Custom result type for PodSec operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the PodSec service
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Database and storage errors
    #[error("Database error: {context}")]
    Database {
        #[source]
        source: sqlx::Error,
        context: String,
    },

    /// I/O errors with additional context
    #[error("I/O error: {context}")]
    Io {
        #[source]
        source: std::io::Error,
        context: String,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {context}")]
    Serialization {
        #[source]
        source: serde_json::Error,
        context: String,
    },

    /// Validation errors
    #[error("Validation error: {message}")]
    Validation { message: String, field: Option<String> },

    /// Authentication errors
    #[error("Authentication error: {message}")]
    Auth { message: String, kind: AuthErrorKind },

    /// Resource not found errors
    #[error("{resource_type} '{id}' not found")]
    NotFound { resource_type: String, id: String },

    /// Failures reported by or reaching the Podman backend
    #[error("Podman error: {message}")]
    Upstream { message: String, kind: UpstreamKind },

    /// Internal server errors
    #[error("Internal server error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// Authentication error subtypes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    InvalidToken,
    ExpiredToken,
    InvalidCredentials,
}

impl fmt::Display for AuthErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthErrorKind::InvalidToken => write!(f, "invalid_token"),
            AuthErrorKind::ExpiredToken => write!(f, "expired_token"),
            AuthErrorKind::InvalidCredentials => write!(f, "invalid_credentials"),
        }
    }
}

/// How an upstream (Podman) failure manifested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamKind {
    /// The backend could not be reached at all: missing executable,
    /// connection failure, timeout, or unparseable output.
    Unavailable,
    /// The `podman` subprocess exited non-zero.
    CommandFailed,
    /// The remote API answered with a non-2xx status.
    Status(u16),
}

impl Error {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into(), source: None }
    }

    /// Create a configuration error with source
    pub fn config_with_source<S: Into<String>>(
        message: S,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self::Config { message: message.into(), source: Some(source) }
    }

    /// Create a validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation { message: message.into(), field: None }
    }

    /// Create a validation error with field information
    pub fn validation_field<S: Into<String>, F: Into<String>>(message: S, field: F) -> Self {
        Self::Validation { message: message.into(), field: Some(field.into()) }
    }

    /// Create an authentication error
    pub fn auth<S: Into<String>>(message: S, kind: AuthErrorKind) -> Self {
        Self::Auth { message: message.into(), kind }
    }

    /// Create a not found error
    pub fn not_found<R: Into<String>, I: Into<String>>(resource_type: R, id: I) -> Self {
        Self::NotFound { resource_type: resource_type.into(), id: id.into() }
    }

    /// Create an upstream-unavailable error (backend unreachable or garbled)
    pub fn upstream_unavailable<S: Into<String>>(message: S) -> Self {
        Self::Upstream { message: message.into(), kind: UpstreamKind::Unavailable }
    }

    /// Create an error for a non-zero `podman` exit status
    pub fn command_failed<S: Into<String>>(stderr: S) -> Self {
        Self::Upstream { message: stderr.into(), kind: UpstreamKind::CommandFailed }
    }

    /// Create an error for a non-2xx Podman API response
    pub fn upstream_status<S: Into<String>>(status: u16, body: S) -> Self {
        Self::Upstream {
            message: format!("Podman API error ({}): {}", status, body.into()),
            kind: UpstreamKind::Status(status),
        }
    }

    /// Create an internal server error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal { message: message.into(), source: None }
    }

    /// Get the HTTP status code that should be returned for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Config { .. } => 500,
            Error::Database { .. } => 500,
            Error::Io { .. } => 500,
            Error::Serialization { .. } => 500,
            Error::Validation { .. } => 400,
            Error::Auth { .. } => 401,
            Error::NotFound { .. } => 404,
            Error::Upstream { kind, .. } => match kind {
                UpstreamKind::Unavailable => 503,
                UpstreamKind::CommandFailed => 400,
                UpstreamKind::Status(404) => 404,
                UpstreamKind::Status(status) if (400..500).contains(status) => 400,
                UpstreamKind::Status(_) => 503,
            },
            Error::Internal { .. } => 500,
        }
    }
}

// Error conversions for common external error types
impl From<sqlx::Error> for Error {
    fn from(error: sqlx::Error) -> Self {
        Self::Database { source: error, context: "Database operation failed".to_string() }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io { source: error, context: "I/O operation failed".to_string() }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization { source: error, context: "JSON serialization failed".to_string() }
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(errors: validator::ValidationErrors) -> Self {
        let message = errors
            .field_errors()
            .iter()
            .map(|(field, field_errors)| {
                let error_messages: Vec<String> = field_errors
                    .iter()
                    .map(|e| {
                        e.message.as_ref().map_or("Invalid value".to_string(), |m| m.to_string())
                    })
                    .collect();
                format!("{}: {}", field, error_messages.join(", "))
            })
            .collect::<Vec<_>>()
            .join("; ");

        Self::validation(format!("Validation failed: {}", message))
    }
}
