//! Error types for the fieldconf core library
//!
//! Processors themselves never fail. These errors surface only at the
//! boundaries around them: decoding untyped settings, the opt-in structural
//! validation stage, and host-supplied option loaders.

use std::fmt;
use thiserror::Error;
use serde::{Deserialize, Serialize};

/// Main error type for fieldconf operations
#[derive(Error, Debug)]
pub enum Error {
    /// Structural validation rejected a processed value
    #[error("Validation failed at {path}: {message}")]
    Validation {
        path: String,
        message: String,
    },

    /// Settings JSON could not be decoded for the declared kind
    #[error("Invalid settings for kind '{kind}': {message}")]
    Settings {
        kind: String,
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// A kind name that is not part of the registry
    #[error("Unknown field config kind: {kind}")]
    UnknownKind {
        kind: String,
    },

    /// A host option loader failed
    #[error("Option loader failed: {message}")]
    OptionsLoader {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// JSON parsing and serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Generic internal error with context
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Severity levels for validation issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational, no action required
    Info,
    /// Warning, should be reviewed
    Warning,
    /// Error, the value is structurally unusable
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Internal {
            message: err.to_string(),
            source: err,
        }
    }
}
