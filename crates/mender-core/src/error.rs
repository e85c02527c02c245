//! Error types for the mender library.

use std::path::PathBuf;

use thiserror::Error;

use crate::compiler::PlanParseError;

/// Comprehensive error type for all mender operations.
#[derive(Error, Debug)]
pub enum MenderError {
    /// The language model could not be reached or answered with an error
    #[error("Language model error: {message}")]
    Llm {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },
    /// A plan response could not be parsed
    #[error("Plan parse error: {0}")]
    PlanParse(#[from] PlanParseError),
    /// A structured response lacked a required field or was not valid JSON
    #[error("Malformed {stage} response: {reason}")]
    MalformedResponse { stage: &'static str, reason: String },
    /// A plan step could not be turned into file changes
    #[error("Synthesis of step {step} failed: {reason}")]
    SynthesisFailed { step: String, reason: String },
    /// Artifact store connection or query errors
    #[error("Store error: {message}")]
    Store {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// Plan not found for the given ID
    #[error("Plan with ID {id} not found")]
    PlanNotFound { id: u64 },
    /// Snapshot not found for the given content hash
    #[error("Snapshot {hash} not found")]
    SnapshotNotFound { hash: String },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A file change targeted a path outside the workspace
    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },
    /// XDG base directory errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Builder for creating store errors with optional context.
pub struct StoreErrorBuilder {
    message: String,
}

impl StoreErrorBuilder {
    /// Create a new store error builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: rusqlite::Error) -> MenderError {
        MenderError::Store {
            message: self.message,
            source,
        }
    }
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> MenderError {
        MenderError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl MenderError {
    /// Creates a builder for store errors.
    pub fn store(message: impl Into<String>) -> StoreErrorBuilder {
        StoreErrorBuilder::new(message)
    }

    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Language model error without an underlying transport error.
    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm {
            message: message.into(),
            source: None,
        }
    }

    /// Malformed structured response for the given pipeline stage.
    pub fn malformed(stage: &'static str, reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            stage,
            reason: reason.into(),
        }
    }

    /// Wraps a `spawn_blocking` join failure.
    pub(crate) fn join(error: &tokio::task::JoinError) -> Self {
        Self::Configuration {
            message: format!("Task join error: {error}"),
        }
    }
}

impl From<reqwest::Error> for MenderError {
    fn from(source: reqwest::Error) -> Self {
        Self::Llm {
            message: source.to_string(),
            source: Some(source),
        }
    }
}

/// Specialized extension trait for store-related Results.
pub trait StoreResultExt<T> {
    /// Map store errors with a message.
    fn store_context(self, message: &str) -> Result<T>;
}

impl<T> StoreResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn store_context(self, message: &str) -> Result<T> {
        self.map_err(|e| MenderError::store(message).with_source(e))
    }
}

/// Extension trait attaching a path to I/O errors.
pub trait IoResultExt<T> {
    /// Map I/O errors to [`MenderError::FileSystem`] for `path`.
    fn at_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::result::Result<T, std::io::Error> {
    fn at_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|source| MenderError::FileSystem {
            path: path.into(),
            source,
        })
    }
}

/// Result type alias for mender operations
pub type Result<T> = std::result::Result<T, MenderError>;
