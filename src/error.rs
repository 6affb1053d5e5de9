//! Error types for sarissa-sync.
//!
//! Every fallible operation in the crate returns [`Result`], whose error side is
//! the [`SyncError`] enum. Engine failures are never swallowed: they surface to the
//! caller unchanged, and only the boolean synchronizer operations translate an
//! absent record into `Ok(false)`.
//!
//! # Examples
//!
//! ```
//! use sarissa_sync::error::{Result, SyncError};
//!
//! fn submit() -> Result<()> {
//!     Err(SyncError::engine("connection refused"))
//! }
//!
//! match submit() {
//!     Ok(_) => println!("Submitted"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for sarissa-sync operations.
#[derive(Error, Debug)]
pub enum SyncError {
    /// I/O errors (record files, NDJSON output, config files)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The search engine rejected or failed a call
    #[error("Engine error: {0}")]
    Engine(String),

    /// The search engine reported that a document does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// A collaborator does not provide the requested capability
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// Invalid argument passed by the caller
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Errors raised by collaborator code built on anyhow
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with SyncError.
pub type Result<T> = std::result::Result<T, SyncError>;

impl SyncError {
    /// Create a new engine error.
    pub fn engine<S: Into<String>>(msg: S) -> Self {
        SyncError::Engine(msg.into())
    }

    /// Create a new not found error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        SyncError::NotFound(msg.into())
    }

    /// Create a new unsupported operation error.
    pub fn unsupported<S: Into<String>>(msg: S) -> Self {
        SyncError::Unsupported(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        SyncError::InvalidArgument(msg.into())
    }

    /// Create a new configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        SyncError::Config(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        SyncError::Other(msg.into())
    }

    /// Whether this error means the target document was already absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, SyncError::NotFound(_))
    }
}
