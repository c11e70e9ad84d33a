//! Error types for the linfer library.
//!
//! All errors are represented by the [`LinferError`] enum. Artifact problems
//! are reported when the model is loaded; classifying text has no error path,
//! so a constructed [`Classifier`](crate::classifier::Classifier) stays usable
//! for its whole lifetime.
//!
//! # Examples
//!
//! ```
//! use linfer::error::{LinferError, Result};
//!
//! fn check_classes(count: usize) -> Result<()> {
//!     if count < 2 {
//!         return Err(LinferError::artifact("need at least two classes"));
//!     }
//!     Ok(())
//! }
//!
//! match check_classes(1) {
//!     Ok(_) => println!("ok"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for linfer operations.
#[derive(Error, Debug)]
pub enum LinferError {
    /// The artifact is malformed, inconsistent, or holds non-finite values.
    #[error("Artifact error: {0}")]
    Artifact(String),

    /// The artifact declares an analyzer, pattern or normalization mode
    /// that is not implemented.
    #[error("Unsupported configuration: {0}")]
    ConfigUnsupported(String),

    /// I/O errors (reading artifact files, writing output)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for operations that may fail with LinferError.
pub type Result<T> = std::result::Result<T, LinferError>;

impl LinferError {
    /// Create a new artifact error.
    pub fn artifact<S: Into<String>>(msg: S) -> Self {
        LinferError::Artifact(msg.into())
    }

    /// Create a new unsupported-configuration error.
    pub fn config_unsupported<S: Into<String>>(msg: S) -> Self {
        LinferError::ConfigUnsupported(msg.into())
    }

    /// Whether this error was raised while validating an artifact.
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            LinferError::Artifact(_) | LinferError::ConfigUnsupported(_)
        )
    }
}
