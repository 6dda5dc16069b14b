//! Common error types for Versus

use std::time::Duration;
use thiserror::Error;

/// Common result type for Versus operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the Versus crates
#[derive(Error, Debug)]
pub enum Error {
    /// Verse text that is not text at all (control bytes, invalid UTF-8)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration loading or validation error (also invalid beat parameters)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Commentary augmentation did not finish within its budget
    #[error("Augmentation timed out after {0:?}")]
    AugmentationTimeout(Duration),

    /// Commentary augmentation failed for any other reason
    #[error("Augmentation failed: {0}")]
    Augmentation(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for errors raised by the optional augmentation path.
    ///
    /// These never invalidate a base score and are swallowed by the cache.
    pub fn is_augmentation(&self) -> bool {
        matches!(self, Error::AugmentationTimeout(_) | Error::Augmentation(_))
    }
}
