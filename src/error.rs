//! Error types for pingbeat
//!
//! Uses `thiserror` for ergonomic error handling with automatic `Display` and
//! `Error` trait implementations. Transient network failures are not part of
//! this taxonomy: the fetch retry loop absorbs them and degrades to an absent
//! result instead of returning an error.

use thiserror::Error;

/// The primary error type for pingbeat operations.
#[derive(Error, Debug)]
pub enum BeatError {
    /// Configuration-related errors (empty URL, zero timeout, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP client errors outside the retry loop (client construction, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Standard I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized `Result` type for pingbeat operations.
pub type Result<T> = std::result::Result<T, BeatError>;
