//! Error types for bundle expansion and record discovery.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `ExtractionError`.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Errors that can occur while unpacking a single container.
///
/// During recursive expansion these are scoped to the container that
/// produced them: siblings continue to be expanded.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The path does not carry a recognized archive suffix.
    #[error("unsupported archive format: {path}")]
    UnsupportedFormat {
        /// The offending path.
        path: PathBuf,
    },

    /// Archive is corrupted or invalid.
    #[error("invalid archive: {0}")]
    InvalidArchive(String),

    /// Container nesting went deeper than the configured bound.
    #[error("nesting too deep: {path} (max depth {max_depth})")]
    NestingTooDeep {
        /// The container that was not unpacked.
        path: PathBuf,
        /// Configured maximum depth.
        max_depth: usize,
    },

    /// The same container was reached twice in one expansion run.
    #[error("container already expanded: {path}")]
    AlreadyExpanded {
        /// Canonical path of the container.
        path: PathBuf,
    },
}

impl ExtractionError {
    /// Returns `true` if expansion of the surrounding tree can continue.
    ///
    /// Every error is scoped to one container, so only failures that say
    /// nothing about the surrounding tree are reported as recoverable. I/O
    /// errors may indicate a full disk or a vanished directory.
    ///
    /// # Examples
    ///
    /// ```
    /// use tsbundle_core::ExtractionError;
    ///
    /// let err = ExtractionError::InvalidArchive("truncated gzip stream".into());
    /// assert!(err.is_recoverable());
    ///
    /// let err = ExtractionError::Io(std::io::Error::other("disk full"));
    /// assert!(!err.is_recoverable());
    /// ```
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Io(_))
    }

    /// Returns a context string for this error, if available.
    ///
    /// # Examples
    ///
    /// ```
    /// use tsbundle_core::ExtractionError;
    ///
    /// let err = ExtractionError::InvalidArchive("bad header".to_string());
    /// assert_eq!(err.context(), Some("bad header"));
    /// ```
    #[must_use]
    pub fn context(&self) -> Option<&str> {
        match self {
            Self::InvalidArchive(msg) => Some(msg),
            _ => None,
        }
    }
}

/// Errors raised while locating or reading a record file.
#[derive(Error, Debug)]
pub enum RecordError {
    /// No file under the extraction root matched the discovery pattern.
    #[error("no file matches {pattern}")]
    MissingFile {
        /// The relative glob pattern that was searched.
        pattern: String,
    },

    /// The discovery pattern is not a valid glob.
    #[error("invalid pattern {pattern}: {source}")]
    InvalidPattern {
        /// The pattern as configured.
        pattern: String,
        /// Underlying glob error.
        #[source]
        source: globset::Error,
    },

    /// A matching file exists but could not be read.
    #[error("cannot read {path}: {source}")]
    Unreadable {
        /// The record file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// A single object boundary whose content is not valid JSON.
#[derive(Error, Debug)]
#[error("invalid object at bytes {start}..{end}: {source}")]
pub struct ParseError {
    /// Start offset of the boundary.
    pub start: usize,
    /// End offset (exclusive) of the boundary.
    pub end: usize,
    /// The decoder error.
    #[source]
    pub source: serde_json::Error,
}
