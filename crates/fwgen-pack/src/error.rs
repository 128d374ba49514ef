//! Error types for the fwgen-pack pipeline

use std::path::PathBuf;

/// All errors that can abort a generation run. None of them are retried.
#[derive(Debug, thiserror::Error)]
pub enum PackError {
    /// Scan root or a discovered file is missing or unreadable
    #[error("Input not found or unreadable: {path}: {source}")]
    InputNotFound {
        /// Path that could not be read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
    /// Output file or its parent directory could not be created or written
    #[error("Output write failed: {path}: {source}")]
    OutputWriteFailure {
        /// Path that could not be written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
    /// Compression operation failed
    #[error("Compression failed: {0}")]
    CompressionFailed(String),
    /// Directory traversal failed for a reason other than a missing entry
    #[error("Directory walk failed: {0}")]
    Walk(String),
    /// A descriptor row references a blob that was not emitted exactly once
    #[error("Inconsistent artifact: {0}")]
    InconsistentArtifact(String),
    /// Driver was asked to move to a state it cannot reach from its current one
    #[error("Invalid driver transition: {from} -> {to}")]
    InvalidState {
        /// Current state
        from: &'static str,
        /// Requested state
        to: &'static str,
    },
    /// Configuration file is unreadable or invalid
    #[error("Invalid configuration: {0}")]
    Config(String),
}
