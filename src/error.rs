//! Error types for the examtab report pipeline.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`SourceError`] - roster ingestion errors (I/O, decoding, columns)
//! - [`SinkError`] - report sink errors (I/O, serialization)
//! - [`ReportError`] - top-level orchestration errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// Source Errors
// =============================================================================

/// Errors while reading and decoding the registration roster.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Failed to read the input file.
    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to decode the input bytes.
    #[error("Failed to decode input: {0}")]
    Decode(String),

    /// Invalid CSV structure.
    #[error("Invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Empty input file.
    #[error("Input file is empty")]
    EmptyFile,

    /// No header row found.
    #[error("No headers found in input")]
    NoHeaders,

    /// A required column is missing from the header row.
    #[error("Missing required column: {0}")]
    MissingColumn(String),
}

// =============================================================================
// Sink Errors
// =============================================================================

/// Errors from the report sink (file writing, serialization).
#[derive(Debug, Error)]
pub enum SinkError {
    /// Failed to write a report file.
    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization failed.
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization failed.
    #[error("JSON write error: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Report Errors (top-level)
// =============================================================================

/// Top-level orchestration errors.
///
/// This is the main error type returned by
/// [`crate::report::pipeline::analyze_file`]. Any variant aborts the whole
/// run; no partial report set is considered valid.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Roster ingestion error.
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Report sink error.
    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for source operations.
pub type SourceResult<T> = Result<T, SourceError>;

/// Result type for sink operations.
pub type SinkResult<T> = Result<T, SinkError>;

/// Result type for pipeline operations.
pub type ReportResult<T> = Result<T, ReportError>;
