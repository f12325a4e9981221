//! # Examtab - exam registration cross-tab reports
//!
//! Examtab ingests a flat exam-registration roster (one CSV row per
//! student-per-course) and produces, per class, a cross-tab report:
//! students as rows, courses as columns, a presence mark at registered
//! intersections, and row/column/grand totals.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ Roster CSV  │────▶│   Parser    │────▶│  Cross-Tab  │────▶│    Sink     │
//! │ (GBK/UTF8)  │     │ (auto-enc)  │     │ (per class) │     │ (CSV/JSON)  │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use examtab::{analyze_file, CsvSink, NullObserver};
//!
//! let mut sink = CsvSink::new("reports");
//! let summary = analyze_file("roster.csv", &mut sink, &NullObserver)?;
//! println!("{} classes reported", summary.classes);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Domain models (RegistrationRow, Student, Course, Registration)
//! - [`parser`] - CSV parsing with auto-detection
//! - [`report`] - Entity extraction, cross-tab builder, orchestrator
//! - [`progress`] - Run observer callbacks
//! - [`sink`] - Report sinks (CSV, JSON, in-memory)

// Core modules
pub mod error;
pub mod models;

// Parsing
pub mod parser;

// Report construction and orchestration
pub mod report;

// Progress notifications
pub mod progress;

// Report sinks
pub mod sink;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{ReportError, ReportResult, SinkError, SinkResult, SourceError, SourceResult};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    rows_from_records, Columns, Course, Registration, RegistrationRow, Student, REQUIRED_COLUMNS,
};

// =============================================================================
// Re-exports - CSV Parsing
// =============================================================================

pub use parser::{
    decode_content, detect_delimiter, detect_encoding, parse_bytes_auto, parse_file_auto,
    ParseResult,
};

// =============================================================================
// Re-exports - Report
// =============================================================================

pub use report::{
    analyze_file, analyze_rows, build_crosstab, extract_classes, extract_courses,
    extract_registrations, extract_students, spawn_analysis, ReportMatrix, RunSummary,
    PRESENCE_MARK, TOTAL_LABEL,
};

// =============================================================================
// Re-exports - Progress
// =============================================================================

pub use progress::{NullObserver, ProgressEvent, ProgressObserver, ReportObserver};

// =============================================================================
// Re-exports - Sinks
// =============================================================================

pub use sink::{CsvSink, JsonSink, MemorySink, ReportSink};
