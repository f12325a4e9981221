//! Report machinery: entity extraction, cross-tab construction and the
//! run orchestrator.

pub mod crosstab;
pub mod extract;
pub mod pipeline;

pub use crosstab::{build_crosstab, ReportMatrix, PRESENCE_MARK, TOTAL_LABEL};
pub use extract::{extract_classes, extract_courses, extract_registrations, extract_students};
pub use pipeline::{analyze_file, analyze_rows, spawn_analysis, RunSummary};
