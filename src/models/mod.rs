//! Domain models for the examtab report pipeline.
//!
//! This module contains the core data structures used throughout the
//! pipeline:
//!
//! - [`RegistrationRow`] - one raw roster row (student × course)
//! - [`Student`] - a student, deduplicated within a class
//! - [`Course`] - an examinable course, deduplicated within a class
//! - [`Registration`] - the fact that a student registered for a course
//! - [`Columns`] - resolution of the required roster columns, accepting
//!   the original Chinese headers or their English aliases

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SourceError;

// =============================================================================
// Column Resolution
// =============================================================================

/// The nine required roster columns as `(chinese, english)` header pairs.
///
/// The original tool reads a Chinese-language spreadsheet export; re-exported
/// rosters often carry translated headers, so both spellings are accepted.
pub const REQUIRED_COLUMNS: [(&str, &str); 9] = [
    ("序号", "seq_no"),
    ("班名称", "class_name"),
    ("学号", "student_no"),
    ("姓名", "student_name"),
    ("课程ID", "course_id"),
    ("课程名称", "course_name"),
    ("试卷号", "paper_no"),
    ("试卷号备注", "paper_memo"),
    ("是否确认", "confirmed"),
];

/// Resolved header names for the required roster columns.
///
/// Each field holds the header string actually present in the input, so row
/// lookups are a plain map access afterwards.
#[derive(Debug, Clone)]
pub struct Columns {
    pub seq_no: String,
    pub class_name: String,
    pub student_no: String,
    pub student_name: String,
    pub course_id: String,
    pub course_name: String,
    pub paper_no: String,
    pub paper_memo: String,
    pub confirmed: String,
}

impl Columns {
    /// Resolve the required columns against the actual header row.
    ///
    /// Fails with [`SourceError::MissingColumn`] naming the first column
    /// that is present under neither its Chinese nor its English header.
    pub fn resolve(headers: &[String]) -> Result<Self, SourceError> {
        let find = |cn: &str, en: &str| -> Result<String, SourceError> {
            headers
                .iter()
                .find(|h| h.as_str() == cn || h.as_str() == en)
                .cloned()
                .ok_or_else(|| SourceError::MissingColumn(format!("{en} ({cn})")))
        };

        Ok(Self {
            seq_no: find("序号", "seq_no")?,
            class_name: find("班名称", "class_name")?,
            student_no: find("学号", "student_no")?,
            student_name: find("姓名", "student_name")?,
            course_id: find("课程ID", "course_id")?,
            course_name: find("课程名称", "course_name")?,
            paper_no: find("试卷号", "paper_no")?,
            paper_memo: find("试卷号备注", "paper_memo")?,
            confirmed: find("是否确认", "confirmed")?,
        })
    }
}

// =============================================================================
// Registration Row
// =============================================================================

/// One raw roster row: a single student's registration for a single course.
///
/// All cells are kept as text, exactly as read from the source. Rows are
/// never unique at this level — a student appears once per registered course.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegistrationRow {
    pub seq_no: String,
    pub class_name: String,
    pub student_no: String,
    pub student_name: String,
    pub course_id: String,
    pub course_name: String,
    pub paper_no: String,
    pub paper_memo: String,
    pub confirmed: String,
}

impl RegistrationRow {
    /// Build a typed row from a parsed string-map record.
    ///
    /// Absent or non-string cells become empty strings; the parser already
    /// normalizes every cell to text.
    pub fn from_record(record: &Value, columns: &Columns) -> Self {
        let cell = |name: &str| -> String {
            record
                .get(name)
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string()
        };

        Self {
            seq_no: cell(&columns.seq_no),
            class_name: cell(&columns.class_name),
            student_no: cell(&columns.student_no),
            student_name: cell(&columns.student_name),
            course_id: cell(&columns.course_id),
            course_name: cell(&columns.course_name),
            paper_no: cell(&columns.paper_no),
            paper_memo: cell(&columns.paper_memo),
            confirmed: cell(&columns.confirmed),
        }
    }
}

/// Convert a full set of parsed records into typed rows.
pub fn rows_from_records(records: &[Value], columns: &Columns) -> Vec<RegistrationRow> {
    records
        .iter()
        .map(|r| RegistrationRow::from_record(r, columns))
        .collect()
}

// =============================================================================
// Derived Entities
// =============================================================================

/// A student, taken from the first roster row carrying their `student_no`
/// within a class.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Student {
    pub seq_no: String,
    pub student_no: String,
    pub student_name: String,
}

/// A course, taken from the first roster row carrying its `course_id`
/// within a class.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Course {
    pub course_id: String,
    pub course_name: String,
    pub paper_no: String,
    pub paper_memo: String,
    pub confirmed: String,
}

/// The fact that a student registered for a course.
///
/// One per raw roster row, deliberately never deduplicated (see the totals
/// behavior in [`crate::report::crosstab`]).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Registration {
    pub student_no: String,
    pub course_id: String,
}

// =============================================================================
// Tests
// =============================================================================
