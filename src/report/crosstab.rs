//! Per-class cross-tab matrix construction.
//!
//! Builds the report grid for one class: three header rows (course ids, exam
//! numbers, course names), one row per student with a presence mark under
//! each registered course, and a totals row/column.
//!
//! ```text
//! seq  student_no  course_id  K1   K2   total
//!                  exam_no    P1   P2
//!                  course_name Algebra Logic
//! 1    S1          Alice      ✓          1
//! 2    S2          Bob        ✓    ✓     2
//! total                       2    1     3
//! ```
//!
//! Totals are always derived from the grid itself, never supplied. A
//! registration row contributes to the per-student counter every time it
//! matches, while the presence mark stays single-valued; duplicate roster
//! rows therefore inflate row totals. That matches the original tool and is
//! kept on purpose.

use serde::Serialize;

use crate::models::{Registration, RegistrationRow};
use crate::report::extract::{extract_courses, extract_students};

/// Marker placed at a (student, course) intersection.
pub const PRESENCE_MARK: &str = "✓";

/// Label of the totals row and column.
pub const TOTAL_LABEL: &str = "total";

/// Number of identity columns before the first course column.
const IDENTITY_COLUMNS: usize = 3;

/// Number of header rows before the first student row.
const HEADER_ROWS: usize = 3;

/// One class's finished report grid.
///
/// Plain data: built in one pass by [`build_crosstab`] and never mutated
/// afterwards. Sinks serialize it as-is.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ReportMatrix {
    /// Class this report is scoped to; used as the report section name.
    pub class_name: String,
    /// Rectangular grid of text cells, header rows first, totals row last.
    pub cells: Vec<Vec<String>>,
}

impl ReportMatrix {
    /// Number of rows, including header and totals rows.
    pub fn height(&self) -> usize {
        self.cells.len()
    }

    /// Number of columns, including identity and total columns.
    pub fn width(&self) -> usize {
        self.cells.first().map_or(0, |r| r.len())
    }

    /// All rows, header rows first.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.cells
    }

    /// Index of the totals column.
    pub fn total_column(&self) -> usize {
        self.width().saturating_sub(1)
    }

    /// The student rows (everything between headers and the totals row).
    pub fn student_rows(&self) -> &[Vec<String>] {
        let end = self.height().saturating_sub(1);
        &self.cells[HEADER_ROWS.min(end)..end]
    }

    /// The totals row.
    pub fn totals_row(&self) -> &[String] {
        self.cells.last().map_or(&[], |r| r.as_slice())
    }
}

/// Build the cross-tab matrix for one class.
///
/// `registrations` is the full, unfiltered registration list; rows of other
/// classes cannot leak in because matching is by the class's own
/// `student_no` and `course_id` values.
pub fn build_crosstab(
    rows: &[RegistrationRow],
    class_name: &str,
    registrations: &[Registration],
) -> ReportMatrix {
    let students = extract_students(rows, class_name);
    let courses = extract_courses(rows, class_name);

    let width = courses.len() + IDENTITY_COLUMNS + 1;
    let last = width - 1;
    let mut cells: Vec<Vec<String>> = Vec::with_capacity(HEADER_ROWS + students.len() + 1);

    // Header row 0: identity labels, course ids, totals label.
    let mut header = vec![String::new(); width];
    header[0] = "seq".into();
    header[1] = "student_no".into();
    header[2] = "course_id".into();
    header[last] = TOTAL_LABEL.into();
    for (i, course) in courses.iter().enumerate() {
        header[IDENTITY_COLUMNS + i] = course.course_id.clone();
    }
    cells.push(header);

    // Header row 1: exam (paper) numbers.
    let mut header = vec![String::new(); width];
    header[2] = "exam_no".into();
    for (i, course) in courses.iter().enumerate() {
        header[IDENTITY_COLUMNS + i] = course.paper_no.clone();
    }
    cells.push(header);

    // Header row 2: course names.
    let mut header = vec![String::new(); width];
    header[2] = "course_name".into();
    for (i, course) in courses.iter().enumerate() {
        header[IDENTITY_COLUMNS + i] = course.course_name.clone();
    }
    cells.push(header);

    // One row per student, with a running 1-based sequence number.
    for (idx, student) in students.iter().enumerate() {
        let mut row = vec![String::new(); width];
        row[0] = (idx + 1).to_string();
        row[1] = student.student_no.clone();
        row[2] = student.student_name.clone();

        let mut count = 0u32;
        for (i, course) in courses.iter().enumerate() {
            for reg in registrations.iter().filter(|r| r.student_no == student.student_no) {
                if reg.course_id == course.course_id {
                    // The mark is idempotent; the counter is not.
                    row[IDENTITY_COLUMNS + i] = PRESENCE_MARK.into();
                    count += 1;
                }
            }
        }
        row[last] = count.to_string();
        cells.push(row);
    }

    // Totals row: per-course mark counts, then the grand total. Both scans
    // run over the rows assembled so far; header rows never carry a mark and
    // their total cells never parse as integers.
    let mut totals = vec![String::new(); width];
    totals[0] = TOTAL_LABEL.into();
    for i in 0..courses.len() {
        let col = IDENTITY_COLUMNS + i;
        let marks = cells.iter().filter(|row| row[col] == PRESENCE_MARK).count();
        totals[col] = marks.to_string();
    }

    let grand: i64 = cells
        .iter()
        .map(|row| row[last].parse::<i64>().unwrap_or(0))
        .sum();
    totals[last] = grand.to_string();
    cells.push(totals);

    ReportMatrix {
        class_name: class_name.to_string(),
        cells,
    }
}
