//! Entity extraction from the flat registration roster.
//!
//! The roster carries one row per student-per-course. Classes, students and
//! courses are derived by first-appearance deduplication; registrations stay
//! 1:1 with raw rows.
//!
//! ```text
//! Roster (flat rows)                 →  Entities (per class)
//! ┌─────────────────────────────┐       ┌──────────────────────────┐
//! │ C1, S1, K1 │ C1, S1, K2     │       │ classes:  [C1]           │
//! │ C1, S2, K1 │                │  →    │ students: [S1, S2]       │
//! └─────────────────────────────┘       │ courses:  [K1, K2]       │
//!                                       └──────────────────────────┘
//! ```
//!
//! Output order is part of the contract: every list preserves the order of
//! first appearance in the roster, because the report matrix lays out rows
//! and columns in exactly that order.

use std::collections::HashSet;

use crate::models::{Course, Registration, RegistrationRow, Student};

/// Distinct class names in first-appearance order.
pub fn extract_classes(rows: &[RegistrationRow]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut classes = Vec::new();
    for row in rows {
        if seen.insert(row.class_name.as_str()) {
            classes.push(row.class_name.clone());
        }
    }
    classes
}

/// Students of one class, first occurrence per `student_no`, order preserved.
pub fn extract_students(rows: &[RegistrationRow], class_name: &str) -> Vec<Student> {
    let mut seen = HashSet::new();
    let mut students = Vec::new();
    for row in rows {
        if row.class_name == class_name && seen.insert(row.student_no.as_str()) {
            students.push(Student {
                seq_no: row.seq_no.clone(),
                student_no: row.student_no.clone(),
                student_name: row.student_name.clone(),
            });
        }
    }
    students
}

/// Courses of one class, first occurrence per `course_id`, order preserved.
pub fn extract_courses(rows: &[RegistrationRow], class_name: &str) -> Vec<Course> {
    let mut seen = HashSet::new();
    let mut courses = Vec::new();
    for row in rows {
        if row.class_name == class_name && seen.insert(row.course_id.as_str()) {
            courses.push(Course {
                course_id: row.course_id.clone(),
                course_name: row.course_name.clone(),
                paper_no: row.paper_no.clone(),
                paper_memo: row.paper_memo.clone(),
                confirmed: row.confirmed.clone(),
            });
        }
    }
    courses
}

/// All registrations, one per roster row.
///
/// Deliberately not deduplicated and not filtered by class: matching against
/// a class's students happens by `student_no` later, and duplicate roster
/// rows must keep their double-count effect on row totals.
pub fn extract_registrations(rows: &[RegistrationRow]) -> Vec<Registration> {
    rows.iter()
        .map(|row| Registration {
            student_no: row.student_no.clone(),
            course_id: row.course_id.clone(),
        })
        .collect()
}
