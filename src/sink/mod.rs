//! Report sinks: where finished per-class matrices go.
//!
//! The pipeline only knows the [`ReportSink`] trait; the original tool's
//! spreadsheet writer sits behind the same contract (one named section per
//! class, overwritten on re-run, caches released after a full run).
//!
//! Provided implementations:
//!
//! - [`CsvSink`] - one `<class>.csv` file per class
//! - [`JsonSink`] - one `<class>.json` file per class (serialized matrix)
//! - [`MemorySink`] - in-memory store, for tests and embedders

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::SinkResult;
use crate::report::crosstab::ReportMatrix;

/// Destination for finished report matrices.
pub trait ReportSink {
    /// Persist one class's matrix as a named report section.
    ///
    /// Writing the same `class_name` again must overwrite the prior
    /// section, never append to it.
    fn write_report(&mut self, class_name: &str, matrix: &ReportMatrix) -> SinkResult<()>;

    /// Release anything buffered after a full run.
    fn clear_cache(&mut self) -> SinkResult<()>;
}

/// Replace path-hostile characters so a class name becomes a safe file stem.
fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if cleaned.trim().is_empty() {
        "unnamed".to_string()
    } else {
        cleaned
    }
}

// =============================================================================
// CSV Sink
// =============================================================================

/// Writes each class's matrix as a CSV file under one output directory.
pub struct CsvSink {
    out_dir: PathBuf,
}

impl CsvSink {
    pub fn new(out_dir: impl AsRef<Path>) -> Self {
        Self {
            out_dir: out_dir.as_ref().to_path_buf(),
        }
    }

    fn report_path(&self, class_name: &str) -> PathBuf {
        self.out_dir
            .join(format!("{}.csv", sanitize_file_name(class_name)))
    }
}

impl ReportSink for CsvSink {
    fn write_report(&mut self, class_name: &str, matrix: &ReportMatrix) -> SinkResult<()> {
        fs::create_dir_all(&self.out_dir)?;

        // from_path truncates, so a re-run overwrites the section.
        let mut writer = csv::Writer::from_path(self.report_path(class_name))?;
        for row in matrix.rows() {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    fn clear_cache(&mut self) -> SinkResult<()> {
        // Files are written eagerly; nothing is buffered.
        Ok(())
    }
}

// =============================================================================
// JSON Sink
// =============================================================================

/// Writes each class's matrix as a pretty-printed JSON file.
pub struct JsonSink {
    out_dir: PathBuf,
}

impl JsonSink {
    pub fn new(out_dir: impl AsRef<Path>) -> Self {
        Self {
            out_dir: out_dir.as_ref().to_path_buf(),
        }
    }

    fn report_path(&self, class_name: &str) -> PathBuf {
        self.out_dir
            .join(format!("{}.json", sanitize_file_name(class_name)))
    }
}

impl ReportSink for JsonSink {
    fn write_report(&mut self, class_name: &str, matrix: &ReportMatrix) -> SinkResult<()> {
        fs::create_dir_all(&self.out_dir)?;
        let json = serde_json::to_string_pretty(matrix)?;
        fs::write(self.report_path(class_name), json)?;
        Ok(())
    }

    fn clear_cache(&mut self) -> SinkResult<()> {
        Ok(())
    }
}

// =============================================================================
// Memory Sink
// =============================================================================

/// In-memory sink keeping sections in write order.
///
/// Used by the test suite and by embedders that post-process matrices
/// instead of writing files.
#[derive(Debug, Default)]
pub struct MemorySink {
    reports: Vec<(String, ReportMatrix)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Section for a class, if written.
    pub fn get(&self, class_name: &str) -> Option<&ReportMatrix> {
        self.reports
            .iter()
            .find(|(name, _)| name == class_name)
            .map(|(_, m)| m)
    }

    /// Class names in write order.
    pub fn class_names(&self) -> Vec<&str> {
        self.reports.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// Drop all stored sections (e.g. between unrelated runs).
    pub fn clear(&mut self) {
        self.reports.clear();
    }
}

impl ReportSink for MemorySink {
    fn write_report(&mut self, class_name: &str, matrix: &ReportMatrix) -> SinkResult<()> {
        match self.reports.iter_mut().find(|(name, _)| name == class_name) {
            Some((_, existing)) => *existing = matrix.clone(),
            None => self.reports.push((class_name.to_string(), matrix.clone())),
        }
        Ok(())
    }

    fn clear_cache(&mut self) -> SinkResult<()> {
        // Stored sections are the persisted output, not a cache.
        Ok(())
    }
}
