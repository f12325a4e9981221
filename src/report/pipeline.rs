//! High-level orchestration: roster in, one report section per class out.
//!
//! # Example
//!
//! ```rust,ignore
//! use examtab::{analyze_file, CsvSink, NullObserver};
//!
//! let mut sink = CsvSink::new("reports");
//! let summary = analyze_file("roster.csv", &mut sink, &NullObserver)?;
//! println!("{} classes from {} rows", summary.classes, summary.rows);
//! ```
//!
//! A run is bracketed by `on_enabled_changed(false)` / `(true)` so the
//! caller can gate re-triggering; runs must not overlap. The first failing
//! class (or the source itself) aborts the whole run — remaining classes
//! are not attempted and the error is reported through `on_status` before
//! it propagates.

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::ReportResult;
use crate::models::{rows_from_records, Columns, RegistrationRow};
use crate::parser::parse_file_auto;
use crate::progress::ReportObserver;
use crate::report::crosstab::build_crosstab;
use crate::report::extract::{extract_classes, extract_registrations};
use crate::sink::ReportSink;

/// Result of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Roster rows read.
    pub rows: usize,
    /// Report sections written (one per class).
    pub classes: usize,
    /// Detected input encoding.
    pub encoding: String,
    /// Detected input delimiter.
    pub delimiter: char,
}

/// Analyze a roster file and write one report section per class.
///
/// This is the main entry point. It:
/// 1. Parses the CSV with encoding/delimiter auto-detection
/// 2. Resolves the required columns (Chinese or English headers)
/// 3. Builds and writes one cross-tab matrix per class, in class order
/// 4. Tells the sink to release cached resources
pub fn analyze_file(
    path: impl AsRef<Path>,
    sink: &mut dyn ReportSink,
    observer: &dyn ReportObserver,
) -> ReportResult<RunSummary> {
    observer.on_enabled_changed(false);
    let result = run_file(path.as_ref(), sink, observer);
    match &result {
        Ok(summary) => observer.on_status(&format!(
            "Analysis complete: {} report sections from {} rows",
            summary.classes, summary.rows
        )),
        Err(e) => observer.on_status(&format!("Analysis failed: {e}")),
    }
    observer.on_enabled_changed(true);
    result
}

fn run_file(
    path: &Path,
    sink: &mut dyn ReportSink,
    observer: &dyn ReportObserver,
) -> ReportResult<RunSummary> {
    observer.on_status("Reading roster...");
    let parsed = parse_file_auto(path)?;
    let columns = Columns::resolve(&parsed.headers)?;
    let rows = rows_from_records(&parsed.records, &columns);

    let classes = analyze_rows(&rows, sink, observer)?;

    Ok(RunSummary {
        rows: rows.len(),
        classes,
        encoding: parsed.encoding,
        delimiter: parsed.delimiter,
    })
}

/// Analyze already-typed roster rows.
///
/// Returns the number of report sections written. Zero rows is a valid
/// no-op, not an error. No bracketing notifications are sent here; use
/// [`analyze_file`] (or bracket manually) when a caller gates on them.
pub fn analyze_rows(
    rows: &[RegistrationRow],
    sink: &mut dyn ReportSink,
    observer: &dyn ReportObserver,
) -> ReportResult<usize> {
    let classes = extract_classes(rows);
    let registrations = extract_registrations(rows);

    for class_name in &classes {
        observer.on_status(&format!("Analyzing class [ {class_name} ]..."));
        let matrix = build_crosstab(rows, class_name, &registrations);
        sink.write_report(class_name, &matrix)?;
    }

    sink.clear_cache()?;
    Ok(classes.len())
}

/// Run the analysis on the blocking thread pool.
///
/// The whole run is one background unit of work; callers must await the
/// handle (or observe `on_enabled_changed(true)`) before starting another.
pub fn spawn_analysis<S>(
    path: PathBuf,
    mut sink: S,
    observer: Arc<dyn ReportObserver>,
) -> tokio::task::JoinHandle<ReportResult<RunSummary>>
where
    S: ReportSink + Send + 'static,
{
    tokio::task::spawn_blocking(move || analyze_file(&path, &mut sink, observer.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ReportError, SinkError, SourceError};
    use crate::progress::{NullObserver, ProgressEvent};
    use crate::report::crosstab::{ReportMatrix, PRESENCE_MARK};
    use crate::sink::MemorySink;
    use std::io::Write;
    use std::sync::Mutex;

    /// Observer that records every notification, in order.
    #[derive(Default)]
    struct RecordingObserver {
        events: Mutex<Vec<ProgressEvent>>,
    }

    impl RecordingObserver {
        fn events(&self) -> Vec<ProgressEvent> {
            self.events.lock().unwrap().clone()
        }
    }

    impl ReportObserver for RecordingObserver {
        fn on_status(&self, message: &str) {
            self.events
                .lock()
                .unwrap()
                .push(ProgressEvent::Status(message.to_string()));
        }

        fn on_enabled_changed(&self, enabled: bool) {
            self.events
                .lock()
                .unwrap()
                .push(ProgressEvent::Enabled(enabled));
        }
    }

    /// Sink that fails when a given class is written.
    struct ExplodingSink {
        inner: MemorySink,
        fail_on: String,
    }

    impl ReportSink for ExplodingSink {
        fn write_report(&mut self, class_name: &str, matrix: &ReportMatrix) -> Result<(), SinkError> {
            if class_name == self.fail_on {
                return Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full").into());
            }
            self.inner.write_report(class_name, matrix)
        }

        fn clear_cache(&mut self) -> Result<(), SinkError> {
            self.inner.clear_cache()
        }
    }

    const SCENARIO_CSV: &str = "\
seq_no,class_name,student_no,student_name,course_id,course_name,paper_no,paper_memo,confirmed
1,C1,S1,Alice,K1,Algebra,P1,,yes
2,C1,S2,Bob,K1,Algebra,P1,,yes
3,C1,S2,Bob,K2,Logic,P2,,yes
4,C2,S3,Carol,K7,History,P7,,yes
";

    fn roster_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_scenario_a_totals_end_to_end() {
        let file = roster_file(SCENARIO_CSV);
        let mut sink = MemorySink::new();
        let summary = analyze_file(file.path(), &mut sink, &NullObserver).unwrap();

        assert_eq!(summary.rows, 4);
        assert_eq!(summary.classes, 2);

        let c1 = sink.get("C1").unwrap();
        // S1: K1 only; S2: K1 and K2.
        assert_eq!(c1.cells[3][5], "1");
        assert_eq!(c1.cells[4][5], "2");
        let totals = c1.totals_row();
        assert_eq!(totals[3], "2");
        assert_eq!(totals[4], "1");
        assert_eq!(totals[5], "3");
    }

    #[test]
    fn test_scenario_b_zero_rows_is_a_no_op() {
        let file = roster_file(
            "seq_no,class_name,student_no,student_name,course_id,course_name,paper_no,paper_memo,confirmed\n",
        );
        let mut sink = MemorySink::new();
        let summary = analyze_file(file.path(), &mut sink, &NullObserver).unwrap();

        assert_eq!(summary.classes, 0);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_scenario_d_classes_are_scoped() {
        let file = roster_file(SCENARIO_CSV);
        let mut sink = MemorySink::new();
        analyze_file(file.path(), &mut sink, &NullObserver).unwrap();

        assert_eq!(sink.class_names(), vec!["C1", "C2"]);

        let c2 = sink.get("C2").unwrap();
        // C2 only carries its own course column.
        assert_eq!(c2.width(), 5);
        assert_eq!(c2.cells[0][3], "K7");
        assert!(!c2.cells[0].contains(&"K1".to_string()));
        assert_eq!(c2.cells[3][1], "S3");
        assert_eq!(c2.cells[3][3], PRESENCE_MARK);
    }

    #[test]
    fn test_rerun_overwrites_sections() {
        let file = roster_file(SCENARIO_CSV);
        let mut sink = MemorySink::new();

        let first = analyze_file(file.path(), &mut sink, &NullObserver).unwrap();
        let c1_first = sink.get("C1").unwrap().clone();
        let second = analyze_file(file.path(), &mut sink, &NullObserver).unwrap();

        assert_eq!(first.classes, second.classes);
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.get("C1").unwrap(), &c1_first);
    }

    #[test]
    fn test_observer_brackets_the_run() {
        let file = roster_file(SCENARIO_CSV);
        let mut sink = MemorySink::new();
        let observer = RecordingObserver::default();
        analyze_file(file.path(), &mut sink, &observer).unwrap();

        let events = observer.events();
        assert_eq!(events.first(), Some(&ProgressEvent::Enabled(false)));
        assert_eq!(events.last(), Some(&ProgressEvent::Enabled(true)));
        assert!(events.iter().any(
            |e| matches!(e, ProgressEvent::Status(m) if m.contains("Analysis complete"))
        ));
        // One per-class status for each class.
        let class_statuses = events
            .iter()
            .filter(|e| matches!(e, ProgressEvent::Status(m) if m.contains("Analyzing class")))
            .count();
        assert_eq!(class_statuses, 2);
    }

    #[test]
    fn test_missing_column_aborts_with_named_column() {
        let file = roster_file("seq_no,class_name,student_no\n1,C1,S1\n");
        let mut sink = MemorySink::new();
        let observer = RecordingObserver::default();
        let err = analyze_file(file.path(), &mut sink, &observer).unwrap_err();

        assert!(matches!(
            err,
            ReportError::Source(SourceError::MissingColumn(_))
        ));
        assert!(err.to_string().contains("student_name"));
        assert!(sink.is_empty());

        // Failure is reported and the caller is re-enabled.
        let events = observer.events();
        assert!(events.iter().any(
            |e| matches!(e, ProgressEvent::Status(m) if m.contains("Analysis failed"))
        ));
        assert_eq!(events.last(), Some(&ProgressEvent::Enabled(true)));
    }

    #[test]
    fn test_sink_failure_aborts_remaining_classes() {
        let file = roster_file(SCENARIO_CSV);
        let mut sink = ExplodingSink {
            inner: MemorySink::new(),
            fail_on: "C2".to_string(),
        };
        let observer = RecordingObserver::default();
        let err = analyze_file(file.path(), &mut sink, &observer).unwrap_err();

        assert!(matches!(err, ReportError::Sink(SinkError::Io(_))));
        // C1 was written before the failure; the run stopped there.
        assert_eq!(sink.inner.class_names(), vec!["C1"]);
        assert_eq!(observer.events().last(), Some(&ProgressEvent::Enabled(true)));
    }

    #[test]
    fn test_chinese_headers_end_to_end() {
        let csv = "\
序号,班名称,学号,姓名,课程ID,课程名称,试卷号,试卷号备注,是否确认
1,三年二班,S1,含含,K1,代数,P1,,是
";
        let file = roster_file(csv);
        let mut sink = MemorySink::new();
        let summary = analyze_file(file.path(), &mut sink, &NullObserver).unwrap();

        assert_eq!(summary.classes, 1);
        let matrix = sink.get("三年二班").unwrap();
        assert_eq!(matrix.cells[3][2], "含含");
        assert_eq!(matrix.cells[3][3], PRESENCE_MARK);
    }

    #[tokio::test]
    async fn test_spawn_analysis_completes() {
        let file = roster_file(SCENARIO_CSV);
        let observer: Arc<dyn ReportObserver> = Arc::new(NullObserver);
        let handle = spawn_analysis(file.path().to_path_buf(), MemorySink::new(), observer);
        let summary = handle.await.unwrap().unwrap();
        assert_eq!(summary.classes, 2);
    }
}
