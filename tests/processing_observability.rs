use std::sync::{Arc, Mutex};

use rust_fileprep::ProcessError;
use rust_fileprep::processing::{
    CompositeObserver, ProcessContext, ProcessObserver, ProcessOptions, ProcessSeverity,
    ProcessStats, Processor,
};
use rust_fileprep::schema::{FieldSpec, Record, RowValues};
use rust_fileprep::types::{Compression, DataType, FileFormat, FileType};

#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<String>>,
}

impl Recorder {
    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl ProcessObserver for Recorder {
    fn on_success(&self, ctx: &ProcessContext, stats: ProcessStats) {
        self.events.lock().unwrap().push(format!(
            "success {} rows={} valid={}",
            ctx.format, stats.rows, stats.valid_rows
        ));
    }

    fn on_row_errors(&self, _ctx: &ProcessContext, stats: ProcessStats) {
        self.events
            .lock()
            .unwrap()
            .push(format!("row_errors errors={}", stats.errors));
    }

    fn on_failure(&self, _ctx: &ProcessContext, severity: ProcessSeverity, _error: &ProcessError) {
        self.events
            .lock()
            .unwrap()
            .push(format!("failure {severity:?}"));
    }

    fn on_alert(&self, _ctx: &ProcessContext, severity: ProcessSeverity, _error: &ProcessError) {
        self.events
            .lock()
            .unwrap()
            .push(format!("alert {severity:?}"));
    }
}

struct Score;

impl Record for Score {
    fn fields() -> Vec<FieldSpec> {
        vec![FieldSpec::new("Score", DataType::Float32).validate("gte=0")]
    }

    fn from_row(_: &RowValues<'_>) -> Self {
        Score
    }
}

fn processor(recorder: &Arc<Recorder>, alert_at_or_above: ProcessSeverity) -> Processor {
    Processor::new(ProcessOptions {
        observer: Some(recorder.clone() as Arc<dyn ProcessObserver>),
        alert_at_or_above,
        ..Default::default()
    })
}

#[test]
fn success_and_row_errors_are_reported() {
    let rec = Arc::new(Recorder::default());
    let p = processor(&rec, ProcessSeverity::Critical);

    p.process::<Score, _>("score\n1.5\n".as_bytes(), FileFormat::plain(FileType::Csv))
        .unwrap();
    p.process::<Score, _>("score\n-1\nx\n".as_bytes(), FileFormat::plain(FileType::Csv))
        .unwrap();

    assert_eq!(
        rec.events(),
        vec![
            "success csv rows=1 valid=1",
            "success csv rows=2 valid=0",
            "row_errors errors=3",
        ]
    );
}

#[test]
fn io_failures_alert_at_critical() {
    let rec = Arc::new(Recorder::default());
    let p = processor(&rec, ProcessSeverity::Critical);

    let err = p
        .process::<Score, _>(
            "not gzip at all".as_bytes(),
            FileFormat::new(FileType::Csv, Compression::Gzip),
        )
        .unwrap_err();
    assert!(matches!(err, ProcessError::Compression { .. }));

    let err = p
        .process_path::<Score>("tests/fixtures/does-not-exist.csv")
        .unwrap_err();
    assert!(matches!(err, ProcessError::Io(_)));

    assert_eq!(
        rec.events(),
        vec![
            "failure Critical",
            "alert Critical",
            "failure Critical",
            "alert Critical",
        ]
    );
}

#[test]
fn alert_threshold_is_respected() {
    let rec = Arc::new(Recorder::default());
    let p = processor(&rec, ProcessSeverity::Critical);
    let _ = p.process::<Score, _>("score\n1,2\n".as_bytes(), FileFormat::plain(FileType::Csv));
    assert_eq!(rec.events(), vec!["failure Error"]);

    let rec = Arc::new(Recorder::default());
    let p = processor(&rec, ProcessSeverity::Error);
    let _ = p.process::<Score, _>("score\n1,2\n".as_bytes(), FileFormat::plain(FileType::Csv));
    assert_eq!(rec.events(), vec!["failure Error", "alert Error"]);
}

#[test]
fn composite_fans_out() {
    let a = Arc::new(Recorder::default());
    let b = Arc::new(Recorder::default());
    let composite = CompositeObserver::new(vec![a.clone() as Arc<dyn ProcessObserver>, b.clone()]);

    let p = Processor::new(ProcessOptions {
        observer: Some(Arc::new(composite)),
        ..Default::default()
    });
    p.process::<Score, _>("score\n2\n".as_bytes(), FileFormat::plain(FileType::Tsv))
        .unwrap();

    assert_eq!(a.events(), vec!["success tsv rows=1 valid=1"]);
    assert_eq!(b.events(), a.events());
}
