use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::ProcessError;
use crate::types::FileFormat;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ProcessSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (the call succeeded but produced invalid rows).
    Warning,
    /// Error-level event (the call failed).
    Error,
    /// Critical error (I/O or decompression failures).
    Critical,
}

/// Context about a processing call.
#[derive(Debug, Clone)]
pub struct ProcessContext {
    /// Input path, when the call was made through [`super::Processor::process_path`].
    pub path: Option<PathBuf>,
    /// Format of the input, including its compression.
    pub format: FileFormat,
}

impl ProcessContext {
    fn source(&self) -> String {
        self.path
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<reader>".to_string())
    }
}

/// Row counts reported for a completed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessStats {
    /// Number of data rows read.
    pub rows: usize,
    /// Rows without any prep or validation error.
    pub valid_rows: usize,
    /// Total number of prep and validation errors.
    pub errors: usize,
}

/// Observer interface for processing outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait ProcessObserver: Send + Sync {
    /// Called when a call completes, whether or not its rows were valid.
    fn on_success(&self, _ctx: &ProcessContext, _stats: ProcessStats) {}

    /// Called after [`Self::on_success`] when at least one row had errors.
    fn on_row_errors(&self, _ctx: &ProcessContext, _stats: ProcessStats) {}

    /// Called when a call fails.
    fn on_failure(
        &self,
        _ctx: &ProcessContext,
        _severity: ProcessSeverity,
        _error: &ProcessError,
    ) {
    }

    /// Called when a failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &ProcessContext, severity: ProcessSeverity, error: &ProcessError) {
        self.on_failure(ctx, severity, error)
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn ProcessObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn ProcessObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl ProcessObserver for CompositeObserver {
    fn on_success(&self, ctx: &ProcessContext, stats: ProcessStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_row_errors(&self, ctx: &ProcessContext, stats: ProcessStats) {
        for o in &self.observers {
            o.on_row_errors(ctx, stats);
        }
    }

    fn on_failure(&self, ctx: &ProcessContext, severity: ProcessSeverity, error: &ProcessError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &ProcessContext, severity: ProcessSeverity, error: &ProcessError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Logs processing events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl ProcessObserver for StdErrObserver {
    fn on_success(&self, ctx: &ProcessContext, stats: ProcessStats) {
        eprintln!(
            "[process][ok] format={} source={} rows={} valid={}",
            ctx.format,
            ctx.source(),
            stats.rows,
            stats.valid_rows
        );
    }

    fn on_row_errors(&self, ctx: &ProcessContext, stats: ProcessStats) {
        eprintln!(
            "[process][{:?}] format={} source={} invalid_rows={} errors={}",
            ProcessSeverity::Warning,
            ctx.format,
            ctx.source(),
            stats.rows - stats.valid_rows,
            stats.errors
        );
    }

    fn on_failure(&self, ctx: &ProcessContext, severity: ProcessSeverity, error: &ProcessError) {
        eprintln!(
            "[process][{:?}] format={} source={} err={}",
            severity,
            ctx.format,
            ctx.source(),
            error
        );
    }

    fn on_alert(&self, ctx: &ProcessContext, severity: ProcessSeverity, error: &ProcessError) {
        eprintln!(
            "[ALERT][process][{:?}] format={} source={} err={}",
            severity,
            ctx.format,
            ctx.source(),
            error
        );
    }
}

/// Appends processing events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl ProcessObserver for FileObserver {
    fn on_success(&self, ctx: &ProcessContext, stats: ProcessStats) {
        self.append_line(&format!(
            "{} ok format={} source={} rows={} valid={}",
            unix_ts(),
            ctx.format,
            ctx.source(),
            stats.rows,
            stats.valid_rows
        ));
    }

    fn on_row_errors(&self, ctx: &ProcessContext, stats: ProcessStats) {
        self.append_line(&format!(
            "{} rows severity={:?} format={} source={} invalid_rows={} errors={}",
            unix_ts(),
            ProcessSeverity::Warning,
            ctx.format,
            ctx.source(),
            stats.rows - stats.valid_rows,
            stats.errors
        ));
    }

    fn on_failure(&self, ctx: &ProcessContext, severity: ProcessSeverity, error: &ProcessError) {
        self.append_line(&format!(
            "{} fail severity={:?} format={} source={} err={}",
            unix_ts(),
            severity,
            ctx.format,
            ctx.source(),
            error
        ));
    }

    fn on_alert(&self, ctx: &ProcessContext, severity: ProcessSeverity, error: &ProcessError) {
        self.append_line(&format!(
            "{} ALERT severity={:?} format={} source={} err={}",
            unix_ts(),
            severity,
            ctx.format,
            ctx.source(),
            error
        ));
    }
}

/// Severity of a fatal error: infrastructure failures are critical, everything else is an error.
pub fn severity_for_error(e: &ProcessError) -> ProcessSeverity {
    match e {
        ProcessError::Io(_) | ProcessError::Compression { .. } => ProcessSeverity::Critical,
        ProcessError::Csv(err) => match err.kind() {
            ::csv::ErrorKind::Io(_) => ProcessSeverity::Critical,
            _ => ProcessSeverity::Error,
        },
        _ => ProcessSeverity::Error,
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
