//! Structured diagnostic log for the asset pipeline.
//!
//! Every error or warning produced during loading and remediation lands here
//! as an immutable timestamped record and is emitted immediately through the
//! configured sink. The log is append-only; `clear` is the only way records
//! leave it.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, warn};

/// Severity of a diagnostic record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A single timestamped diagnostic. Immutable once appended.
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticRecord {
    pub category: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Where records are emitted as they are appended.
///
/// The sink is injected at construction and dropped with the log, so no
/// process-wide output channel is ever patched; concurrent logs with
/// different sinks can coexist.
pub trait DiagnosticSink: Send {
    fn emit(&self, severity: Severity, record: &DiagnosticRecord);
}

/// Default sink: forwards records to the `tracing` macros.
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, severity: Severity, record: &DiagnosticRecord) {
        match severity {
            Severity::Error => error!("[{}] {}", record.category, record.message),
            Severity::Warning => warn!("[{}] {}", record.category, record.message),
        }
    }
}

/// Append-only sequences of error and warning records.
pub struct DiagnosticLog {
    errors: Vec<DiagnosticRecord>,
    warnings: Vec<DiagnosticRecord>,
    sink: Box<dyn DiagnosticSink>,
}

impl DiagnosticLog {
    pub fn new() -> Self {
        Self::with_sink(Box::new(TracingSink))
    }

    pub fn with_sink(sink: Box<dyn DiagnosticSink>) -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
            sink,
        }
    }

    /// Append an error record and emit it immediately.
    pub fn log_error(&mut self, category: impl Into<String>, message: impl Into<String>) {
        let record = DiagnosticRecord {
            category: category.into(),
            message: message.into(),
            timestamp: Utc::now(),
        };
        self.sink.emit(Severity::Error, &record);
        self.errors.push(record);
    }

    /// Append a warning record and emit it immediately.
    pub fn log_warning(&mut self, category: impl Into<String>, message: impl Into<String>) {
        let record = DiagnosticRecord {
            category: category.into(),
            message: message.into(),
            timestamp: Utc::now(),
        };
        self.sink.emit(Severity::Warning, &record);
        self.warnings.push(record);
    }

    pub fn errors(&self) -> &[DiagnosticRecord] {
        &self.errors
    }

    pub fn warnings(&self) -> &[DiagnosticRecord] {
        &self.warnings
    }

    /// Drop all accumulated records. Fallback registry state is owned
    /// elsewhere and unaffected.
    pub fn clear(&mut self) {
        self.errors.clear();
        self.warnings.clear();
    }
}

impl Default for DiagnosticLog {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of everything the pipeline complained about. Pure read; building
/// one does not mutate the log.
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticReport {
    pub errors: Vec<DiagnosticRecord>,
    pub warnings: Vec<DiagnosticRecord>,
    pub fallbacks_created: Vec<String>,
    pub total_issues: usize,
}
