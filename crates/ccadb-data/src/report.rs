/*!
# Ingestion Reporting

Ingestion never logs through a global; it hands every notable event to an
[`IngestReporter`] supplied by the caller. [`TracingReporter`] forwards to
`tracing`, [`MemoryReporter`] keeps events for inspection.
*/

use crate::errors::{IngestError, RecordError, Severity};
use crate::ingest::TableSummary;
use std::fmt;
use std::sync::Mutex;

/// Which of the two input tables an event concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    Capabilities,
    SkiSpki,
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableKind::Capabilities => f.write_str("capabilities"),
            TableKind::SkiSpki => f.write_str("ski_spki"),
        }
    }
}

#[derive(Debug)]
pub enum IngestEvent<'a> {
    /// The table could not be ingested at all; its indexes stay empty.
    TableAborted {
        table: TableKind,
        error: &'a IngestError,
    },

    /// A data row was dropped.
    RowSkipped {
        table: TableKind,
        line: usize,
        row: &'a str,
        error: &'a RecordError,
    },

    /// A data row was kept despite a problem.
    RowIncomplete {
        table: TableKind,
        line: usize,
        row: &'a str,
        error: &'a RecordError,
    },

    TableLoaded {
        table: TableKind,
        summary: &'a TableSummary,
    },
}

impl IngestEvent<'_> {
    pub fn table(&self) -> TableKind {
        match self {
            IngestEvent::TableAborted { table, .. }
            | IngestEvent::RowSkipped { table, .. }
            | IngestEvent::RowIncomplete { table, .. }
            | IngestEvent::TableLoaded { table, .. } => *table,
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            IngestEvent::TableAborted { error, .. } => error.severity(),
            IngestEvent::RowSkipped { error, .. } | IngestEvent::RowIncomplete { error, .. } => {
                error.severity()
            }
            IngestEvent::TableLoaded { .. } => Severity::Info,
        }
    }
}

impl fmt::Display for IngestEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestEvent::TableAborted { error, .. } => write!(f, "{}", error),
            IngestEvent::RowSkipped { line, error, .. } => {
                write!(f, "line {}: {} (row skipped)", line, error)
            }
            IngestEvent::RowIncomplete { line, error, .. } => write!(f, "line {}: {}", line, error),
            IngestEvent::TableLoaded { summary, .. } => write!(
                f,
                "loaded {}: {} rows, {} indexed, {} skipped, {} incomplete",
                summary.source_name,
                summary.rows_read,
                summary.rows_indexed,
                summary.rows_skipped,
                summary.rows_incomplete
            ),
        }
    }
}

pub trait IngestReporter {
    fn report(&self, event: IngestEvent<'_>);
}

/// Forwards events to the `tracing` subscriber installed by the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl IngestReporter for TracingReporter {
    fn report(&self, event: IngestEvent<'_>) {
        match &event {
            IngestEvent::TableAborted { table, error } => match error.severity() {
                Severity::Info => tracing::info!(%table, error = %error, "CSV table not loaded"),
                Severity::Warn => tracing::warn!(%table, error = %error, "CSV table not loaded"),
                Severity::Error => tracing::error!(%table, error = %error, "CSV table not loaded"),
            },
            IngestEvent::RowSkipped {
                table,
                line,
                row,
                error,
            } => tracing::warn!(
                %table,
                line,
                row,
                value = error.value().unwrap_or_default(),
                "{}",
                error
            ),
            IngestEvent::RowIncomplete {
                table,
                line,
                row,
                error,
            } => tracing::warn!(%table, line, row, "{}", error),
            IngestEvent::TableLoaded { table, summary } => tracing::info!(
                %table,
                file_path = %summary.source_name,
                rows_read = summary.rows_read,
                rows_indexed = summary.rows_indexed,
                rows_skipped = summary.rows_skipped,
                rows_incomplete = summary.rows_incomplete,
                "CSV table loaded"
            ),
        }
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl IngestReporter for NullReporter {
    fn report(&self, _event: IngestEvent<'_>) {}
}

/// An event captured by [`MemoryReporter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportedEvent {
    pub table: TableKind,
    pub severity: Severity,
    pub message: String,
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    events: Mutex<Vec<ReportedEvent>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ReportedEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Events at `severity` or above.
    pub fn at_least(&self, severity: Severity) -> Vec<ReportedEvent> {
        self.events()
            .into_iter()
            .filter(|event| event.severity >= severity)
            .collect()
    }
}

impl IngestReporter for MemoryReporter {
    fn report(&self, event: IngestEvent<'_>) {
        let reported = ReportedEvent {
            table: event.table(),
            severity: event.severity(),
            message: event.to_string(),
        };
        match self.events.lock() {
            Ok(mut events) => events.push(reported),
            Err(poisoned) => poisoned.into_inner().push(reported),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_reporter_records_severity() {
        let reporter = MemoryReporter::new();
        let aborted = IngestError::EmptySource("x.csv".to_string());
        let short = RecordError::ShortRow {
            found: 2,
            required: 7,
        };

        reporter.report(IngestEvent::TableAborted {
            table: TableKind::Capabilities,
            error: &aborted,
        });
        reporter.report(IngestEvent::RowIncomplete {
            table: TableKind::Capabilities,
            line: 3,
            row: "AA,K1",
            error: &short,
        });

        let events = reporter.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].severity, Severity::Error);
        assert_eq!(events[0].message, "CSV file is empty: x.csv");
        assert_eq!(events[1].severity, Severity::Warn);
        assert!(events[1].message.starts_with("line 3: "));
        assert_eq!(reporter.at_least(Severity::Error).len(), 1);
    }

    #[test]
    fn test_unavailable_source_reports_info() {
        let reporter = MemoryReporter::new();
        let missing = IngestError::SourceUnavailable {
            source_name: "data/ski_spkisha256.csv".to_string(),
            io: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        reporter.report(IngestEvent::TableAborted {
            table: TableKind::SkiSpki,
            error: &missing,
        });

        let events = reporter.events();
        assert_eq!(events[0].table, TableKind::SkiSpki);
        assert_eq!(events[0].severity, Severity::Info);
    }

    #[test]
    fn test_tracing_reporter_without_subscriber() {
        let short = RecordError::ShortRow {
            found: 1,
            required: 7,
        };
        TracingReporter.report(IngestEvent::RowIncomplete {
            table: TableKind::Capabilities,
            line: 2,
            row: "AA",
            error: &short,
        });
    }
}
