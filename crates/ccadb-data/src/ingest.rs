/*!
# Ingestion Pipeline

One bounded pass per table:

```text
capabilities: source -> parse -> resolve schema -> decode rows -> fingerprint index
                                                               \-> issuer capability merge
ski_spki:     source -> parse -> check header   -> decode rows -> SPKI hash index
```

Table-level failures (missing source, empty input, a quote left open to
end of input, bad header) abort that table only and leave its indexes empty. Row-level
failures are reported and, depending on the error, the row is dropped or
kept. Nothing here panics or terminates the process.
*/

use crate::errors::{IngestResult, RecordError};
use crate::index::{FingerprintIndex, IssuerCapabilityIndex, SpkiHashIndex};
use crate::parser::parse_table;
use crate::record::{decode_capability_row, decode_ski_spki_row};
use crate::report::{IngestEvent, IngestReporter, TableKind};
use crate::schema::{validate_ski_spki_header, CapabilityColumns};
use crate::source::CsvSource;
use csv::ByteRecord;
use serde::Serialize;

/// Outcome of ingesting one table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TableSummary {
    pub source_name: String,
    /// Data rows seen, header excluded.
    pub rows_read: usize,
    pub rows_indexed: usize,
    pub rows_skipped: usize,
    /// Rows indexed despite a warning.
    pub rows_incomplete: usize,
    /// Why the table was not ingested, when it was not.
    pub aborted: Option<String>,
}

impl TableSummary {
    fn new(source_name: String) -> Self {
        Self {
            source_name,
            ..Default::default()
        }
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilityIndexes {
    pub certificates: FingerprintIndex,
    pub issuers: IssuerCapabilityIndex,
}

/// Data rows are numbered from 2; line 1 is the header.
fn line_number(position: usize) -> usize {
    position + 2
}

fn joined(row: &ByteRecord) -> String {
    row.iter()
        .map(String::from_utf8_lossy)
        .collect::<Vec<_>>()
        .join(",")
}

fn row_problem(
    reporter: &dyn IngestReporter,
    summary: &mut TableSummary,
    table: TableKind,
    position: usize,
    row: &ByteRecord,
    error: &RecordError,
) {
    let row = joined(row);
    let line = line_number(position);
    if error.skips_row() {
        summary.rows_skipped += 1;
        reporter.report(IngestEvent::RowSkipped {
            table,
            line,
            row: &row,
            error,
        });
    } else {
        summary.rows_incomplete += 1;
        reporter.report(IngestEvent::RowIncomplete {
            table,
            line,
            row: &row,
            error,
        });
    }
}

fn finish(
    reporter: &dyn IngestReporter,
    table: TableKind,
    mut summary: TableSummary,
    outcome: IngestResult<()>,
) -> TableSummary {
    match outcome {
        Ok(()) => reporter.report(IngestEvent::TableLoaded {
            table,
            summary: &summary,
        }),
        Err(error) => {
            reporter.report(IngestEvent::TableAborted {
                table,
                error: &error,
            });
            summary.aborted = Some(error.to_string());
        }
    }
    summary
}

/// Build the fingerprint and issuer capability indexes from the CCADB
/// "All Certificate Records" table.
pub fn ingest_capabilities(
    source: &CsvSource,
    reporter: &dyn IngestReporter,
) -> (CapabilityIndexes, TableSummary) {
    let mut summary = TableSummary::new(source.name().into_owned());
    let mut indexes = CapabilityIndexes::default();
    let outcome = fill_capabilities(source, reporter, &mut indexes, &mut summary);
    if outcome.is_err() {
        indexes = CapabilityIndexes::default();
    }
    let summary = finish(reporter, TableKind::Capabilities, summary, outcome);
    (indexes, summary)
}

fn fill_capabilities(
    source: &CsvSource,
    reporter: &dyn IngestReporter,
    indexes: &mut CapabilityIndexes,
    summary: &mut TableSummary,
) -> IngestResult<()> {
    let bytes = source.read()?;
    let table = parse_table(&summary.source_name, &bytes)?;
    let columns = CapabilityColumns::resolve(table.header())?;

    for (position, row) in table.rows().iter().enumerate() {
        summary.rows_read += 1;

        let decoded = match decode_capability_row(row, &columns) {
            Ok(decoded) => decoded,
            Err(error) => {
                row_problem(
                    reporter,
                    summary,
                    TableKind::Capabilities,
                    position,
                    row,
                    &error,
                );
                continue;
            }
        };
        if let Some(warning) = &decoded.warning {
            row_problem(
                reporter,
                summary,
                TableKind::Capabilities,
                position,
                row,
                warning,
            );
        }

        indexes
            .issuers
            .merge(&decoded.key_identifier, &decoded.record);
        indexes
            .certificates
            .insert(decoded.fingerprint, decoded.record);
        summary.rows_indexed += 1;
    }

    Ok(())
}

/// Build the issuer key identifier → SPKI SHA-256 index.
pub fn ingest_ski_spki(
    source: &CsvSource,
    reporter: &dyn IngestReporter,
) -> (SpkiHashIndex, TableSummary) {
    let mut summary = TableSummary::new(source.name().into_owned());
    let mut index = SpkiHashIndex::default();
    let outcome = fill_ski_spki(source, reporter, &mut index, &mut summary);
    if outcome.is_err() {
        index = SpkiHashIndex::default();
    }
    let summary = finish(reporter, TableKind::SkiSpki, summary, outcome);
    (index, summary)
}

fn fill_ski_spki(
    source: &CsvSource,
    reporter: &dyn IngestReporter,
    index: &mut SpkiHashIndex,
    summary: &mut TableSummary,
) -> IngestResult<()> {
    let bytes = source.read()?;
    let table = parse_table(&summary.source_name, &bytes)?;
    validate_ski_spki_header(table.header())?;

    for (position, row) in table.rows().iter().enumerate() {
        summary.rows_read += 1;
        match decode_ski_spki_row(row) {
            Ok((key_identifier, hash)) => {
                index.insert(key_identifier, hash);
                summary.rows_indexed += 1;
            }
            Err(error) => row_problem(reporter, summary, TableKind::SkiSpki, position, row, &error),
        }
    }

    Ok(())
}
