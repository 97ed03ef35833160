/*!
# Tabular Parser

Lenient CSV tokenizing shared by both tables:

- rows may carry fewer or more fields than the header
- stray quotes inside unquoted fields are kept literally
- whitespace around fields is stripped (trailing as well as leading, which
  CCADB values never depend on)
- blank lines are ignored
- field bytes stay opaque; UTF-8 is only checked on the fields a decoder reads

A quoted field still open at end of input is the one syntax error; it would
otherwise swallow every following row.

The first row is kept as the header; interpreting it is the schema
resolver's job.
*/

use crate::errors::{IngestError, IngestResult};
use csv::{ByteRecord, ReaderBuilder, StringRecord, Trim};

const QUOTE: u8 = b'"';
const DELIMITER: u8 = b',';

/// A fully tokenized table: a header row followed by zero or more data rows.
#[derive(Debug, Clone)]
pub struct Table {
    header: StringRecord,
    rows: Vec<ByteRecord>,
}

impl Table {
    /// Header names; bytes that are not UTF-8 are replaced, so they can
    /// never match a required column.
    pub fn header(&self) -> &StringRecord {
        &self.header
    }

    pub fn rows(&self) -> &[ByteRecord] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<ByteRecord> {
        self.rows
    }
}

/// Tokenize `bytes` into a [`Table`].
///
/// Fails with `UnterminatedQuote` when a quoted field runs to end of input,
/// with `MalformedTable` when the reader itself errors, and with
/// `EmptySource` when the input holds no rows at all.
pub fn parse_table(source_name: &str, bytes: &[u8]) -> IngestResult<Table> {
    if let Some(line) = unterminated_quote_line(bytes) {
        return Err(IngestError::UnterminatedQuote {
            source_name: source_name.to_string(),
            line,
        });
    }

    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(bytes);

    let mut records = Vec::new();
    for result in rdr.byte_records() {
        let record = result.map_err(|csv| IngestError::MalformedTable {
            source_name: source_name.to_string(),
            csv,
        })?;
        records.push(record);
    }

    let mut records = records.into_iter();
    let header = records
        .next()
        .ok_or_else(|| IngestError::EmptySource(source_name.to_string()))?;

    Ok(Table {
        header: StringRecord::from_byte_record_lossy(header),
        rows: records.collect(),
    })
}

/// Line (1-based) of a quote that opens a field and is never closed.
///
/// Only a quote as the very first byte of a field opens a quoted field; a
/// doubled quote inside one is an escaped quote. Anywhere else a quote is
/// literal.
fn unterminated_quote_line(bytes: &[u8]) -> Option<usize> {
    let mut line = 1;
    let mut at_field_start = true;
    let mut open_since: Option<usize> = None;
    let mut iter = bytes.iter().copied().peekable();

    while let Some(byte) = iter.next() {
        if open_since.is_some() {
            if byte == QUOTE {
                if iter.peek() == Some(&QUOTE) {
                    iter.next();
                } else {
                    open_since = None;
                }
            }
            if byte == b'\n' {
                line += 1;
            }
            continue;
        }

        match byte {
            QUOTE if at_field_start => {
                open_since = Some(line);
                at_field_start = false;
            }
            DELIMITER | b'\r' => at_field_start = true,
            b'\n' => {
                line += 1;
                at_field_start = true;
            }
            _ => at_field_start = false,
        }
    }

    open_since
}
