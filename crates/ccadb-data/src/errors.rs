use std::fmt;
use thiserror::Error;

pub type IngestResult<T> = Result<T, IngestError>;
pub type RecordResult<T> = Result<T, RecordError>;

/// How loudly an ingestion problem should be reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Info,
    Warn,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => f.write_str("info"),
            Severity::Warn => f.write_str("warn"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// Failures that abort ingestion of a whole table.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("CSV file could not be read: {source_name}: {io}")]
    SourceUnavailable {
        source_name: String,
        #[source]
        io: std::io::Error,
    },

    #[error("CSV file is empty: {0}")]
    EmptySource(String),

    #[error("CSV file could not be parsed: {source_name}: {csv}")]
    MalformedTable {
        source_name: String,
        #[source]
        csv: csv::Error,
    },

    #[error("CSV file has a quoted field left open from line {line} to end of input: {source_name}")]
    UnterminatedQuote { source_name: String, line: usize },

    #[error("Schema validation error: {0}")]
    Schema(#[from] SchemaError),
}

impl IngestError {
    /// A missing source is expected when a deployment ships without one of
    /// the tables; everything else points at bad data.
    pub fn severity(&self) -> Severity {
        match self {
            IngestError::SourceUnavailable { .. } => Severity::Info,
            _ => Severity::Error,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("CSV data is missing one or more expected headers: {}", .0.join(", "))]
    MissingHeaders(Vec<&'static str>),

    #[error("Expected {expected} header columns, found {found}")]
    ColumnCount { expected: usize, found: usize },
}

/// Row-scoped decoding problems. Whether the row is still indexed depends on
/// the variant; see [`RecordError::skips_row`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("CSV data has a line that is missing one or more expected fields ({found} of {required})")]
    ShortRow { found: usize, required: usize },

    #[error("CSV data has a line with {found} fields, expected {expected}")]
    FieldCount { found: usize, expected: usize },

    #[error("CSV data has invalid UTF-8 in column {column}: {value}")]
    InvalidUtf8 { column: String, value: String },

    #[error("CSV data contains an invalid hex string: {value}")]
    InvalidHex {
        value: String,
        #[source]
        source: hex::FromHexError,
    },

    #[error("CSV data contains a fingerprint of {len} bytes, expected 32: {value}")]
    InvalidFingerprintLength { value: String, len: usize },

    #[error("CSV data contains an invalid Base64 string: {value}")]
    InvalidBase64 {
        value: String,
        #[source]
        source: base64::DecodeError,
    },

    #[error("CSV data contains a Base64 string with an invalid length ({len} bytes): {value}")]
    InvalidHashLength { value: String, len: usize },
}

impl RecordError {
    /// Short capability rows are decoded best-effort; every other record
    /// error drops the row.
    pub fn skips_row(&self) -> bool {
        !matches!(self, RecordError::ShortRow { .. })
    }

    pub fn severity(&self) -> Severity {
        Severity::Warn
    }

    /// The offending field value, when the error is about one.
    pub fn value(&self) -> Option<&str> {
        match self {
            RecordError::InvalidHex { value, .. }
            | RecordError::InvalidFingerprintLength { value, .. }
            | RecordError::InvalidBase64 { value, .. }
            | RecordError::InvalidHashLength { value, .. }
            | RecordError::InvalidUtf8 { value, .. } => Some(value.as_str()),
            RecordError::ShortRow { .. } | RecordError::FieldCount { .. } => None,
        }
    }
}
