/*!
# Schema Resolution

Maps the logical columns each table needs onto positional offsets taken from
its header row. The capability table may order its columns freely; the
SKI → SPKI table is strictly two positional columns.
*/

use crate::errors::{RecordError, RecordResult, SchemaError};
use csv::{ByteRecord, StringRecord};

// ================================================================================================
// Capability table
// ================================================================================================

/// Columns required from the CCADB "All Certificate Records" export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapabilityColumn {
    Sha256Fingerprint,
    SubjectKeyIdentifier,
    CertificateRecordType,
    TlsCapable,
    TlsEvCapable,
    SmimeCapable,
    CodeSigningCapable,
}

impl CapabilityColumn {
    pub const ALL: [CapabilityColumn; 7] = [
        CapabilityColumn::Sha256Fingerprint,
        CapabilityColumn::SubjectKeyIdentifier,
        CapabilityColumn::CertificateRecordType,
        CapabilityColumn::TlsCapable,
        CapabilityColumn::TlsEvCapable,
        CapabilityColumn::SmimeCapable,
        CapabilityColumn::CodeSigningCapable,
    ];

    /// Header text as published by CCADB.
    pub fn header(self) -> &'static str {
        match self {
            CapabilityColumn::Sha256Fingerprint => "SHA-256 Fingerprint",
            CapabilityColumn::SubjectKeyIdentifier => "Subject Key Identifier",
            CapabilityColumn::CertificateRecordType => "Certificate Record Type",
            CapabilityColumn::TlsCapable => "TLS Capable",
            CapabilityColumn::TlsEvCapable => "TLS EV Capable",
            CapabilityColumn::SmimeCapable => "S/MIME Capable",
            CapabilityColumn::CodeSigningCapable => "Code Signing Capable",
        }
    }

    fn from_header(header: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|column| column.header() == header)
    }

    fn slot(self) -> usize {
        self as usize
    }
}

/// Resolved offsets of every [`CapabilityColumn`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilityColumns {
    offsets: [usize; 7],
    max_offset: usize,
}

impl CapabilityColumns {
    /// Resolve offsets by exact header match. Extra columns are ignored; if a
    /// header repeats, the rightmost occurrence wins.
    pub fn resolve(header: &StringRecord) -> Result<Self, SchemaError> {
        let mut found: [Option<usize>; 7] = [None; 7];
        for (offset, name) in header.iter().enumerate() {
            if let Some(column) = CapabilityColumn::from_header(name) {
                found[column.slot()] = Some(offset);
            }
        }

        let missing: Vec<&'static str> = CapabilityColumn::ALL
            .into_iter()
            .filter(|column| found[column.slot()].is_none())
            .map(CapabilityColumn::header)
            .collect();
        if !missing.is_empty() {
            return Err(SchemaError::MissingHeaders(missing));
        }

        let mut offsets = [0usize; 7];
        for (slot, offset) in found.into_iter().enumerate() {
            offsets[slot] = offset.unwrap_or_default();
        }
        let max_offset = offsets.iter().copied().max().unwrap_or_default();

        Ok(Self {
            offsets,
            max_offset,
        })
    }

    pub fn offset(&self, column: CapabilityColumn) -> usize {
        self.offsets[column.slot()]
    }

    /// Highest offset among the required columns.
    pub fn max_offset(&self) -> usize {
        self.max_offset
    }

    /// Minimum field count for a row to carry every required column.
    pub fn required_fields(&self) -> usize {
        self.max_offset + 1
    }

    /// Field value for `column`, or `""` when the row is too short to have it.
    pub fn field<'r>(
        &self,
        row: &'r ByteRecord,
        column: CapabilityColumn,
    ) -> RecordResult<&'r str> {
        text_field(row, self.offset(column), column.header())
    }
}

/// UTF-8 view of the field at `offset`, `""` past the end of the row.
/// `column` names the field in the error.
pub fn text_field<'r>(row: &'r ByteRecord, offset: usize, column: &str) -> RecordResult<&'r str> {
    let bytes = row.get(offset).unwrap_or_default();
    std::str::from_utf8(bytes).map_err(|_| RecordError::InvalidUtf8 {
        column: column.to_string(),
        value: String::from_utf8_lossy(bytes).into_owned(),
    })
}

// ================================================================================================
// SKI -> SPKI SHA-256 table
// ================================================================================================

/// Column count of the SKI → SPKI table: key identifier, Base64 hash.
pub const SKI_SPKI_COLUMNS: usize = 2;

pub const SKI_SPKI_KEY_IDENTIFIER: usize = 0;
pub const SKI_SPKI_SHA256: usize = 1;

/// Names used when reporting SKI → SPKI fields; the file's own header text
/// is not checked.
pub const SKI_SPKI_HEADERS: [&str; SKI_SPKI_COLUMNS] = ["Subject Key Identifier", "SPKI SHA-256"];

/// The header's names are not interpreted, only its width.
pub fn validate_ski_spki_header(header: &StringRecord) -> Result<(), SchemaError> {
    if header.len() != SKI_SPKI_COLUMNS {
        return Err(SchemaError::ColumnCount {
            expected: SKI_SPKI_COLUMNS,
            found: header.len(),
        });
    }
    Ok(())
}
