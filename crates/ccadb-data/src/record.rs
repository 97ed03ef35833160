/*!
# Records

Value types carried by the indexes, and the row decoders that build them.
*/

use crate::errors::{RecordError, RecordResult};
use crate::schema::{
    text_field, CapabilityColumn, CapabilityColumns, SKI_SPKI_COLUMNS, SKI_SPKI_HEADERS,
    SKI_SPKI_KEY_IDENTIFIER, SKI_SPKI_SHA256,
};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use csv::ByteRecord;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const SHA256_LEN: usize = 32;

pub const CCADB_RECORD_ROOT: &str = "Root Certificate";
pub const CCADB_RECORD_INTERMEDIATE: &str = "Intermediate Certificate";

/// Literal token CCADB uses for a set capability flag.
pub const CCADB_TRUE: &str = "True";

// ================================================================================================
// Fingerprint / SPKI hash
// ================================================================================================

/// SHA-256 fingerprint of a CA certificate.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Fingerprint([u8; SHA256_LEN]);

impl Fingerprint {
    pub const fn new(bytes: [u8; SHA256_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SHA256_LEN] {
        &self.0
    }

    /// Decode a hex fingerprint (either case) of exactly 32 bytes.
    pub fn from_hex(value: &str) -> RecordResult<Self> {
        let bytes = hex::decode(value).map_err(|source| RecordError::InvalidHex {
            value: value.to_string(),
            source,
        })?;
        let array: [u8; SHA256_LEN] =
            bytes
                .try_into()
                .map_err(|bytes: Vec<u8>| RecordError::InvalidFingerprintLength {
                    value: value.to_string(),
                    len: bytes.len(),
                })?;
        Ok(Self(array))
    }
}

impl From<[u8; SHA256_LEN]> for Fingerprint {
    fn from(bytes: [u8; SHA256_LEN]) -> Self {
        Self(bytes)
    }
}

impl FromStr for Fingerprint {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Fingerprint {
    type Error = RecordError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Fingerprint> for String {
    fn from(fingerprint: Fingerprint) -> Self {
        fingerprint.to_string()
    }
}

/// Uppercase hex, as CCADB publishes it.
impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode_upper(self.0))
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self)
    }
}

/// SHA-256 of an issuer's SubjectPublicKeyInfo.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct SpkiHash([u8; SHA256_LEN]);

impl SpkiHash {
    pub const fn new(bytes: [u8; SHA256_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SHA256_LEN] {
        &self.0
    }

    pub fn into_bytes(self) -> [u8; SHA256_LEN] {
        self.0
    }

    /// Decode standard (padded) Base64 that must yield exactly 32 bytes.
    pub fn from_base64(value: &str) -> RecordResult<Self> {
        let decoded = BASE64
            .decode(value)
            .map_err(|source| RecordError::InvalidBase64 {
                value: value.to_string(),
                source,
            })?;
        let array: [u8; SHA256_LEN] =
            decoded
                .try_into()
                .map_err(|decoded: Vec<u8>| RecordError::InvalidHashLength {
                    value: value.to_string(),
                    len: decoded.len(),
                })?;
        Ok(Self(array))
    }
}

impl From<[u8; SHA256_LEN]> for SpkiHash {
    fn from(bytes: [u8; SHA256_LEN]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<String> for SpkiHash {
    type Error = RecordError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_base64(&value)
    }
}

impl From<SpkiHash> for String {
    fn from(hash: SpkiHash) -> Self {
        hash.to_string()
    }
}

impl fmt::Display for SpkiHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&BASE64.encode(self.0))
    }
}

impl fmt::Debug for SpkiHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SpkiHash({})", self)
    }
}

// ================================================================================================
// Capability records
// ================================================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum RecordType {
    Root,
    Intermediate,
    /// Any record type CCADB may add later, kept verbatim.
    Other(String),
}

impl RecordType {
    pub fn as_str(&self) -> &str {
        match self {
            RecordType::Root => CCADB_RECORD_ROOT,
            RecordType::Intermediate => CCADB_RECORD_INTERMEDIATE,
            RecordType::Other(other) => other.as_str(),
        }
    }

    pub fn is_root(&self) -> bool {
        matches!(self, RecordType::Root)
    }
}

impl From<&str> for RecordType {
    fn from(value: &str) -> Self {
        match value {
            CCADB_RECORD_ROOT => RecordType::Root,
            CCADB_RECORD_INTERMEDIATE => RecordType::Intermediate,
            other => RecordType::Other(other.to_string()),
        }
    }
}

impl From<String> for RecordType {
    fn from(value: String) -> Self {
        RecordType::from(value.as_str())
    }
}

impl From<RecordType> for String {
    fn from(record_type: RecordType) -> Self {
        match record_type {
            RecordType::Other(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capabilities asserted by one CA certificate row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CapabilityRecord {
    pub record_type: RecordType,
    pub tls_capable: bool,
    pub tls_ev_capable: bool,
    pub smime_capable: bool,
    pub code_signing_capable: bool,
}

impl CapabilityRecord {
    /// Fold `other` into `self`: Root is sticky, flags are OR-ed.
    pub fn absorb(&mut self, other: &CapabilityRecord) {
        if other.record_type.is_root() {
            self.record_type = RecordType::Root;
        }
        self.tls_capable |= other.tls_capable;
        self.tls_ev_capable |= other.tls_ev_capable;
        self.smime_capable |= other.smime_capable;
        self.code_signing_capable |= other.code_signing_capable;
    }
}

// ================================================================================================
// Row decoding
// ================================================================================================

/// A decoded capability-table row.
#[derive(Debug, Clone, PartialEq)]
pub struct CapabilityRow {
    pub fingerprint: Fingerprint,
    pub key_identifier: String,
    pub record: CapabilityRecord,
    /// Set when the row was too short and decoded best-effort.
    pub warning: Option<RecordError>,
}

fn flag(value: &str) -> bool {
    value == CCADB_TRUE
}

/// Decode one capability row.
///
/// A row shorter than the schema requires is decoded with the missing fields
/// read as empty and carries a `ShortRow` warning. A fingerprint that is not
/// 32 bytes of hex, or a required field that is not UTF-8, fails the whole
/// row. Columns outside the schema are never looked at.
pub fn decode_capability_row(
    row: &ByteRecord,
    columns: &CapabilityColumns,
) -> RecordResult<CapabilityRow> {
    let warning = (row.len() < columns.required_fields()).then(|| RecordError::ShortRow {
        found: row.len(),
        required: columns.required_fields(),
    });

    let fingerprint =
        Fingerprint::from_hex(columns.field(row, CapabilityColumn::Sha256Fingerprint)?)?;

    let record = CapabilityRecord {
        record_type: RecordType::from(
            columns.field(row, CapabilityColumn::CertificateRecordType)?,
        ),
        tls_capable: flag(columns.field(row, CapabilityColumn::TlsCapable)?),
        tls_ev_capable: flag(columns.field(row, CapabilityColumn::TlsEvCapable)?),
        smime_capable: flag(columns.field(row, CapabilityColumn::SmimeCapable)?),
        code_signing_capable: flag(columns.field(row, CapabilityColumn::CodeSigningCapable)?),
    };

    Ok(CapabilityRow {
        fingerprint,
        key_identifier: columns
            .field(row, CapabilityColumn::SubjectKeyIdentifier)?
            .to_string(),
        record,
        warning,
    })
}

/// Decode one SKI → SPKI row into its key identifier and hash.
pub fn decode_ski_spki_row(row: &ByteRecord) -> RecordResult<(String, SpkiHash)> {
    if row.len() != SKI_SPKI_COLUMNS {
        return Err(RecordError::FieldCount {
            found: row.len(),
            expected: SKI_SPKI_COLUMNS,
        });
    }

    let key_identifier = text_field(
        row,
        SKI_SPKI_KEY_IDENTIFIER,
        SKI_SPKI_HEADERS[SKI_SPKI_KEY_IDENTIFIER],
    )?;
    let hash = SpkiHash::from_base64(text_field(
        row,
        SKI_SPKI_SHA256,
        SKI_SPKI_HEADERS[SKI_SPKI_SHA256],
    )?)?;
    Ok((key_identifier.to_string(), hash))
}
