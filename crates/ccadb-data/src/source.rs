/*!
# CSV Sources

Where the raw bytes of each table come from. A source is either bundled into
the binary (`include_bytes!`), held in memory, or read from the filesystem.
Reading happens once, up front; parsing never touches I/O.
*/

use crate::errors::{IngestError, IngestResult};
use std::borrow::Cow;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CsvSource {
    /// Bytes compiled into the binary.
    Bundled {
        name: &'static str,
        bytes: &'static [u8],
    },

    /// Bytes already resident in memory.
    Memory { name: String, bytes: Vec<u8> },

    /// A file read in full when the table is ingested.
    File(PathBuf),
}

impl CsvSource {
    pub fn bundled(name: &'static str, bytes: &'static [u8]) -> Self {
        CsvSource::Bundled { name, bytes }
    }

    pub fn memory(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        CsvSource::Memory {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        CsvSource::File(path.into())
    }

    /// Name used in diagnostics (the file path for file sources).
    pub fn name(&self) -> Cow<'_, str> {
        match self {
            CsvSource::Bundled { name, .. } => Cow::Borrowed(*name),
            CsvSource::Memory { name, .. } => Cow::Borrowed(name.as_str()),
            CsvSource::File(path) => path.to_string_lossy(),
        }
    }

    /// Obtain the table's bytes. Only file sources can fail.
    pub fn read(&self) -> IngestResult<Cow<'_, [u8]>> {
        match self {
            CsvSource::Bundled { bytes, .. } => Ok(Cow::Borrowed(*bytes)),
            CsvSource::Memory { bytes, .. } => Ok(Cow::Borrowed(bytes.as_slice())),
            CsvSource::File(path) => std::fs::read(path).map(Cow::Owned).map_err(|io| {
                IngestError::SourceUnavailable {
                    source_name: path.to_string_lossy().into_owned(),
                    io,
                }
            }),
        }
    }
}
