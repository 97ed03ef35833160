use crate::source::CsvSource;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_DIR: &str = "data";
pub const CCADB_CSV_FILE: &str = "AllCertificateRecordsCSVFormatv4";
pub const SKI_SPKISHA256_FILE: &str = "ski_spkisha256.csv";

/// Filesystem locations of the two input tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Directory that relative table paths resolve against.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// CCADB "All Certificate Records" CSV export.
    #[serde(default = "default_capabilities_file")]
    pub capabilities_file: PathBuf,

    /// Issuer key identifier -> Base64(SHA-256(SPKI)) table.
    #[serde(default = "default_ski_spki_file")]
    pub ski_spki_file: PathBuf,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            capabilities_file: default_capabilities_file(),
            ski_spki_file: default_ski_spki_file(),
        }
    }
}

impl SourceConfig {
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Default::default()
        }
    }

    pub fn capabilities_path(&self) -> PathBuf {
        self.resolve(&self.capabilities_file)
    }

    pub fn ski_spki_path(&self) -> PathBuf {
        self.resolve(&self.ski_spki_file)
    }

    pub fn capabilities_source(&self) -> CsvSource {
        CsvSource::file(self.capabilities_path())
    }

    pub fn ski_spki_source(&self) -> CsvSource {
        CsvSource::file(self.ski_spki_path())
    }

    fn resolve(&self, file: &Path) -> PathBuf {
        if file.is_absolute() {
            file.to_path_buf()
        } else {
            self.data_dir.join(file)
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn default_capabilities_file() -> PathBuf {
    PathBuf::from(CCADB_CSV_FILE)
}

fn default_ski_spki_file() -> PathBuf {
    PathBuf::from(SKI_SPKISHA256_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        let config = SourceConfig::default();
        assert_eq!(
            config.capabilities_path(),
            PathBuf::from("data/AllCertificateRecordsCSVFormatv4")
        );
        assert_eq!(
            config.ski_spki_path(),
            PathBuf::from("data/ski_spkisha256.csv")
        );
    }

    #[test]
    fn test_absolute_file_ignores_data_dir() {
        let absolute = std::env::temp_dir().join("caps.csv");
        let config = SourceConfig {
            capabilities_file: absolute.clone(),
            ..SourceConfig::with_data_dir("/srv/ccadb")
        };
        assert_eq!(config.capabilities_path(), absolute);
        assert_eq!(
            config.ski_spki_path(),
            PathBuf::from("/srv/ccadb").join("ski_spkisha256.csv")
        );
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: SourceConfig = serde_json::from_str(r#"{"data_dir": "/srv/ccadb"}"#).unwrap();
        assert_eq!(config.capabilities_file, PathBuf::from(CCADB_CSV_FILE));
        assert_eq!(config.ski_spki_file, PathBuf::from(SKI_SPKISHA256_FILE));
    }
}
