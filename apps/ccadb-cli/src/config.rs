use crate::error::{CliError, CliResult};
use ccadb_data::SourceConfig;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Optional YAML configuration file structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where the CSV tables live
    #[serde(default)]
    pub sources: SourceConfig,

    /// Log output format
    #[serde(default)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Structured JSON lines
    #[default]
    Json,
    /// Human-readable text
    Pretty,
}

/// Command-line values that take precedence over the file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub data_dir: Option<PathBuf>,
    pub capabilities_csv: Option<PathBuf>,
    pub ski_spki_csv: Option<PathBuf>,
    pub log_format: Option<LogFormat>,
}

impl AppConfig {
    pub fn from_yaml_file(path: &Path) -> CliResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            CliError::InvalidConfig(format!("Failed to read '{}': {}", path.display(), e))
        })?;
        Ok(serde_yaml::from_str(&contents)?)
    }

    /// File values (when a file is given) with command-line overrides applied.
    pub fn load(path: Option<&Path>, overrides: Overrides) -> CliResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };

        if let Some(data_dir) = overrides.data_dir {
            config.sources.data_dir = data_dir;
        }
        if let Some(capabilities_csv) = overrides.capabilities_csv {
            config.sources.capabilities_file = capabilities_csv;
        }
        if let Some(ski_spki_csv) = overrides.ski_spki_csv {
            config.sources.ski_spki_file = ski_spki_csv;
        }
        if let Some(log_format) = overrides.log_format {
            config.log_format = log_format;
        }

        Ok(config)
    }
}
