use thiserror::Error;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid fingerprint: {0}")]
    InvalidFingerprint(#[from] ccadb_data::RecordError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Logger could not be initialized: {0}")]
    Logging(String),
}
