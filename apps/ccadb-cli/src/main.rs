use ccadb_data::{CcadbStore, TracingReporter};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;
mod error;
mod logging;

use config::{AppConfig, LogFormat, Overrides};
use error::CliResult;

#[derive(Parser)]
#[command(name = "ccadb")]
#[command(about = "CCADB capability lookups - CA certificate, issuer and SPKI indexes")]
#[command(version)]
struct Cli {
    /// YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the CSV tables
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Capability table (relative paths resolve against the data directory)
    #[arg(long, global = true)]
    capabilities_csv: Option<PathBuf>,

    /// Key identifier -> SPKI SHA-256 table
    #[arg(long, global = true)]
    ski_spki_csv: Option<PathBuf>,

    /// Log output format
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up a CA certificate by SHA-256 fingerprint
    Fingerprint {
        /// Fingerprint (hex string)
        fingerprint: String,
    },

    /// Look up the merged capabilities of an issuer key identifier
    Issuer {
        /// Key identifier, exactly as published
        key_identifier: String,
    },

    /// Look up the SPKI SHA-256 of an issuer key identifier
    IssuerSpki {
        /// Key identifier, exactly as published
        key_identifier: String,
    },

    /// Show what was ingested from each table
    Summary,
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(
        cli.config.as_deref(),
        Overrides {
            data_dir: cli.data_dir,
            capabilities_csv: cli.capabilities_csv,
            ski_spki_csv: cli.ski_spki_csv,
            log_format: cli.log_format,
        },
    )?;

    logging::init(config.log_format)?;
    tracing::debug!(
        capabilities = %config.sources.capabilities_path().display(),
        ski_spki = %config.sources.ski_spki_path().display(),
        "loading CCADB tables"
    );

    let store = CcadbStore::from_config(&config.sources, &TracingReporter);

    match cli.command {
        Commands::Fingerprint { fingerprint } => {
            commands::fingerprint::execute(&store, fingerprint)
        }

        Commands::Issuer { key_identifier } => commands::issuer::execute(&store, key_identifier),

        Commands::IssuerSpki { key_identifier } => {
            commands::issuer_spki::execute(&store, key_identifier)
        }

        Commands::Summary => commands::summary::execute(&store),
    }
}
