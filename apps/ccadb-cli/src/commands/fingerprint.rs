use super::not_found;
use crate::error::CliResult;
use ccadb_data::{CapabilityRecord, CcadbStore, Fingerprint};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct CertificateOutput<'a> {
    fingerprint: Fingerprint,
    #[serde(flatten)]
    capabilities: &'a CapabilityRecord,
}

pub fn render(store: &CcadbStore, fingerprint: &str) -> CliResult<String> {
    let fingerprint: Fingerprint = fingerprint.trim().parse()?;

    match store.ca_cert_capabilities(&fingerprint) {
        Some(capabilities) => Ok(serde_json::to_string_pretty(&CertificateOutput {
            fingerprint,
            capabilities,
        })?),
        None => Ok(not_found("CA certificate", &fingerprint.to_string())),
    }
}

pub fn execute(store: &CcadbStore, fingerprint: String) -> CliResult<()> {
    println!("{}", render(store, &fingerprint)?);
    Ok(())
}
