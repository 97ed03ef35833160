use super::not_found;
use crate::error::CliResult;
use ccadb_data::{CcadbStore, SpkiHash};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct SpkiOutput<'a> {
    key_identifier: &'a str,
    spki_sha256: SpkiHash,
}

pub fn render(store: &CcadbStore, key_identifier: &str) -> CliResult<String> {
    match store.issuer_spki_sha256(key_identifier) {
        Some(spki_sha256) => Ok(serde_json::to_string_pretty(&SpkiOutput {
            key_identifier,
            spki_sha256,
        })?),
        None => Ok(not_found("SPKI SHA-256", key_identifier)),
    }
}

pub fn execute(store: &CcadbStore, key_identifier: String) -> CliResult<()> {
    println!("{}", render(store, &key_identifier)?);
    Ok(())
}
