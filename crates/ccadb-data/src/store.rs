/*!
# CCADB Store

The immutable, fully-built set of indexes. Construct it once at startup and
share it (by reference or `Arc`) with every consumer; lookups take `&self`
and need no synchronization.
*/

use crate::config::SourceConfig;
use crate::index::{FingerprintIndex, IssuerCapabilities, IssuerCapabilityIndex, SpkiHashIndex};
use crate::ingest::{ingest_capabilities, ingest_ski_spki, TableSummary};
use crate::record::{CapabilityRecord, Fingerprint, SpkiHash};
use crate::report::IngestReporter;
use crate::source::CsvSource;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub capabilities: TableSummary,
    pub ski_spki: TableSummary,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CcadbStore {
    certificates: FingerprintIndex,
    issuers: IssuerCapabilityIndex,
    issuer_spki: SpkiHashIndex,
    summary: LoadSummary,
}

impl CcadbStore {
    /// Ingest both tables. Never fails: a table that cannot be ingested
    /// leaves its indexes empty and is reported through `reporter`.
    pub fn load(
        capabilities: &CsvSource,
        ski_spki: &CsvSource,
        reporter: &dyn IngestReporter,
    ) -> Self {
        let (capability_indexes, capabilities_summary) =
            ingest_capabilities(capabilities, reporter);
        let (issuer_spki, ski_spki_summary) = ingest_ski_spki(ski_spki, reporter);

        Self {
            certificates: capability_indexes.certificates,
            issuers: capability_indexes.issuers,
            issuer_spki,
            summary: LoadSummary {
                capabilities: capabilities_summary,
                ski_spki: ski_spki_summary,
            },
        }
    }

    pub fn from_config(config: &SourceConfig, reporter: &dyn IngestReporter) -> Self {
        Self::load(
            &config.capabilities_source(),
            &config.ski_spki_source(),
            reporter,
        )
    }

    /// Capabilities of the CA certificate with this SHA-256 fingerprint.
    pub fn ca_cert_capabilities(&self, fingerprint: &Fingerprint) -> Option<&CapabilityRecord> {
        self.certificates.get(fingerprint)
    }

    /// Merged capabilities of every CA certificate with this key identifier.
    pub fn issuer_capabilities(&self, key_identifier: &str) -> Option<&IssuerCapabilities> {
        self.issuers.get(key_identifier)
    }

    /// SHA-256 of the SPKI belonging to this issuer key identifier.
    pub fn issuer_spki_sha256(&self, key_identifier: &str) -> Option<SpkiHash> {
        self.issuer_spki.get(key_identifier)
    }

    pub fn certificates(&self) -> &FingerprintIndex {
        &self.certificates
    }

    pub fn issuers(&self) -> &IssuerCapabilityIndex {
        &self.issuers
    }

    pub fn issuer_spki(&self) -> &SpkiHashIndex {
        &self.issuer_spki
    }

    pub fn summary(&self) -> &LoadSummary {
        &self.summary
    }
}
