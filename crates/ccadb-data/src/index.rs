/*!
# Indexes

The three lookup structures built during ingestion:

- [`FingerprintIndex`]: one record per certificate, last row wins
- [`IssuerCapabilityIndex`]: one merged record per issuer key identifier
- [`SpkiHashIndex`]: issuer key identifier → SPKI SHA-256, last row wins

Key identifiers are used verbatim as they appear in the CSV.
Insertion is crate-private; once a store is built the indexes are read-only.
*/

use crate::record::{CapabilityRecord, Fingerprint, SpkiHash};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FingerprintIndex {
    entries: HashMap<Fingerprint, CapabilityRecord>,
}

impl FingerprintIndex {
    /// Returns the record that was replaced, if any.
    pub(crate) fn insert(
        &mut self,
        fingerprint: Fingerprint,
        record: CapabilityRecord,
    ) -> Option<CapabilityRecord> {
        self.entries.insert(fingerprint, record)
    }

    pub fn get(&self, fingerprint: &Fingerprint) -> Option<&CapabilityRecord> {
        self.entries.get(fingerprint)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Fingerprint, &CapabilityRecord)> {
        self.entries.iter()
    }
}

/// Union of the capabilities asserted by every certificate under one issuer
/// key identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssuerCapabilities {
    #[serde(flatten)]
    capabilities: CapabilityRecord,
    certificate_count: usize,
}

impl IssuerCapabilities {
    fn seed(record: CapabilityRecord) -> Self {
        Self {
            capabilities: record,
            certificate_count: 1,
        }
    }

    fn fold(&mut self, record: &CapabilityRecord) {
        self.capabilities.absorb(record);
        self.certificate_count += 1;
    }

    pub fn capabilities(&self) -> &CapabilityRecord {
        &self.capabilities
    }

    /// Number of certificate rows merged into this entry.
    pub fn certificate_count(&self) -> usize {
        self.certificate_count
    }
}

impl std::ops::Deref for IssuerCapabilities {
    type Target = CapabilityRecord;

    fn deref(&self) -> &Self::Target {
        &self.capabilities
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssuerCapabilityIndex {
    entries: HashMap<String, IssuerCapabilities>,
}

impl IssuerCapabilityIndex {
    /// Seed the entry for `key_identifier` with `record`, or fold `record`
    /// into the existing entry.
    pub(crate) fn merge(&mut self, key_identifier: &str, record: &CapabilityRecord) {
        match self.entries.get_mut(key_identifier) {
            Some(existing) => existing.fold(record),
            None => {
                self.entries.insert(
                    key_identifier.to_string(),
                    IssuerCapabilities::seed(record.clone()),
                );
            }
        }
    }

    pub fn get(&self, key_identifier: &str) -> Option<&IssuerCapabilities> {
        self.entries.get(key_identifier)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &IssuerCapabilities)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpkiHashIndex {
    entries: HashMap<String, SpkiHash>,
}

impl SpkiHashIndex {
    pub(crate) fn insert(&mut self, key_identifier: String, hash: SpkiHash) -> Option<SpkiHash> {
        self.entries.insert(key_identifier, hash)
    }

    pub fn get(&self, key_identifier: &str) -> Option<SpkiHash> {
        self.entries.get(key_identifier).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SpkiHash)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}
