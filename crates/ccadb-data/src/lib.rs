/*!
# CCADB Capability Data

Indexed, read-only views over the periodically published CCADB export, for
certificate validation and profiling tools.

## Inputs

### Capability table (`AllCertificateRecordsCSVFormatv4`)
One row per CA certificate. The header must name these columns, in any order:
- `SHA-256 Fingerprint`: hex
- `Subject Key Identifier`: used verbatim as the issuer key
- `Certificate Record Type`: `Root Certificate`, `Intermediate Certificate`, ...
- `TLS Capable`, `TLS EV Capable`, `S/MIME Capable`, `Code Signing Capable`:
  `True` is true, anything else is false

### SKI → SPKI table (`ski_spkisha256.csv`)
Two positional columns after a header row: issuer key identifier, and the
standard Base64 encoding of SHA-256(SubjectPublicKeyInfo).

## Indexes

- by certificate fingerprint: the capabilities of that certificate
- by issuer key identifier: the union of the capabilities of every
  certificate under that key, `Root Certificate` winning the record type
- by issuer key identifier: the SPKI SHA-256

## Usage

```rust,no_run
use ccadb_data::{CcadbStore, Fingerprint, SourceConfig, TracingReporter};

let store = CcadbStore::from_config(&SourceConfig::with_data_dir("data"), &TracingReporter);

let fingerprint: Fingerprint = "0123456789ABCDEF0123456789ABCDEF0123456789ABCDEF0123456789ABCDEF"
    .parse()
    .unwrap();
if let Some(capabilities) = store.ca_cert_capabilities(&fingerprint) {
    println!("TLS capable: {}", capabilities.tls_capable);
}
if let Some(issuer) = store.issuer_capabilities("xJnE4b1dPzb7C7bXTgtBGd6iqXE=") {
    println!("{} ({} certificates)", issuer.record_type, issuer.certificate_count());
}
```
*/

pub mod config;
pub mod errors;
pub mod index;
pub mod ingest;
pub mod parser;
pub mod record;
pub mod report;
pub mod schema;
pub mod source;
pub mod store;

// Re-export main types for convenience
pub use config::SourceConfig;
pub use errors::{IngestError, IngestResult, RecordError, SchemaError, Severity};
pub use index::{FingerprintIndex, IssuerCapabilities, IssuerCapabilityIndex, SpkiHashIndex};
pub use ingest::{ingest_capabilities, ingest_ski_spki, TableSummary};
pub use record::{CapabilityRecord, Fingerprint, RecordType, SpkiHash};
pub use report::{
    IngestEvent, IngestReporter, MemoryReporter, NullReporter, ReportedEvent, TableKind,
    TracingReporter,
};
pub use source::CsvSource;
pub use store::{CcadbStore, LoadSummary};
