use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use ccadb_data::{
    CcadbStore, Fingerprint, MemoryReporter, RecordType, Severity, SourceConfig, SpkiHash,
    TableKind,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const CAPABILITIES_HEADER: &str = "CA Owner,Certificate Record Type,SHA-256 Fingerprint,Subject Key Identifier,TLS Capable,TLS EV Capable,Code Signing Capable,S/MIME Capable";

fn fingerprint_hex(last: u8) -> String {
    let mut bytes = [0u8; 32];
    bytes[0] = 0xAA;
    bytes[31] = last;
    hex::encode_upper(bytes)
}

fn fingerprint(last: u8) -> Fingerprint {
    fingerprint_hex(last).parse().unwrap()
}

/// Row in CAPABILITIES_HEADER column order.
fn capability_row(
    record_type: &str,
    fp: &str,
    ski: &str,
    tls: &str,
    tls_ev: &str,
    code_signing: &str,
    smime: &str,
) -> String {
    format!(
        "\"Example CA, Inc.\",{},{},{},{},{},{},{}",
        record_type, fp, ski, tls, tls_ev, code_signing, smime
    )
}

fn write_tables(dir: &Path, capabilities: &str, ski_spki: &str) -> SourceConfig {
    fs::write(dir.join("AllCertificateRecordsCSVFormatv4"), capabilities).unwrap();
    fs::write(dir.join("ski_spkisha256.csv"), ski_spki).unwrap();
    SourceConfig::with_data_dir(dir)
}

fn sample_capabilities() -> String {
    [
        CAPABILITIES_HEADER.to_string(),
        capability_row(
            "Intermediate Certificate",
            &fingerprint_hex(1),
            "K1",
            "True",
            "False",
            "False",
            "False",
        ),
        capability_row(
            "Root Certificate",
            &fingerprint_hex(2),
            "K1",
            "False",
            "False",
            "False",
            "True",
        ),
        capability_row(
            "Intermediate Certificate",
            "ZZ-not-hex",
            "K2",
            "True",
            "True",
            "True",
            "True",
        ),
        capability_row(
            "Intermediate Certificate",
            &fingerprint_hex(3),
            "K2",
            "False",
            "True",
            "False",
            "False",
        ),
    ]
    .join("\n")
        + "\n"
}

fn sample_ski_spki() -> String {
    format!(
        "Subject Key Identifier,SPKI SHA-256\nK1,{}\nK2,{}\n",
        STANDARD.encode([0x11u8; 32]),
        STANDARD.encode([0x22u8; 16]),
    )
}

#[test]
fn test_full_load_from_data_dir() {
    let dir = TempDir::new().unwrap();
    let config = write_tables(dir.path(), &sample_capabilities(), &sample_ski_spki());
    let reporter = MemoryReporter::new();

    let store = CcadbStore::from_config(&config, &reporter);

    // Per-certificate entries match their rows exactly.
    let first = store.ca_cert_capabilities(&fingerprint(1)).unwrap();
    assert_eq!(first.record_type, RecordType::Intermediate);
    assert!(first.tls_capable);
    assert!(!first.smime_capable);

    let second = store.ca_cert_capabilities(&fingerprint(2)).unwrap();
    assert_eq!(second.record_type, RecordType::Root);
    assert!(!second.tls_capable);
    assert!(second.smime_capable);

    // The invalid fingerprint row did not block the row after it.
    assert!(store.ca_cert_capabilities(&fingerprint(3)).is_some());
    assert_eq!(store.certificates().len(), 3);

    // Issuer K1 merges into {Root, tls, smime}.
    let k1 = store.issuer_capabilities("K1").unwrap();
    assert_eq!(k1.record_type, RecordType::Root);
    assert!(k1.tls_capable);
    assert!(k1.smime_capable);
    assert!(!k1.tls_ev_capable);
    assert!(!k1.code_signing_capable);
    assert_eq!(k1.certificate_count(), 2);

    // The skipped row contributed nothing to K2.
    let k2 = store.issuer_capabilities("K2").unwrap();
    assert_eq!(k2.certificate_count(), 1);
    assert!(!k2.tls_capable);
    assert!(k2.tls_ev_capable);

    // SPKI: K1 is present, K2's 16-byte hash was rejected.
    assert_eq!(
        store.issuer_spki_sha256("K1"),
        Some(SpkiHash::new([0x11u8; 32]))
    );
    assert_eq!(store.issuer_spki_sha256("K2"), None);

    let summary = store.summary();
    assert_eq!(summary.capabilities.rows_read, 4);
    assert_eq!(summary.capabilities.rows_skipped, 1);
    assert_eq!(summary.ski_spki.rows_indexed, 1);
    assert_eq!(summary.ski_spki.rows_skipped, 1);

    assert!(reporter.at_least(Severity::Error).is_empty());
    assert_eq!(reporter.at_least(Severity::Warn).len(), 2);
}

#[test]
fn test_root_wins_regardless_of_order() {
    let dir = TempDir::new().unwrap();
    let capabilities = [
        CAPABILITIES_HEADER.to_string(),
        capability_row(
            "Root Certificate",
            &fingerprint_hex(1),
            "K",
            "False",
            "False",
            "False",
            "False",
        ),
        capability_row(
            "Intermediate Certificate",
            &fingerprint_hex(2),
            "K",
            "False",
            "False",
            "True",
            "False",
        ),
    ]
    .join("\n");
    let config = write_tables(dir.path(), &capabilities, &sample_ski_spki());

    let store = CcadbStore::from_config(&config, &MemoryReporter::new());
    let issuer = store.issuer_capabilities("K").unwrap();

    assert_eq!(issuer.record_type, RecordType::Root);
    assert!(issuer.code_signing_capable);
}

#[test]
fn test_missing_required_header_leaves_index_empty() {
    let dir = TempDir::new().unwrap();
    let capabilities = format!(
        "SHA-256 Fingerprint,Subject Key Identifier,Certificate Record Type,TLS Capable,TLS EV Capable,S/MIME Capable\n{},K1,Root Certificate,True,True,True\n",
        fingerprint_hex(1)
    );
    let config = write_tables(dir.path(), &capabilities, &sample_ski_spki());
    let reporter = MemoryReporter::new();

    let store = CcadbStore::from_config(&config, &reporter);

    assert!(store.certificates().is_empty());
    assert!(store.issuers().is_empty());
    assert!(store.summary().capabilities.is_aborted());
    // The other table is unaffected.
    assert!(store.issuer_spki_sha256("K1").is_some());

    let errors = reporter.at_least(Severity::Error);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].table, TableKind::Capabilities);
}

#[test]
fn test_empty_files_leave_indexes_empty() {
    let dir = TempDir::new().unwrap();
    let config = write_tables(dir.path(), "", "");
    let reporter = MemoryReporter::new();

    let store = CcadbStore::from_config(&config, &reporter);

    assert!(store.certificates().is_empty());
    assert!(store.issuers().is_empty());
    assert!(store.issuer_spki().is_empty());
    assert_eq!(reporter.at_least(Severity::Error).len(), 2);
}

#[test]
fn test_missing_files_are_informational() {
    let dir = TempDir::new().unwrap();
    let reporter = MemoryReporter::new();

    let store = CcadbStore::from_config(&SourceConfig::with_data_dir(dir.path()), &reporter);

    assert!(store.certificates().is_empty());
    assert!(store.issuer_spki().is_empty());
    assert!(reporter.at_least(Severity::Warn).is_empty());
    assert_eq!(reporter.events().len(), 2);
    assert!(store.summary().capabilities.is_aborted());
    assert!(store.summary().ski_spki.is_aborted());
}

#[test]
fn test_duplicate_fingerprint_last_row_wins() {
    let dir = TempDir::new().unwrap();
    let capabilities = [
        CAPABILITIES_HEADER.to_string(),
        capability_row(
            "Intermediate Certificate",
            &fingerprint_hex(7),
            "K1",
            "True",
            "True",
            "False",
            "False",
        ),
        capability_row(
            "Intermediate Certificate",
            &fingerprint_hex(7),
            "K1",
            "False",
            "False",
            "False",
            "False",
        ),
    ]
    .join("\n");
    let config = write_tables(dir.path(), &capabilities, &sample_ski_spki());

    let store = CcadbStore::from_config(&config, &MemoryReporter::new());

    let record = store.ca_cert_capabilities(&fingerprint(7)).unwrap();
    assert!(!record.tls_capable);
    assert!(!record.tls_ev_capable);
    // The issuer view still remembers the earlier assertion.
    assert!(store.issuer_capabilities("K1").unwrap().tls_ev_capable);
}

#[test]
fn test_reingest_is_deterministic() {
    let dir = TempDir::new().unwrap();
    let config = write_tables(dir.path(), &sample_capabilities(), &sample_ski_spki());

    let first = CcadbStore::from_config(&config, &MemoryReporter::new());
    let second = CcadbStore::from_config(&config, &MemoryReporter::new());

    assert_eq!(first, second);
}

#[test]
fn test_latin1_owner_name_does_not_abort_table() {
    let dir = TempDir::new().unwrap();
    let config = write_tables(dir.path(), "", &sample_ski_spki());
    let mut capabilities = sample_capabilities().into_bytes();
    capabilities.extend_from_slice(b"Soci\xe9t\xe9 G\xe9n\xe9rale,Root Certificate,");
    capabilities.extend_from_slice(
        format!("{},K3,True,False,False,False\n", fingerprint_hex(4)).as_bytes(),
    );
    fs::write(config.capabilities_path(), capabilities).unwrap();
    let reporter = MemoryReporter::new();

    let store = CcadbStore::from_config(&config, &reporter);

    assert!(!store.summary().capabilities.is_aborted());
    assert_eq!(store.certificates().len(), 4);
    assert_eq!(
        store.ca_cert_capabilities(&fingerprint(4)).unwrap().record_type,
        RecordType::Root
    );
    assert!(reporter.at_least(Severity::Error).is_empty());
}

#[test]
fn test_unterminated_quote_in_ski_spki_aborts_only_that_table() {
    let dir = TempDir::new().unwrap();
    let ski_spki = format!(
        "Subject Key Identifier,SPKI SHA-256\nK1,{h}\nK2,\"{h}\nK3,{h}\n",
        h = STANDARD.encode([0x33u8; 32])
    );
    let config = write_tables(dir.path(), &sample_capabilities(), &ski_spki);
    let reporter = MemoryReporter::new();

    let store = CcadbStore::from_config(&config, &reporter);

    assert!(store.issuer_spki().is_empty());
    assert!(store.summary().ski_spki.is_aborted());
    assert!(!store.summary().capabilities.is_aborted());
    assert_eq!(store.certificates().len(), 3);

    let errors = reporter.at_least(Severity::Error);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].table, TableKind::SkiSpki);
}
