pub mod fingerprint;
pub mod issuer;
pub mod issuer_spki;
pub mod summary;

/// Message printed when a lookup key is absent from the store.
pub(crate) fn not_found(what: &str, key: &str) -> String {
    format!("❌ No {} found for {}", what, key)
}
