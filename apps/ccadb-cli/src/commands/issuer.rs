use super::not_found;
use crate::error::CliResult;
use ccadb_data::{CcadbStore, IssuerCapabilities};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct IssuerOutput<'a> {
    key_identifier: &'a str,
    #[serde(flatten)]
    issuer: &'a IssuerCapabilities,
}

pub fn render(store: &CcadbStore, key_identifier: &str) -> CliResult<String> {
    match store.issuer_capabilities(key_identifier) {
        Some(issuer) => Ok(serde_json::to_string_pretty(&IssuerOutput {
            key_identifier,
            issuer,
        })?),
        None => Ok(not_found("issuer capabilities", key_identifier)),
    }
}

pub fn execute(store: &CcadbStore, key_identifier: String) -> CliResult<()> {
    println!("{}", render(store, &key_identifier)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::store;

    #[test]
    fn test_render_merged_issuer() {
        let output = render(&store(), "K1").unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(json["key_identifier"], "K1");
        assert_eq!(json["record_type"], "Root Certificate");
        assert_eq!(json["tls_capable"], true);
        assert_eq!(json["smime_capable"], true);
        assert_eq!(json["code_signing_capable"], false);
        assert_eq!(json["certificate_count"], 2);
    }

    #[test]
    fn test_render_unknown_issuer() {
        let output = render(&store(), "k1").unwrap();
        assert!(output.contains("No issuer capabilities found for k1"));
    }
}
