use crate::error::CliResult;
use ccadb_data::CcadbStore;

pub fn render(store: &CcadbStore) -> CliResult<String> {
    Ok(serde_json::to_string_pretty(store.summary())?)
}

pub fn execute(store: &CcadbStore) -> CliResult<()> {
    println!("{}", render(store)?);
    Ok(())
}
