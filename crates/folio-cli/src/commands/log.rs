//! Change log command handler

use anyhow::Result;

use folio_core::ContentStore;

use crate::output::Output;

/// Show the most recent change records
pub fn show(store: &ContentStore, limit: usize, output: &Output) -> Result<()> {
    let records = store.changelog();
    let shown = &records[..records.len().min(limit)];
    output.print_records(shown);
    Ok(())
}
