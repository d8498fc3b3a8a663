use std::collections::BTreeSet;

use voltick_core::{Snapshot, SnapshotStore};

use crate::error::CliError;

use super::CommandResult;

pub async fn run(store: &SnapshotStore, snapshot: &Snapshot) -> Result<CommandResult, CliError> {
    let table = store.summaries(snapshot).await;

    let symbols: BTreeSet<_> = snapshot
        .observations()
        .iter()
        .map(|observation| &observation.symbol)
        .collect();
    let undated = symbols.len().saturating_sub(table.len());

    let data = serde_json::to_value(table.values().collect::<Vec<_>>())?;
    let mut result = CommandResult::ok(data);
    if undated > 0 {
        result = result.with_warning(format!(
            "{undated} symbols have no valid date and are not summarized"
        ));
    }
    Ok(result)
}
