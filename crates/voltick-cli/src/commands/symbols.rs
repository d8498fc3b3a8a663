use voltick_core::{symbol_options, Snapshot};

use crate::error::CliError;

use super::CommandResult;

pub fn run(snapshot: &Snapshot) -> Result<CommandResult, CliError> {
    let options = symbol_options(snapshot.observations());
    Ok(CommandResult::ok(serde_json::to_value(options)?))
}
