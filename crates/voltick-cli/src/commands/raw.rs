use voltick_core::{raw_rows, EnvelopeError, Snapshot, SymbolFilter, ALL_SYMBOLS};

use crate::cli::RawArgs;
use crate::error::CliError;

use super::CommandResult;

pub fn run(args: &RawArgs, snapshot: &Snapshot) -> Result<CommandResult, CliError> {
    let filter = SymbolFilter::parse(args.symbol.as_deref().unwrap_or(ALL_SYMBOLS))?;
    let rows = raw_rows(snapshot.observations(), &filter);
    let data = serde_json::to_value(&rows)?;

    let result = CommandResult::ok(data);
    match &filter {
        SymbolFilter::Only(symbol) if rows.is_empty() => Ok(result.with_error(
            EnvelopeError::new("no_data", format!("feed has no rows for symbol {symbol}"))?,
        )),
        _ => Ok(result),
    }
}
