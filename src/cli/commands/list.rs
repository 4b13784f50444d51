//! `vaulta list` — display all entries in a table.

use crate::cli::output;
use crate::cli::{engine_for, vault_path, Cli};
use crate::errors::Result;

/// Execute the `list` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let path = vault_path(cli)?;
    let mut engine = engine_for(&path)?;

    let entries = engine.list_entries(&path)?;

    let noun = if entries.len() == 1 { "entry" } else { "entries" };
    output::info(&format!("{} {noun}", entries.len()));
    output::print_entries_table(&entries);

    Ok(())
}
