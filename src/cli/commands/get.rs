//! `vaulta get` — show a single entry, password included.

use crate::cli::output;
use crate::cli::{engine_for, vault_path, Cli};
use crate::errors::Result;

/// Execute the `get` command.
pub fn execute(cli: &Cli, name: &str) -> Result<()> {
    let path = vault_path(cli)?;
    let mut engine = engine_for(&path)?;

    let entry = engine.get_entry(&path, name)?;
    output::print_entry(&entry);

    Ok(())
}
