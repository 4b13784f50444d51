//! `vaulta delete` — remove an entry from the vault.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::password::prompt_error;
use crate::cli::{engine_for, vault_path, Cli};
use crate::errors::Result;

/// Execute the `delete` command.
pub fn execute(cli: &Cli, name: &str, force: bool) -> Result<()> {
    let path = vault_path(cli)?;

    // Unless --force is set, ask for confirmation before deleting.
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete entry '{name}'?"))
            .default(false)
            .interact()
            .map_err(prompt_error)?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    let mut engine = engine_for(&path)?;
    engine.delete_entry(&path, name)?;

    output::success(&format!("Deleted entry '{name}'"));

    Ok(())
}
