//! `vaulta init` — create a new, empty vault.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::password::prompt_error;
use crate::cli::{engine_for, vault_path, Cli};
use crate::errors::{Result, VaultaError};

/// Execute the `init` command.
pub fn execute(cli: &Cli, force: bool) -> Result<()> {
    let path = vault_path(cli)?;

    if path.exists() {
        if !force {
            output::tip("Use `vaulta add` to add entries to the existing vault.");
            return Err(VaultaError::VaultAlreadyExists(path));
        }

        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Replace the vault at {}? All of its entries will be lost",
                path.display()
            ))
            .default(false)
            .interact()
            .map_err(prompt_error)?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    let mut engine = engine_for(&path)?;
    engine.initialize(&path, force)?;

    output::success(&format!("Vault created at {}", path.display()));
    output::tip("Run `vaulta add <NAME>` to add an entry.");
    output::tip("Run `vaulta list` to see all entries.");

    Ok(())
}
