//! `vaulta rotate-key` — change the vault master password.
//!
//! Decrypts all entries with the current password, generates a new salt,
//! derives a new key from the new password, re-encrypts, and writes the
//! vault atomically.

use crate::cli::output;
use crate::cli::{engine_for, vault_path, Cli};
use crate::errors::Result;

/// Execute the `rotate-key` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let path = vault_path(cli)?;
    let mut engine = engine_for(&path)?;

    output::info("Enter your current master password, then choose a new one.");
    let count = engine.rotate_password(&path)?;

    output::success(&format!(
        "Master password changed ({count} entries re-encrypted)"
    ));

    Ok(())
}
