//! `vaulta add` — add a credential entry to the vault.

use std::io::{self, IsTerminal, Read};

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::password::prompt_error;
use crate::cli::{engine_for, vault_path, Cli};
use crate::errors::Result;
use crate::vault::entry::validate_entry_name;
use crate::vault::Entry;

/// Execute the `add` command.
pub fn execute(cli: &Cli, name: &str, username: Option<&str>, notes: Option<&str>) -> Result<()> {
    validate_entry_name(name)?;
    let path = vault_path(cli)?;
    let interactive = io::stdin().is_terminal();

    // Gather every field before touching the vault, so a cancelled
    // prompt leaves it as it was.
    let username = match username {
        Some(u) => u.to_string(),
        None if interactive => dialoguer::Input::<String>::new()
            .with_prompt("Username")
            .allow_empty(true)
            .interact_text()
            .map_err(prompt_error)?,
        None => String::new(),
    };

    let password = if interactive {
        Zeroizing::new(
            dialoguer::Password::new()
                .with_prompt(format!("Password for {name}"))
                .interact()
                .map_err(prompt_error)?,
        )
    } else {
        // Piped input (stdin is not a terminal).
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        let trimmed_len = buf.trim_end_matches(['\r', '\n']).len();
        buf.truncate(trimmed_len);
        buf
    };

    let entry = Entry::new(
        name,
        username,
        password.as_str(),
        notes.unwrap_or_default(),
    );
    drop(password);

    let mut engine = engine_for(&path)?;
    engine.add_entry(&path, entry)?;

    output::success(&format!("Entry '{name}' added"));
    output::tip("Run `vaulta get <NAME>` to show it.");

    Ok(())
}
