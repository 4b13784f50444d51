//! `vaulta completions` — generate shell completion scripts.
//!
//! Usage:
//!   vaulta completions bash > ~/.local/share/bash-completion/completions/vaulta
//!   vaulta completions zsh > ~/.zfunc/_vaulta

use std::io;

use clap::CommandFactory;
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::errors::Result;

/// Execute the `completions` command.
pub fn execute(shell: Shell) -> Result<()> {
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
    Ok(())
}
