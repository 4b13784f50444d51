//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;
pub mod password;

use std::path::PathBuf;

use clap::Parser;

use crate::config::{default_vault_path, Settings};
use crate::errors::Result;
use crate::vault::VaultEngine;

use self::password::TerminalPassword;

/// vaulta CLI: encrypted password vault.
#[derive(Parser)]
#[command(
    name = "vaulta",
    about = "Encrypted password vault unlocked by a single master password",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the vault file (default: per-user data directory)
    #[arg(long, global = true, env = "VAULTA_VAULT_PATH")]
    pub vault: Option<PathBuf>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Initialize a new vault
    Init {
        /// Replace an existing vault (destroys its entries)
        #[arg(long)]
        force: bool,
    },

    /// Add an entry
    Add {
        /// Unique entry name (e.g. github)
        name: String,
        /// Username for the entry (prompted if omitted)
        #[arg(short, long)]
        username: Option<String>,
        /// Free-form notes
        #[arg(short, long)]
        notes: Option<String>,
    },

    /// List all entries (passwords hidden)
    List,

    /// Show an entry, including its password
    Get {
        /// Entry name
        name: String,
    },

    /// Delete an entry
    Delete {
        /// Entry name
        name: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Change the vault's master password
    RotateKey,

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Resolve the vault path from `--vault` / `VAULTA_VAULT_PATH`, falling
/// back to the per-user default.
pub fn vault_path(cli: &Cli) -> Result<PathBuf> {
    match &cli.vault {
        Some(path) => Ok(path.clone()),
        None => default_vault_path(),
    }
}

/// Build an engine for the vault at `path`, wired to the terminal and
/// configured from the vault directory's `vaulta.toml`.
pub fn engine_for(path: &std::path::Path) -> Result<VaultEngine<TerminalPassword>> {
    let settings = Settings::for_vault(path)?;
    let source = TerminalPassword::new(settings.min_password_length);
    Ok(VaultEngine::new(source).with_kdf_params(settings.kdf_params()))
}
