//! Terminal-backed password source.

use std::io;

use zeroize::Zeroizing;

use crate::cli::output;
use crate::errors::{Result, VaultaError};
use crate::vault::PasswordSource;

/// Environment variable read before prompting (scripts, CI).
pub const PASSWORD_ENV: &str = "VAULTA_PASSWORD";

/// Gets the master password, trying in order:
/// 1. `VAULTA_PASSWORD` env var
/// 2. Interactive prompt on the terminal
pub struct TerminalPassword {
    min_len: usize,
}

impl TerminalPassword {
    pub fn new(min_len: usize) -> Self {
        Self { min_len }
    }

    fn check_length(&self, password: &str) -> Result<()> {
        if password.chars().count() < self.min_len {
            return Err(VaultaError::CommandFailed(format!(
                "password must be at least {} characters",
                self.min_len
            )));
        }
        Ok(())
    }
}

impl PasswordSource for TerminalPassword {
    fn master_password(&mut self) -> Result<Zeroizing<Vec<u8>>> {
        if let Some(pw) = from_env() {
            return Ok(pw);
        }

        let pw = dialoguer::Password::new()
            .with_prompt("Enter master password")
            .interact()
            .map_err(prompt_error)?;
        Ok(into_bytes(pw))
    }

    /// Prompt for a new password with confirmation.
    ///
    /// Also respects `VAULTA_PASSWORD` for scripted usage and enforces
    /// the configured minimum length.
    fn new_master_password(&mut self) -> Result<Zeroizing<Vec<u8>>> {
        if let Some(pw) = from_env() {
            let text = String::from_utf8_lossy(&pw);
            self.check_length(&text)?;
            return Ok(pw);
        }

        loop {
            let password = Zeroizing::new(
                dialoguer::Password::new()
                    .with_prompt("Choose a master password")
                    .with_confirmation(
                        "Confirm master password",
                        "Passwords do not match, try again",
                    )
                    .interact()
                    .map_err(prompt_error)?,
            );

            if let Err(e) = self.check_length(&password) {
                output::warning(&format!("{e}. Try again."));
                continue;
            }

            return Ok(Zeroizing::new(password.as_bytes().to_vec()));
        }
    }
}

fn from_env() -> Option<Zeroizing<Vec<u8>>> {
    match std::env::var(PASSWORD_ENV) {
        Ok(pw) if !pw.is_empty() => Some(into_bytes(pw)),
        _ => None,
    }
}

/// Move a prompted string into a wiping byte buffer without copying.
fn into_bytes(password: String) -> Zeroizing<Vec<u8>> {
    Zeroizing::new(password.into_bytes())
}

/// Map a prompt failure; Ctrl-C and closed input count as cancellation.
pub(crate) fn prompt_error(e: dialoguer::Error) -> VaultaError {
    match e {
        dialoguer::Error::IO(io_err)
            if matches!(
                io_err.kind(),
                io::ErrorKind::Interrupted | io::ErrorKind::UnexpectedEof
            ) =>
        {
            VaultaError::UserCancelled
        }
        other => VaultaError::CommandFailed(format!("prompt: {other}")),
    }
}
