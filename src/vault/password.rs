//! The password-source capability the vault engine is driven by.
//!
//! The engine never touches a terminal.  It asks a `PasswordSource` for
//! the master password at the point it needs one; the CLI supplies an
//! interactive implementation and tests supply `FixedPassword`.

use zeroize::Zeroizing;

use crate::errors::Result;

/// Supplies master passwords on demand.
///
/// Returning `Err(VaultaError::UserCancelled)` aborts the current
/// operation before the vault file is touched.
pub trait PasswordSource {
    /// Password for unlocking an existing vault.
    fn master_password(&mut self) -> Result<Zeroizing<Vec<u8>>>;

    /// Password for a new vault or a password change.
    ///
    /// Interactive sources should ask for confirmation here.
    fn new_master_password(&mut self) -> Result<Zeroizing<Vec<u8>>> {
        self.master_password()
    }
}

impl<S: PasswordSource + ?Sized> PasswordSource for &mut S {
    fn master_password(&mut self) -> Result<Zeroizing<Vec<u8>>> {
        (**self).master_password()
    }

    fn new_master_password(&mut self) -> Result<Zeroizing<Vec<u8>>> {
        (**self).new_master_password()
    }
}

/// A source that always answers with the same bytes.
///
/// Used by tests and by non-interactive callers that already hold the
/// password.
pub struct FixedPassword {
    current: Zeroizing<Vec<u8>>,
    replacement: Option<Zeroizing<Vec<u8>>>,
}

impl FixedPassword {
    pub fn new(password: impl AsRef<[u8]>) -> Self {
        Self {
            current: Zeroizing::new(password.as_ref().to_vec()),
            replacement: None,
        }
    }

    /// Answer `new_master_password` with a different password.
    pub fn with_new_password(mut self, password: impl AsRef<[u8]>) -> Self {
        self.replacement = Some(Zeroizing::new(password.as_ref().to_vec()));
        self
    }
}

impl PasswordSource for FixedPassword {
    fn master_password(&mut self) -> Result<Zeroizing<Vec<u8>>> {
        Ok(self.current.clone())
    }

    fn new_master_password(&mut self) -> Result<Zeroizing<Vec<u8>>> {
        Ok(self
            .replacement
            .clone()
            .unwrap_or_else(|| self.current.clone()))
    }
}
