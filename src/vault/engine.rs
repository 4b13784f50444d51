//! Operation boundary consumed by the CLI.
//!
//! Each method is one complete cycle against the vault file: lock (for
//! mutations), ask the password source, open-decrypt-mutate-encrypt-write,
//! release.  No state survives between calls except the password source
//! and the KDF params used for new keys.

use std::path::Path;

use tracing::info;

use crate::crypto::kdf::{generate_salt, KdfParams};
use crate::crypto::keys::DerivedKey;
use crate::errors::{Result, VaultaError};

use super::entry::{Entry, EntrySummary};
use super::format;
use super::lock::VaultLock;
use super::password::PasswordSource;
use super::store::UnlockedVault;

pub struct VaultEngine<S> {
    source: S,
    kdf_params: KdfParams,
}

impl<S: PasswordSource> VaultEngine<S> {
    /// Engine using the default Argon2id cost for new keys.
    pub fn new(source: S) -> Self {
        Self {
            source,
            kdf_params: KdfParams::default(),
        }
    }

    /// Cost parameters for `initialize` and `rotate_password`.
    ///
    /// Existing vaults are always opened with their stored params.
    pub fn with_kdf_params(mut self, params: KdfParams) -> Self {
        self.kdf_params = params;
        self
    }

    pub fn kdf_params(&self) -> &KdfParams {
        &self.kdf_params
    }

    /// Create a new, empty vault at `path`.
    ///
    /// Refuses to replace an existing vault unless `force` is set.  The
    /// existence check happens before prompting so the user is not asked
    /// for a password that would be thrown away.
    pub fn initialize(&mut self, path: &Path, force: bool) -> Result<()> {
        self.kdf_params.validate()?;
        if !force && path.try_exists()? {
            return Err(VaultaError::VaultAlreadyExists(path.to_path_buf()));
        }

        let _lock = VaultLock::acquire(path)?;
        let salt = generate_salt();
        let key = {
            let password = self.source.new_master_password()?;
            DerivedKey::derive(&password, &salt, &self.kdf_params)?
        };
        UnlockedVault::create_with_key(path, key, &salt, &self.kdf_params, force)?;

        info!(path = %path.display(), force, "vault initialized");
        Ok(())
    }

    /// Open and decrypt the vault at `path`.
    ///
    /// The password buffer is wiped as soon as the key has been derived,
    /// before any decryption happens.
    pub fn unlock(&mut self, path: &Path) -> Result<UnlockedVault> {
        if !path.try_exists()? {
            return Err(VaultaError::VaultNotFound(path.to_path_buf()));
        }

        let file = format::read_vault(path)?;
        let key = {
            let password = self.source.master_password()?;
            DerivedKey::derive(&password, &file.kdf.salt, &file.kdf.params())?
        };
        UnlockedVault::unseal(path, file, key)
    }

    /// Append a new entry.
    pub fn add_entry(&mut self, path: &Path, entry: Entry) -> Result<()> {
        self.mutate(path, |vault| vault.add_entry(entry))
    }

    /// Password-free summaries of every entry, in insertion order.
    pub fn list_entries(&mut self, path: &Path) -> Result<Vec<EntrySummary>> {
        Ok(self.unlock(path)?.summaries())
    }

    /// The full entry with the given name, password included.
    pub fn get_entry(&mut self, path: &Path, name: &str) -> Result<Entry> {
        self.unlock(path)?.get_entry(name).cloned()
    }

    /// Remove the entry with the given name.
    ///
    /// The file is not rewritten when no entry matches.
    pub fn delete_entry(&mut self, path: &Path, name: &str) -> Result<()> {
        self.mutate(path, |vault| vault.delete_entry(name))
    }

    /// Change the master password.
    ///
    /// Unlocks with the current password, then re-encrypts every entry
    /// under a key derived from the new password and a new salt.
    pub fn rotate_password(&mut self, path: &Path) -> Result<usize> {
        let params = self.kdf_params;
        let mut count = 0;
        self.mutate_with_source(path, |vault, source| {
            {
                let new_password = source.new_master_password()?;
                vault.rekey(&new_password, &params)?;
            }
            count = vault.entry_count();
            Ok(())
        })?;

        info!(path = %path.display(), entries = count, "master password rotated");
        Ok(count)
    }

    /// Locked read-modify-write.  Nothing is written if `f` fails.
    fn mutate<F>(&mut self, path: &Path, f: F) -> Result<()>
    where
        F: FnOnce(&mut UnlockedVault) -> Result<()>,
    {
        self.mutate_with_source(path, |vault, _| f(vault))
    }

    fn mutate_with_source<F>(&mut self, path: &Path, f: F) -> Result<()>
    where
        F: FnOnce(&mut UnlockedVault, &mut S) -> Result<()>,
    {
        if !path.try_exists()? {
            return Err(VaultaError::VaultNotFound(path.to_path_buf()));
        }

        let _lock = VaultLock::acquire(path)?;
        let mut vault = self.unlock(path)?;
        f(&mut vault, &mut self.source)?;
        vault.save()
    }
}
