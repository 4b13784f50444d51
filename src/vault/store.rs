//! An unlocked vault: header, derived key, and decrypted entries.
//!
//! `UnlockedVault` wraps the file format layer and the crypto layer so
//! the engine can work with simple calls like
//! `vault.add_entry(entry)?; vault.save()?`.  It exists for one
//! operation only; nothing is cached between invocations.

use std::path::{Path, PathBuf};

use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::crypto::encryption::{decrypt, encrypt, CIPHER_ALGORITHM, NONCE_LEN};
use crate::crypto::kdf::{generate_salt, KdfParams};
use crate::crypto::keys::DerivedKey;
use crate::errors::{Result, VaultaError};

use super::entry::{validate_entry_name, Entry, EntrySummary, VaultData};
use super::format::{self, CipherConfig, KdfConfig, VaultFile, CURRENT_VERSION};

/// What the file looked like when this vault was loaded or last written.
///
/// `save` refuses to overwrite the file if it no longer matches.
#[derive(Debug, Clone, PartialEq, Eq)]
struct DiskStamp {
    revision: u64,
    nonce: Vec<u8>,
}

impl DiskStamp {
    fn of(file: &VaultFile) -> Self {
        Self {
            revision: file.revision,
            nonce: file.cipher.nonce.clone(),
        }
    }
}

/// The vault handle.  Create one with `UnlockedVault::create` or
/// `UnlockedVault::open`, then use its methods to manage entries.
pub struct UnlockedVault {
    /// Path to the vault file on disk.
    path: PathBuf,

    /// Header as last read or written (version, revision, KDF, cipher).
    file: VaultFile,

    /// The derived key (zeroized on drop).
    key: DerivedKey,

    /// Decrypted entries.
    data: VaultData,

    /// On-disk state the next `save` expects to replace.
    stamp: DiskStamp,
}

impl UnlockedVault {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Create a brand-new vault file at `path`.
    ///
    /// Generates a random salt, derives the key from the password, and
    /// writes an empty entry collection.  Fails with `VaultAlreadyExists`
    /// if a file is present, unless `force` is set.
    pub fn create(path: &Path, password: &[u8], params: &KdfParams, force: bool) -> Result<Self> {
        let salt = generate_salt();
        let key = DerivedKey::derive(password, &salt, params)?;
        Self::create_with_key(path, key, &salt, params, force)
    }

    /// Like `create`, for a key the caller already derived from `salt`
    /// and `params`, so the password can be wiped before anything is
    /// encrypted or written.
    pub fn create_with_key(
        path: &Path,
        key: DerivedKey,
        salt: &[u8],
        params: &KdfParams,
        force: bool,
    ) -> Result<Self> {
        if !force && path.try_exists()? {
            return Err(VaultaError::VaultAlreadyExists(path.to_path_buf()));
        }

        let header = VaultFile {
            version: CURRENT_VERSION,
            revision: 0,
            kdf: KdfConfig::new(salt, params),
            cipher: CipherConfig {
                algorithm: CIPHER_ALGORITHM.to_string(),
                nonce: Vec::new(),
                data: Vec::new(),
            },
        };

        let mut vault = Self {
            path: path.to_path_buf(),
            stamp: DiskStamp::of(&header),
            file: header.clone(),
            key,
            data: VaultData::default(),
        };
        vault.seal_and_write(header)?;

        info!(path = %path.display(), "vault created");
        Ok(vault)
    }

    /// Open an existing vault file.
    ///
    /// Derives the key from the password and the stored KDF params, then
    /// authenticates and decrypts the entry collection.  A wrong password
    /// and a tampered file both yield `DecryptionFailed`.
    pub fn open(path: &Path, password: &[u8]) -> Result<Self> {
        let file = format::read_vault(path)?;
        let key = DerivedKey::derive(password, &file.kdf.salt, &file.kdf.params())?;
        Self::unseal(path, file, key)
    }

    /// Decrypt an already-read vault `file` with a key derived from its
    /// stored KDF params.
    pub fn unseal(path: &Path, file: VaultFile, key: DerivedKey) -> Result<Self> {
        let nonce = file.cipher.nonce_array()?;
        let plaintext = Zeroizing::new(decrypt(
            key.as_bytes(),
            &nonce,
            &file.cipher.data,
            &file.associated_data(),
        )?);
        let data = VaultData::from_plaintext(&plaintext)?;
        drop(plaintext);

        debug!(
            path = %path.display(),
            revision = file.revision,
            entries = data.entries.len(),
            "vault unlocked"
        );

        Ok(Self {
            path: path.to_path_buf(),
            stamp: DiskStamp::of(&file),
            file,
            key,
            data,
        })
    }

    // ------------------------------------------------------------------
    // Entry operations
    // ------------------------------------------------------------------

    /// Append an entry.  Names are unique within a vault.
    pub fn add_entry(&mut self, entry: Entry) -> Result<()> {
        validate_entry_name(&entry.name)?;
        if self.data.contains(&entry.name) {
            return Err(VaultaError::EntryAlreadyExists(entry.name.clone()));
        }
        debug!(entry = %entry.name, "entry added");
        self.data.entries.push(entry);
        Ok(())
    }

    /// Look up an entry by name.
    pub fn get_entry(&self, name: &str) -> Result<&Entry> {
        self.data
            .find(name)
            .ok_or_else(|| VaultaError::EntryNotFound(name.to_string()))
    }

    /// Remove the entry with the given name.
    pub fn delete_entry(&mut self, name: &str) -> Result<()> {
        let before = self.data.entries.len();
        self.data.entries.retain(|e| e.name != name);
        if self.data.entries.len() == before {
            return Err(VaultaError::EntryNotFound(name.to_string()));
        }
        debug!(entry = name, "entry deleted");
        Ok(())
    }

    /// All entries in insertion order.
    pub fn entries(&self) -> &[Entry] {
        &self.data.entries
    }

    /// Password-free summaries in insertion order.
    pub fn summaries(&self) -> Vec<EntrySummary> {
        self.data.entries.iter().map(Entry::summary).collect()
    }

    // ------------------------------------------------------------------
    // Key management
    // ------------------------------------------------------------------

    /// Replace the master password.
    ///
    /// Generates a new salt and derives a new key with `params`.  Nothing
    /// is written until `save`.
    pub fn rekey(&mut self, new_password: &[u8], params: &KdfParams) -> Result<()> {
        let salt = generate_salt();
        self.key = DerivedKey::derive(new_password, &salt, params)?;
        self.file.kdf = KdfConfig::new(&salt, params);
        debug!(path = %self.path.display(), "vault key replaced");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Re-encrypt the entries and write the vault back atomically.
    ///
    /// Fails with `ConcurrentModification` if the file on disk changed
    /// since this vault was opened.  Every save uses a fresh nonce and
    /// bumps the revision; the KDF fields are written unchanged.
    pub fn save(&mut self) -> Result<()> {
        self.ensure_unchanged_on_disk()?;

        let mut next = self.file.clone();
        next.revision = next
            .revision
            .checked_add(1)
            .ok_or_else(|| VaultaError::InvalidVaultFormat("revision counter overflow".into()))?;

        self.seal_and_write(next)
    }

    /// Encrypt the entries under `header`'s associated data and write.
    ///
    /// In-memory state is only updated once the write has succeeded.
    fn seal_and_write(&mut self, mut header: VaultFile) -> Result<()> {
        let plaintext = self.data.to_plaintext()?;
        let sealed = encrypt(self.key.as_bytes(), &plaintext, &header.associated_data())?;
        drop(plaintext);

        header.cipher.nonce = sealed.nonce.to_vec();
        header.cipher.data = sealed.ciphertext;

        format::write_vault(&self.path, &header)?;

        self.stamp = DiskStamp::of(&header);
        self.file = header;
        Ok(())
    }

    fn ensure_unchanged_on_disk(&self) -> Result<()> {
        let current = match format::read_vault(&self.path) {
            Ok(file) => file,
            Err(VaultaError::VaultNotFound(_)) => {
                return Err(VaultaError::ConcurrentModification(self.path.clone()))
            }
            Err(e) => return Err(e),
        };

        if DiskStamp::of(&current) != self.stamp {
            return Err(VaultaError::ConcurrentModification(self.path.clone()));
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Returns the path to the vault file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the header as last read or written.
    pub fn file(&self) -> &VaultFile {
        &self.file
    }

    /// Returns the revision of the last read or written file.
    pub fn revision(&self) -> u64 {
        self.file.revision
    }

    /// Returns the nonce of the current ciphertext.
    pub fn nonce(&self) -> Result<[u8; NONCE_LEN]> {
        self.file.cipher.nonce_array()
    }

    /// Returns the number of entries in the vault.
    pub fn entry_count(&self) -> usize {
        self.data.entries.len()
    }
}

impl std::fmt::Debug for UnlockedVault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnlockedVault")
            .field("path", &self.path)
            .field("revision", &self.file.revision)
            .field("entries", &self.data.entries.len())
            .finish_non_exhaustive()
    }
}
