//! Advisory exclusive lock held for the duration of a mutating operation.
//!
//! The lock lives on a sidecar file (`.<vault>.lock`) rather than the
//! vault itself, because every write replaces the vault's inode via
//! rename.  Acquisition never blocks: a second writer fails fast with
//! `VaultLocked`.
//!
//! The sidecar is left in place after release.  Removing it would let a
//! third process lock a fresh inode while a second still holds the old one.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::format::{create_private_dir, parent_dir};
use crate::errors::{Result, VaultaError};

/// Guard that releases the lock when dropped.
#[derive(Debug)]
pub struct VaultLock {
    file: File,
    path: PathBuf,
}

impl VaultLock {
    /// Take the exclusive lock for the vault at `vault_path`.
    ///
    /// Creates the vault's directory if it does not exist yet.
    pub fn acquire(vault_path: &Path) -> Result<Self> {
        let parent = parent_dir(vault_path);
        if !parent.exists() {
            create_private_dir(&parent)?;
        }

        let path = lock_path_for(vault_path);

        let mut options = OpenOptions::new();
        options.read(true).write(true).create(true).truncate(false);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let file = options.open(&path)?;

        match try_lock_exclusive(&file) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                return Err(VaultaError::VaultLocked(vault_path.to_path_buf()));
            }
            Err(e) => return Err(e.into()),
        }

        debug!(lock = %path.display(), "acquired vault lock");
        Ok(Self { file, path })
    }

    /// Path of the sidecar lock file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for VaultLock {
    fn drop(&mut self) {
        // Closing the descriptor releases the lock as well; unlock
        // explicitly so the release does not depend on drop order.
        let _ = unlock(&self.file);
        debug!(lock = %self.path.display(), "released vault lock");
    }
}

/// `<dir>/.<file name>.lock`
pub fn lock_path_for(vault_path: &Path) -> PathBuf {
    parent_dir(vault_path).join(format!(
        ".{}.lock",
        vault_path.file_name().unwrap_or_default().to_string_lossy()
    ))
}

#[cfg(unix)]
fn try_lock_exclusive(file: &File) -> io::Result<()> {
    use std::os::unix::io::AsRawFd;

    // SAFETY: the descriptor is owned by `file` and stays open for the call.
    let ret = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) };
    if ret == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

#[cfg(unix)]
fn unlock(file: &File) -> io::Result<()> {
    use std::os::unix::io::AsRawFd;

    // SAFETY: as above.
    let ret = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_UN) };
    if ret == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

#[cfg(not(unix))]
fn try_lock_exclusive(_file: &File) -> io::Result<()> {
    tracing::warn!("advisory file locking is not supported on this platform");
    Ok(())
}

#[cfg(not(unix))]
fn unlock(_file: &File) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn lock_path_is_hidden_sidecar() {
        assert_eq!(
            lock_path_for(Path::new("/data/vault.json")),
            PathBuf::from("/data/.vault.json.lock")
        );
    }

    #[cfg(unix)]
    #[test]
    fn second_lock_is_refused_until_release() {
        let dir = TempDir::new().unwrap();
        let vault = dir.path().join("vault.json");

        let first = VaultLock::acquire(&vault).unwrap();
        let second = VaultLock::acquire(&vault);
        assert!(matches!(second, Err(VaultaError::VaultLocked(_))));

        drop(first);
        assert!(VaultLock::acquire(&vault).is_ok());
    }

    #[test]
    fn acquire_creates_missing_directory() {
        let dir = TempDir::new().unwrap();
        let vault = dir.path().join("nested").join("vault.json");

        let lock = VaultLock::acquire(&vault).unwrap();
        assert!(lock.path().exists());
        assert!(!vault.exists());
    }
}
