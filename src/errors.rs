use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in vaulta.
#[derive(Debug, Error)]
pub enum VaultaError {
    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Wrong password and tampered ciphertext are reported identically.
    #[error("invalid password or corrupted vault")]
    DecryptionFailed,

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    // --- Vault errors ---
    #[error("Vault not found at {0}")]
    VaultNotFound(PathBuf),

    #[error("Vault already exists at {0}")]
    VaultAlreadyExists(PathBuf),

    #[error("Invalid vault format: {0}")]
    InvalidVaultFormat(String),

    #[error("Entry '{0}' not found")]
    EntryNotFound(String),

    #[error("Entry '{0}' already exists")]
    EntryAlreadyExists(String),

    #[error("Invalid entry: {0}")]
    InvalidEntry(String),

    // --- Concurrency errors ---
    #[error("Vault at {0} is locked by another process")]
    VaultLocked(PathBuf),

    #[error("Vault at {0} was modified by another process; re-run the command")]
    ConcurrentModification(PathBuf),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("User cancelled operation")]
    UserCancelled,
}

/// Convenience type alias for vaulta results.
pub type Result<T> = std::result::Result<T, VaultaError>;
