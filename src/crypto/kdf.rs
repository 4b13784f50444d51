//! Password-based key derivation using Argon2id.
//!
//! Argon2id is a memory-hard KDF that protects against brute-force and
//! GPU-based attacks.  The parameters are chosen once when a vault is
//! created and stored in the vault file, so every unlock reproduces the
//! exact same key.

use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;

use crate::errors::{Result, VaultaError};

/// Identifier written into the `kdf.algorithm` field of the vault file.
pub const KDF_ALGORITHM: &str = "argon2id";

/// Length of the salt in bytes (128 bits).
pub const SALT_LEN: usize = 16;

/// Length of the derived key in bytes (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// Minimum safe memory cost in KiB (8 MB).
pub const MIN_MEMORY_KIB: u32 = 8_192;

/// Upper bounds so a doctored vault file cannot demand absurd resources.
const MAX_MEMORY_KIB: u32 = 4 * 1024 * 1024;
const MAX_ITERATIONS: u32 = 64;
const MAX_PARALLELISM: u32 = 64;

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// Memory cost in KiB (default: 65 536 = 64 MB).
    pub memory_kib: u32,
    /// Number of iterations (default: 3).
    pub iterations: u32,
    /// Parallelism lanes (default: 2).
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory_kib: 65_536,
            iterations: 3,
            parallelism: 2,
        }
    }
}

impl KdfParams {
    /// Reject parameters that would silently derive a weak key.
    pub fn validate(&self) -> Result<()> {
        if self.memory_kib < MIN_MEMORY_KIB {
            return Err(VaultaError::KeyDerivationFailed(format!(
                "Argon2 memory must be at least {MIN_MEMORY_KIB} KiB (got {})",
                self.memory_kib
            )));
        }
        if self.memory_kib > MAX_MEMORY_KIB {
            return Err(VaultaError::KeyDerivationFailed(format!(
                "Argon2 memory must be at most {MAX_MEMORY_KIB} KiB (got {})",
                self.memory_kib
            )));
        }
        if !(1..=MAX_ITERATIONS).contains(&self.iterations) {
            return Err(VaultaError::KeyDerivationFailed(format!(
                "Argon2 iterations must be between 1 and {MAX_ITERATIONS} (got {})",
                self.iterations
            )));
        }
        if !(1..=MAX_PARALLELISM).contains(&self.parallelism) {
            return Err(VaultaError::KeyDerivationFailed(format!(
                "Argon2 parallelism must be between 1 and {MAX_PARALLELISM} (got {})",
                self.parallelism
            )));
        }
        Ok(())
    }
}

/// Derive a 32-byte key from a password and salt.
///
/// The same password + salt + params will always produce the same key.
pub fn derive_key(password: &[u8], salt: &[u8], kdf_params: &KdfParams) -> Result<[u8; KEY_LEN]> {
    kdf_params.validate()?;

    let params = Params::new(
        kdf_params.memory_kib,
        kdf_params.iterations,
        kdf_params.parallelism,
        Some(KEY_LEN),
    )
    .map_err(|e| VaultaError::KeyDerivationFailed(format!("invalid Argon2 params: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut key = [0u8; KEY_LEN];
    argon2
        .hash_password_into(password, salt, &mut key)
        .map_err(|e| VaultaError::KeyDerivationFailed(format!("Argon2id hashing failed: {e}")))?;

    Ok(key)
}

/// Generate a cryptographically random salt.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    salt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast() -> KdfParams {
        KdfParams {
            memory_kib: MIN_MEMORY_KIB,
            iterations: 1,
            parallelism: 1,
        }
    }

    #[test]
    fn derive_is_deterministic() {
        let salt = [7u8; SALT_LEN];
        let a = derive_key(b"hunter2", &salt, &fast()).unwrap();
        let b = derive_key(b"hunter2", &salt, &fast()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn different_salt_gives_different_key() {
        let a = derive_key(b"hunter2", &[1u8; SALT_LEN], &fast()).unwrap();
        let b = derive_key(b"hunter2", &[2u8; SALT_LEN], &fast()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn zero_iterations_rejected() {
        let params = KdfParams {
            iterations: 0,
            ..fast()
        };
        let err = derive_key(b"pw", &[0u8; SALT_LEN], &params).unwrap_err();
        assert!(matches!(err, VaultaError::KeyDerivationFailed(_)));
    }

    #[test]
    fn zero_memory_rejected() {
        let params = KdfParams {
            memory_kib: 0,
            ..fast()
        };
        assert!(derive_key(b"pw", &[0u8; SALT_LEN], &params).is_err());
    }

    #[test]
    fn zero_parallelism_rejected() {
        let params = KdfParams {
            parallelism: 0,
            ..fast()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn oversized_memory_rejected() {
        let params = KdfParams {
            memory_kib: u32::MAX,
            ..fast()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn default_params_are_valid() {
        assert!(KdfParams::default().validate().is_ok());
    }

    #[test]
    fn salts_are_random() {
        assert_ne!(generate_salt(), generate_salt());
    }
}
