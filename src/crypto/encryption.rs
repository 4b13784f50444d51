//! AES-256-GCM authenticated encryption.
//!
//! Each call to `encrypt` generates a fresh random 12-byte nonce from the
//! OS CSPRNG.  The nonce is returned alongside the ciphertext rather than
//! prepended, because the vault file stores the two in separate fields.
//!
//! Callers pass associated data (`aad`) that is authenticated but not
//! encrypted; the vault uses it to bind the header fields to the payload.

use aes_gcm::aead::{Aead, KeyInit, OsRng, Payload};
use aes_gcm::{AeadCore, Aes256Gcm, Key, Nonce};

use super::kdf::KEY_LEN;
use crate::errors::{Result, VaultaError};

/// Identifier written into the `cipher.algorithm` field of the vault file.
pub const CIPHER_ALGORITHM: &str = "aes-256-gcm";

/// Size of the AES-256-GCM nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Size of the authentication tag appended to every ciphertext.
pub const TAG_LEN: usize = 16;

/// Output of a single encryption: the nonce and the ciphertext + tag.
#[derive(Debug, Clone)]
pub struct Sealed {
    pub nonce: [u8; NONCE_LEN],
    pub ciphertext: Vec<u8>,
}

/// Encrypt `plaintext` under a 32-byte `key`, authenticating `aad`.
pub fn encrypt(key: &[u8; KEY_LEN], plaintext: &[u8], aad: &[u8]) -> Result<Sealed> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));

    // Never reuse a nonce under the same key: always draw a new one.
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(
            &nonce,
            Payload {
                msg: plaintext,
                aad,
            },
        )
        .map_err(|e| VaultaError::EncryptionFailed(format!("encryption error: {e}")))?;

    Ok(Sealed {
        nonce: nonce.into(),
        ciphertext,
    })
}

/// Decrypt and verify data produced by `encrypt`.
///
/// Any failure (short input, tag mismatch, wrong `aad`) maps to
/// `DecryptionFailed` so callers cannot tell a wrong password from a
/// tampered file.
pub fn decrypt(
    key: &[u8; KEY_LEN],
    nonce: &[u8; NONCE_LEN],
    ciphertext: &[u8],
    aad: &[u8],
) -> Result<Vec<u8>> {
    if ciphertext.len() < TAG_LEN {
        return Err(VaultaError::DecryptionFailed);
    }

    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));

    cipher
        .decrypt(
            Nonce::from_slice(nonce),
            Payload {
                msg: ciphertext,
                aad,
            },
        )
        .map_err(|_| VaultaError::DecryptionFailed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aad_mismatch_fails() {
        let key = [0x42u8; KEY_LEN];
        let sealed = encrypt(&key, b"payload", b"v1").unwrap();
        let result = decrypt(&key, &sealed.nonce, &sealed.ciphertext, b"v2");
        assert!(matches!(result, Err(VaultaError::DecryptionFailed)));
    }

    #[test]
    fn ciphertext_carries_tag() {
        let key = [0x01u8; KEY_LEN];
        let sealed = encrypt(&key, b"", b"").unwrap();
        assert_eq!(sealed.ciphertext.len(), TAG_LEN);
        assert!(decrypt(&key, &sealed.nonce, &sealed.ciphertext, b"")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn too_short_input_fails() {
        let key = [0x01u8; KEY_LEN];
        let result = decrypt(&key, &[0u8; NONCE_LEN], &[0u8; 4], b"");
        assert!(matches!(result, Err(VaultaError::DecryptionFailed)));
    }
}
