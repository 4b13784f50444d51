//! Zeroizing holder for the derived vault key.

use zeroize::{Zeroize, ZeroizeOnDrop};

use super::hygiene::wipe;
use super::kdf::{derive_key, KdfParams, KEY_LEN};
use crate::errors::Result;

/// A wrapper around the 32-byte vault key that automatically zeroes
/// its memory when dropped.
///
/// The key lives only for the duration of one vault operation.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    bytes: [u8; KEY_LEN],
}

impl DerivedKey {
    /// Take ownership of raw key bytes, wiping the caller's copy.
    pub fn new(mut bytes: [u8; KEY_LEN]) -> Self {
        let key = Self { bytes };
        wipe(&mut bytes);
        key
    }

    /// Run Argon2id and wrap the result.
    pub fn derive(password: &[u8], salt: &[u8], params: &KdfParams) -> Result<Self> {
        derive_key(password, salt, params).map(Self::new)
    }

    /// Access the raw key bytes (e.g. to pass to the cipher).
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DerivedKey(<redacted>)")
    }
}
