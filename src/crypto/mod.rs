//! Cryptographic primitives for vaulta.
//!
//! This module provides:
//! - AES-256-GCM authenticated encryption and decryption (`encryption`)
//! - Argon2id password-based key derivation (`kdf`)
//! - The zeroizing `DerivedKey` holder (`keys`)
//! - Buffer wiping helpers (`hygiene`)

pub mod encryption;
pub mod hygiene;
pub mod kdf;
pub mod keys;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{encrypt, decrypt, derive_key, ...};
pub use encryption::{decrypt, encrypt, Sealed};
pub use hygiene::wipe;
pub use kdf::{derive_key, generate_salt, KdfParams};
pub use keys::DerivedKey;
