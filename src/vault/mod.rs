//! Vault module — encrypted credential storage.
//!
//! This module provides:
//! - `Entry`, `EntrySummary` and `VaultData` plaintext types (`entry`)
//! - The JSON vault file format and atomic writer (`format`)
//! - `UnlockedVault`, one decrypted vault for one operation (`store`)
//! - `VaultEngine`, the per-call operation boundary (`engine`)
//! - The injected `PasswordSource` capability (`password`)
//! - The advisory writer lock (`lock`)

pub mod engine;
pub mod entry;
pub mod format;
pub mod lock;
pub mod password;
pub mod store;

// Re-export the most commonly used items.
pub use engine::VaultEngine;
pub use entry::{Entry, EntrySummary, VaultData};
pub use format::{CipherConfig, KdfConfig, VaultFile};
pub use password::{FixedPassword, PasswordSource};
pub use store::UnlockedVault;
