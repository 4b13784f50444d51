//! Entry and VaultData types: the plaintext inside the vault ciphertext.
//!
//! None of these types are ever written to disk directly.  `VaultData`
//! is serialized to JSON, encrypted, and the JSON buffer is wiped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::errors::{Result, VaultaError};

/// Maximum length of an entry name in characters.
const MAX_NAME_LEN: usize = 128;

/// A single credential stored in the vault.
///
/// `name` is the entry's identity: unique within a vault and used by
/// get and delete.  All string fields are wiped when the entry drops.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct Entry {
    pub name: String,

    pub username: String,

    pub password: String,

    #[serde(default)]
    pub notes: String,

    #[zeroize(skip)]
    pub created_at: DateTime<Utc>,

    #[zeroize(skip)]
    pub updated_at: DateTime<Utc>,
}

impl Entry {
    /// Build a new entry stamped with the current time.
    pub fn new(
        name: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        notes: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            username: username.into(),
            password: password.into(),
            notes: notes.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Summary view without the password.
    pub fn summary(&self) -> EntrySummary {
        EntrySummary {
            name: self.name.clone(),
            username: self.username.clone(),
            notes: self.notes.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl std::fmt::Debug for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entry")
            .field("name", &self.name)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("notes", &self.notes)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// Lightweight view of an entry (no password).
///
/// Returned by list operations so callers can display entries without
/// handling the secret itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrySummary {
    pub name: String,
    pub username: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The decrypted entry collection, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultData {
    pub entries: Vec<Entry>,
}

impl VaultData {
    /// Serialize to the JSON plaintext that gets encrypted.
    pub fn to_plaintext(&self) -> Result<Zeroizing<Vec<u8>>> {
        serde_json::to_vec(self)
            .map(Zeroizing::new)
            .map_err(|e| VaultaError::SerializationError(format!("entries: {e}")))
    }

    /// Parse decrypted plaintext.
    ///
    /// The error only reports the position, never the offending value,
    /// since the input contains passwords.
    pub fn from_plaintext(plaintext: &[u8]) -> Result<Self> {
        serde_json::from_slice(plaintext).map_err(|e| {
            VaultaError::InvalidVaultFormat(format!(
                "decrypted payload is not an entry collection (line {}, column {})",
                e.line(),
                e.column()
            ))
        })
    }

    pub fn find(&self, name: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }
}

/// Validate that an entry name is usable as an identity.
///
/// Must be non-blank, at most 128 characters, and free of control
/// characters.
pub fn validate_entry_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(VaultaError::InvalidEntry(
            "entry name cannot be empty".into(),
        ));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(VaultaError::InvalidEntry(format!(
            "entry name cannot exceed {MAX_NAME_LEN} characters"
        )));
    }
    if name.chars().any(char::is_control) {
        return Err(VaultaError::InvalidEntry(
            "entry name cannot contain control characters".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plaintext_shape_is_entries_list() {
        let data = VaultData {
            entries: vec![Entry::new("github", "alice", "p1", "work")],
        };
        let plaintext = data.to_plaintext().unwrap();
        let json: serde_json::Value = serde_json::from_slice(&plaintext).unwrap();
        assert_eq!(json["entries"][0]["username"], "alice");
        assert_eq!(json["entries"][0]["password"], "p1");
        assert_eq!(json["entries"][0]["notes"], "work");

        assert_eq!(VaultData::from_plaintext(&plaintext).unwrap(), data);
    }

    #[test]
    fn empty_collection_parses() {
        let data = VaultData::from_plaintext(br#"{"entries":[]}"#).unwrap();
        assert!(data.entries.is_empty());
    }

    #[test]
    fn parse_error_does_not_echo_values() {
        let err = VaultData::from_plaintext(br#"{"entries":[{"name":"x","password":42}]}"#)
            .unwrap_err()
            .to_string();
        assert!(!err.contains("42"), "{err}");
    }

    #[test]
    fn debug_redacts_password() {
        let entry = Entry::new("bank", "bob", "s3cr3t-value", "");
        let rendered = format!("{entry:?}");
        assert!(!rendered.contains("s3cr3t-value"));
        assert!(rendered.contains("bob"));
    }

    #[test]
    fn summary_omits_password() {
        let entry = Entry::new("bank", "bob", "pw", "savings");
        let summary = entry.summary();
        assert_eq!(summary.name, "bank");
        assert_eq!(summary.username, "bob");
        assert_eq!(summary.notes, "savings");
    }

    #[test]
    fn entry_zeroize_clears_strings() {
        let mut entry = Entry::new("bank", "bob", "pw", "savings");
        entry.zeroize();
        assert!(entry.password.is_empty());
        assert!(entry.username.is_empty());
    }

    #[test]
    fn name_validation() {
        assert!(validate_entry_name("github").is_ok());
        assert!(validate_entry_name("work email (old)").is_ok());
        assert!(validate_entry_name("").is_err());
        assert!(validate_entry_name("   ").is_err());
        assert!(validate_entry_name("tab\there").is_err());
        assert!(validate_entry_name(&"a".repeat(129)).is_err());
    }
}
