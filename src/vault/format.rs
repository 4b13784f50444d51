//! On-disk vault file format.
//!
//! A vault is a pretty-printed JSON document:
//!
//! ```text
//! {
//!   "version": 1,
//!   "revision": 4,
//!   "kdf":    { "algorithm": "argon2id", "salt": "<b64>", "iterations": 3, "memory": 65536, "parallelism": 2 },
//!   "cipher": { "algorithm": "aes-256-gcm", "nonce": "<b64>", "data": "<b64>" }
//! }
//! ```
//!
//! - **version**: format version (currently `1`). Unknown versions are
//!   rejected before anything else is parsed.
//! - **revision**: incremented on every write, used to detect concurrent
//!   writers.
//! - **kdf**: Argon2id parameters, fixed at creation time.
//! - **cipher**: nonce and ciphertext (with the GCM tag appended) of the
//!   JSON-encoded entry collection.
//!
//! Everything except the nonce and ciphertext is fed to the cipher as
//! associated data, so editing any header field makes decryption fail.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::crypto::encryption::{CIPHER_ALGORITHM, NONCE_LEN, TAG_LEN};
use crate::crypto::kdf::{KdfParams, KDF_ALGORITHM, SALT_LEN};
use crate::errors::{Result, VaultaError};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Current vault format version.
pub const CURRENT_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Key-derivation parameters stored in the vault so unlock can
/// reproduce the exact same key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KdfConfig {
    pub algorithm: String,

    /// Random per-vault salt (base64 in JSON).
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub salt: Vec<u8>,

    pub iterations: u32,

    /// Memory cost in KiB.
    pub memory: u32,

    pub parallelism: u32,
}

impl KdfConfig {
    /// Build the stored config for a freshly generated salt.
    pub fn new(salt: &[u8], params: &KdfParams) -> Self {
        Self {
            algorithm: KDF_ALGORITHM.to_string(),
            salt: salt.to_vec(),
            iterations: params.iterations,
            memory: params.memory_kib,
            parallelism: params.parallelism,
        }
    }

    /// Convert the stored values into crypto-layer params.
    pub fn params(&self) -> KdfParams {
        KdfParams {
            memory_kib: self.memory,
            iterations: self.iterations,
            parallelism: self.parallelism,
        }
    }
}

/// Cipher parameters and the encrypted entry collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CipherConfig {
    pub algorithm: String,

    /// Nonce used for the current ciphertext (base64 in JSON).
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub nonce: Vec<u8>,

    /// Ciphertext with the authentication tag appended (base64 in JSON).
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub data: Vec<u8>,
}

impl CipherConfig {
    /// The nonce as a fixed-size array.
    pub fn nonce_array(&self) -> Result<[u8; NONCE_LEN]> {
        self.nonce.as_slice().try_into().map_err(|_| {
            VaultaError::InvalidVaultFormat(format!(
                "cipher.nonce must be {NONCE_LEN} bytes, got {}",
                self.nonce.len()
            ))
        })
    }
}

/// The whole on-disk container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VaultFile {
    pub version: u32,
    pub revision: u64,
    pub kdf: KdfConfig,
    pub cipher: CipherConfig,
}

impl VaultFile {
    /// Bytes authenticated (but not encrypted) alongside the entries.
    ///
    /// Covers the format version, revision, and every KDF/cipher parameter
    /// except the nonce, which the AEAD already binds.
    pub fn associated_data(&self) -> Vec<u8> {
        format!(
            "vaulta/v{}/rev{}/{}/salt={}/t={}/m={}/p={}/{}",
            self.version,
            self.revision,
            self.kdf.algorithm,
            BASE64.encode(&self.kdf.salt),
            self.kdf.iterations,
            self.kdf.memory,
            self.kdf.parallelism,
            self.cipher.algorithm,
        )
        .into_bytes()
    }

    /// Check the invariants serde cannot express.
    fn validate(&self) -> Result<()> {
        if self.kdf.algorithm != KDF_ALGORITHM {
            return Err(VaultaError::InvalidVaultFormat(format!(
                "unsupported kdf algorithm '{}'",
                self.kdf.algorithm
            )));
        }
        if self.kdf.salt.len() != SALT_LEN {
            return Err(VaultaError::InvalidVaultFormat(format!(
                "kdf.salt must be {SALT_LEN} bytes, got {}",
                self.kdf.salt.len()
            )));
        }
        self.kdf.params().validate().map_err(|e| match e {
            VaultaError::KeyDerivationFailed(msg) => {
                VaultaError::InvalidVaultFormat(format!("kdf: {msg}"))
            }
            other => other,
        })?;
        if self.cipher.algorithm != CIPHER_ALGORITHM {
            return Err(VaultaError::InvalidVaultFormat(format!(
                "unsupported cipher algorithm '{}'",
                self.cipher.algorithm
            )));
        }
        self.cipher.nonce_array()?;
        if self.cipher.data.len() < TAG_LEN {
            return Err(VaultaError::InvalidVaultFormat(
                "cipher.data is shorter than the authentication tag".into(),
            ));
        }
        Ok(())
    }
}

/// Only the version field, so it can be checked before the rest of
/// the document is interpreted.
#[derive(Deserialize)]
struct VersionProbe {
    version: Option<u32>,
}

// ---------------------------------------------------------------------------
// Codec
// ---------------------------------------------------------------------------

/// Serialize a vault file to pretty JSON with a trailing newline.
pub fn encode(vault: &VaultFile) -> Result<Vec<u8>> {
    let mut buf = serde_json::to_vec_pretty(vault)
        .map_err(|e| VaultaError::SerializationError(format!("vault file: {e}")))?;
    buf.push(b'\n');
    Ok(buf)
}

/// Parse and validate a vault file.
pub fn decode(bytes: &[u8]) -> Result<VaultFile> {
    let probe: VersionProbe = serde_json::from_slice(bytes)
        .map_err(|e| VaultaError::InvalidVaultFormat(format!("not a vault file: {e}")))?;

    match probe.version {
        None => {
            return Err(VaultaError::InvalidVaultFormat(
                "missing field `version`".into(),
            ))
        }
        Some(CURRENT_VERSION) => {}
        Some(other) => {
            return Err(VaultaError::InvalidVaultFormat(format!(
                "unsupported version {other}, expected {CURRENT_VERSION}"
            )))
        }
    }

    let vault: VaultFile = serde_json::from_slice(bytes)
        .map_err(|e| VaultaError::InvalidVaultFormat(e.to_string()))?;
    vault.validate()?;
    Ok(vault)
}

// ---------------------------------------------------------------------------
// File I/O
// ---------------------------------------------------------------------------

/// Read and decode the vault at `path`.
pub fn read_vault(path: &Path) -> Result<VaultFile> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(VaultaError::VaultNotFound(path.to_path_buf()))
        }
        Err(e) => return Err(e.into()),
    };
    decode(&bytes)
}

/// Write a vault file to disk **atomically**.
///
/// 1. Serialize the whole vault in memory.
/// 2. Write it to an owner-only temp file in the same directory and fsync.
/// 3. Rename the temp file over the target path.
///
/// The rename ensures readers never see a half-written file; if any
/// step fails the temp file is removed and the target is left untouched.
pub fn write_vault(path: &Path, vault: &VaultFile) -> Result<()> {
    let buf = encode(vault)?;

    let parent = parent_dir(path);
    if !parent.exists() {
        create_private_dir(&parent)?;
    }

    let tmp_path = parent.join(format!(
        ".{}.tmp-{}",
        path.file_name().unwrap_or_default().to_string_lossy(),
        std::process::id()
    ));

    if let Err(e) = write_synced(&tmp_path, &buf).and_then(|()| fs::rename(&tmp_path, path)) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }

    // Persist the rename itself; failure here does not invalidate the data.
    #[cfg(unix)]
    {
        if let Ok(dir) = fs::File::open(&parent) {
            let _ = dir.sync_all();
        }
    }

    debug!(
        path = %path.display(),
        revision = vault.revision,
        "vault file written"
    );
    Ok(())
}

/// The directory a vault file lives in (`.` for bare file names).
pub(crate) fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Create `dir` (and its parents); the leaf gets mode 0700 on Unix.
pub(crate) fn create_private_dir(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(dir, fs::Permissions::from_mode(0o700))?;
    }

    Ok(())
}

/// Create (or truncate) `path` with owner-only permissions, write `buf`,
/// and flush it to stable storage.
fn write_synced(path: &Path, buf: &[u8]) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;

    // A leftover temp file from a crash keeps its old mode; reset it.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }

    file.write_all(buf)?;
    file.sync_all()
}

// ---------------------------------------------------------------------------
// Serde helpers for base64-encoded Vec<u8> fields
// ---------------------------------------------------------------------------

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

fn base64_encode<S>(data: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let encoded = BASE64.encode(data);
    serializer.serialize_str(&encoded)
}

fn base64_decode<'de, D>(deserializer: D) -> std::result::Result<Vec<u8>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    BASE64.decode(&s).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> VaultFile {
        VaultFile {
            version: CURRENT_VERSION,
            revision: 3,
            kdf: KdfConfig::new(&[9u8; SALT_LEN], &KdfParams::default()),
            cipher: CipherConfig {
                algorithm: CIPHER_ALGORITHM.to_string(),
                nonce: vec![1u8; NONCE_LEN],
                data: vec![2u8; 40],
            },
        }
    }

    fn encoded_json() -> serde_json::Value {
        serde_json::from_slice(&encode(&sample()).unwrap()).unwrap()
    }

    fn decode_value(value: &serde_json::Value) -> Result<VaultFile> {
        decode(&serde_json::to_vec(value).unwrap())
    }

    #[test]
    fn encode_uses_documented_field_names() {
        let json = encoded_json();
        assert_eq!(json["version"], 1);
        assert_eq!(json["kdf"]["algorithm"], "argon2id");
        assert_eq!(json["kdf"]["memory"], 65_536);
        assert_eq!(json["cipher"]["algorithm"], "aes-256-gcm");
        assert_eq!(json["cipher"]["nonce"], BASE64.encode([1u8; NONCE_LEN]));
    }

    #[test]
    fn decode_accepts_encoded_file() {
        assert_eq!(decode(&encode(&sample()).unwrap()).unwrap(), sample());
    }

    #[test]
    fn unknown_version_fails_closed() {
        let mut json = encoded_json();
        json["version"] = 2.into();
        let err = decode_value(&json).unwrap_err().to_string();
        assert!(err.contains("unsupported version 2"), "{err}");
    }

    #[test]
    fn missing_version_rejected() {
        let mut json = encoded_json();
        json.as_object_mut().unwrap().remove("version");
        assert!(matches!(
            decode_value(&json),
            Err(VaultaError::InvalidVaultFormat(_))
        ));
    }

    #[test]
    fn missing_cipher_field_rejected() {
        let mut json = encoded_json();
        json["cipher"].as_object_mut().unwrap().remove("data");
        assert!(matches!(
            decode_value(&json),
            Err(VaultaError::InvalidVaultFormat(_))
        ));
    }

    #[test]
    fn malformed_base64_rejected() {
        let mut json = encoded_json();
        json["kdf"]["salt"] = "not*base64!".into();
        assert!(matches!(
            decode_value(&json),
            Err(VaultaError::InvalidVaultFormat(_))
        ));
    }

    #[test]
    fn wrong_salt_length_rejected() {
        let mut json = encoded_json();
        json["kdf"]["salt"] = BASE64.encode([0u8; 8]).into();
        let err = decode_value(&json).unwrap_err().to_string();
        assert!(err.contains("kdf.salt"), "{err}");
    }

    #[test]
    fn zero_cost_rejected() {
        let mut json = encoded_json();
        json["kdf"]["iterations"] = 0.into();
        assert!(matches!(
            decode_value(&json),
            Err(VaultaError::InvalidVaultFormat(_))
        ));
    }

    #[test]
    fn out_of_range_costs_are_format_errors() {
        for (field, value) in [("memory", 819u32), ("iterations", 65), ("parallelism", 1000)] {
            let mut json = encoded_json();
            json["kdf"][field] = value.into();
            let err = decode_value(&json).unwrap_err();
            assert!(
                matches!(err, VaultaError::InvalidVaultFormat(_)),
                "{field}={value}: {err}"
            );
        }
    }

    #[test]
    fn unknown_algorithm_rejected() {
        let mut json = encoded_json();
        json["cipher"]["algorithm"] = "rot13".into();
        assert!(decode_value(&json).is_err());
    }

    #[test]
    fn garbage_rejected() {
        assert!(matches!(
            decode(b"\x00\x01not json"),
            Err(VaultaError::InvalidVaultFormat(_))
        ));
        assert!(decode(b"").is_err());
    }

    #[test]
    fn associated_data_tracks_header_fields() {
        let base = sample();
        let mut bumped = sample();
        bumped.revision += 1;
        let mut weaker = sample();
        weaker.kdf.iterations = 1;

        assert_ne!(base.associated_data(), bumped.associated_data());
        assert_ne!(base.associated_data(), weaker.associated_data());

        // The nonce and ciphertext are not part of the associated data.
        let mut resealed = sample();
        resealed.cipher.nonce = vec![7u8; NONCE_LEN];
        assert_eq!(base.associated_data(), resealed.associated_data());
    }

    #[test]
    fn parent_dir_of_bare_name_is_cwd() {
        assert_eq!(parent_dir(Path::new("vault.json")), PathBuf::from("."));
        assert_eq!(parent_dir(Path::new("/a/b.json")), PathBuf::from("/a"));
    }
}
