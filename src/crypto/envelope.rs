// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Envelope encryption for stored chat objects
//!
//! One random master key (CMK) protects any number of storage objects. The
//! key for a single object (DEK) is derived on demand:
//!
//! ```text
//! DEK = HKDF-SHA256(ikm = CMK, salt = none, info = "file:" || object_id, L = 32)
//! ```
//!
//! `object_id` is the 32-byte storage transaction id, so the DEK is bound to
//! exactly one object and never has to be stored or transmitted.

use hkdf::Hkdf;
use serde::{de::DeserializeOwned, Serialize};
use sha2::Sha256;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::aes_gcm::{self, SealedPayload};
use super::random::fill_secure;
use super::CryptoError;

/// Master key length used when the caller has no preference
pub const DEFAULT_MASTER_KEY_LEN: usize = 32;
/// Shortest master key accepted by generation and derivation
pub const MIN_MASTER_KEY_LEN: usize = 16;
/// Storage object identifiers are exactly this long
pub const OBJECT_ID_LEN: usize = 32;
/// Derived key length (AES-256)
pub const DERIVED_KEY_LEN: usize = 32;
/// HKDF info prefix preceding the object id
pub const HKDF_INFO_PREFIX: &[u8] = b"file:";

/// Root secret for a protected object. Zeroed on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct MasterKey(Vec<u8>);

impl MasterKey {
    /// Wrap existing key bytes, enforcing the minimum length
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, CryptoError> {
        if bytes.len() < MIN_MASTER_KEY_LEN {
            return Err(CryptoError::invalid_input(
                "master_key",
                format!(
                    "master key must be at least {} bytes, got {}",
                    MIN_MASTER_KEY_LEN,
                    bytes.len()
                ),
            ));
        }
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for MasterKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MasterKey([REDACTED; {}])", self.0.len())
    }
}

/// Per-object AES-256 key. Zeroed on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey([u8; DERIVED_KEY_LEN]);

impl DerivedKey {
    pub fn as_bytes(&self) -> &[u8; DERIVED_KEY_LEN] {
        &self.0
    }
}

impl AsRef<[u8]> for DerivedKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DerivedKey([REDACTED])")
    }
}

/// Generate a fresh master key of `length` bytes from the OS CSPRNG
///
/// # Errors
///
/// - `InvalidInput` if `length < 16`
/// - `Environment` if the OS random source fails
pub fn generate_master_key(length: usize) -> Result<MasterKey, CryptoError> {
    if length < MIN_MASTER_KEY_LEN {
        return Err(CryptoError::invalid_input(
            "generate_master_key",
            format!(
                "length must be at least {} bytes, got {}",
                MIN_MASTER_KEY_LEN, length
            ),
        ));
    }

    let mut bytes = vec![0u8; length];
    if let Err(e) = fill_secure(&mut bytes) {
        bytes.zeroize();
        return Err(e);
    }
    Ok(MasterKey(bytes))
}

/// Derive the key that protects `object_id`
///
/// Deterministic: the same `(master_key, object_id)` always yields the same
/// key. Changing either input yields an unrelated key.
///
/// # Errors
///
/// - `InvalidInput` if `object_id` is not 32 bytes or the master key is
///   shorter than 16 bytes
pub fn derive_key(master_key: &[u8], object_id: &[u8]) -> Result<DerivedKey, CryptoError> {
    if object_id.len() != OBJECT_ID_LEN {
        return Err(CryptoError::invalid_input(
            "derive_key",
            format!(
                "object id must be {} bytes, got {}",
                OBJECT_ID_LEN,
                object_id.len()
            ),
        ));
    }
    if master_key.len() < MIN_MASTER_KEY_LEN {
        return Err(CryptoError::invalid_input(
            "derive_key",
            format!(
                "master key must be at least {} bytes, got {}",
                MIN_MASTER_KEY_LEN,
                master_key.len()
            ),
        ));
    }

    let mut info = Vec::with_capacity(HKDF_INFO_PREFIX.len() + OBJECT_ID_LEN);
    info.extend_from_slice(HKDF_INFO_PREFIX);
    info.extend_from_slice(object_id);

    // salt = None: HKDF uses a zero-filled salt of hash length
    let hkdf = Hkdf::<Sha256>::new(None, master_key);
    let mut okm = [0u8; DERIVED_KEY_LEN];
    hkdf.expand(&info, &mut okm).map_err(|e| {
        CryptoError::invalid_input("derive_key", format!("HKDF expand failed: {}", e))
    })?;

    let key = DerivedKey(okm);
    okm.zeroize();
    Ok(key)
}

/// Seal `plaintext` under a derived key. See [`aes_gcm::seal`].
pub fn seal(
    key: &DerivedKey,
    plaintext: &[u8],
    aad: Option<&[u8]>,
) -> Result<SealedPayload, CryptoError> {
    aes_gcm::seal(key.as_ref(), plaintext, aad)
}

/// Open a sealed payload under a derived key. See [`aes_gcm::open`].
pub fn open(
    key: &DerivedKey,
    sealed: &SealedPayload,
    aad: Option<&[u8]>,
) -> Result<Vec<u8>, CryptoError> {
    aes_gcm::open(key.as_ref(), sealed, aad)
}

/// Serialize `value` to canonical JSON (sorted keys, compact) and seal it
pub fn seal_json<T: Serialize + ?Sized>(
    key: &DerivedKey,
    value: &T,
    aad: Option<&[u8]>,
) -> Result<SealedPayload, CryptoError> {
    let bytes = canonical_json(value)?;
    seal(key, &bytes, aad)
}

/// Open a sealed payload and parse the plaintext as JSON
///
/// # Errors
///
/// - `Integrity` if the payload does not authenticate
/// - `Deserialization` if the plaintext is not valid JSON for `T`
pub fn open_json<T: DeserializeOwned>(
    key: &DerivedKey,
    sealed: &SealedPayload,
    aad: Option<&[u8]>,
) -> Result<T, CryptoError> {
    let mut plaintext = open(key, sealed, aad)?;
    let parsed = serde_json::from_slice(&plaintext)
        .map_err(|e| CryptoError::Deserialization(format!("decrypted payload is not valid JSON: {}", e)));
    plaintext.zeroize();
    parsed
}

/// Compact JSON with object keys sorted at every level
pub fn canonical_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, CryptoError> {
    let value = serde_json::to_value(value)
        .map_err(|e| CryptoError::Serialization(e.to_string()))?;
    serde_json::to_vec(&sort_json_keys(&value))
        .map_err(|e| CryptoError::Serialization(e.to_string()))
}

fn sort_json_keys(value: &serde_json::Value) -> serde_json::Value {
    use serde_json::Value;
    match value {
        Value::Object(map) => {
            let mut keys: Vec<_> = map.keys().collect();
            keys.sort();
            let mut sorted = serde_json::Map::new();
            for key in keys {
                sorted.insert(key.clone(), sort_json_keys(&map[key]));
            }
            Value::Object(sorted)
        }
        Value::Array(arr) => Value::Array(arr.iter().map(sort_json_keys).collect()),
        _ => value.clone(),
    }
}
