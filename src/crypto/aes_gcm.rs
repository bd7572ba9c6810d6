// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! AES-256-GCM sealing
//!
//! Authenticated encryption under a 32-byte derived key. Every call to
//! [`seal`] draws a fresh random 12-byte IV, so a derived key may protect
//! more than one plaintext without IV reuse.
//!
//! **Wire format** (Web Crypto API compatible):
//! ```text
//! [iv (12 bytes) | ciphertext+tag (variable length)]
//! ```
//!
//! - IV: 12 bytes (96 bits), unique per seal
//! - Ciphertext+Tag: encrypted data + 16-byte authentication tag
//! - AAD: optional, authenticated but not encrypted

use aes_gcm::{
    aead::{Aead, KeyInit, Payload},
    Aes256Gcm, Nonce,
};
use serde::{Deserialize, Serialize};

use super::random::fill_secure;
use super::CryptoError;

/// IV length for AES-GCM
pub const IV_LEN: usize = 12;
/// Authentication tag length appended to every ciphertext
pub const TAG_LEN: usize = 16;
/// AES-256 key length
pub const KEY_LEN: usize = 32;

/// Output of [`seal`]: the IV and the ciphertext with its tag appended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedPayload {
    #[serde(with = "b64_iv")]
    pub iv: [u8; IV_LEN],
    #[serde(with = "b64_bytes")]
    pub ciphertext: Vec<u8>,
}

impl SealedPayload {
    /// Concatenate into the `iv | ciphertext+tag` layout
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(IV_LEN + self.ciphertext.len());
        out.extend_from_slice(&self.iv);
        out.extend_from_slice(&self.ciphertext);
        out
    }

    /// Split an `iv | ciphertext+tag` buffer
    ///
    /// Fails if the buffer cannot even hold an IV and a tag.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() < IV_LEN + TAG_LEN {
            return Err(CryptoError::invalid_input(
                "sealed_payload",
                format!(
                    "expected at least {} bytes (iv + tag), got {}",
                    IV_LEN + TAG_LEN,
                    bytes.len()
                ),
            ));
        }
        let mut iv = [0u8; IV_LEN];
        iv.copy_from_slice(&bytes[..IV_LEN]);
        Ok(Self {
            iv,
            ciphertext: bytes[IV_LEN..].to_vec(),
        })
    }
}

fn cipher_for(key: &[u8], operation: &str) -> Result<Aes256Gcm, CryptoError> {
    if key.len() != KEY_LEN {
        return Err(CryptoError::invalid_input(
            operation,
            format!("key must be {} bytes, got {}", KEY_LEN, key.len()),
        ));
    }
    Aes256Gcm::new_from_slice(key)
        .map_err(|e| CryptoError::invalid_input(operation, format!("key import failed: {}", e)))
}

/// Encrypt `plaintext` under `key` with a fresh random IV
///
/// # Errors
///
/// - `InvalidInput` if the key is not 32 bytes
/// - `Environment` if the OS random source cannot supply an IV
pub fn seal(key: &[u8], plaintext: &[u8], aad: Option<&[u8]>) -> Result<SealedPayload, CryptoError> {
    let cipher = cipher_for(key, "seal")?;

    let mut iv = [0u8; IV_LEN];
    fill_secure(&mut iv)?;

    let ciphertext = cipher
        .encrypt(
            Nonce::from_slice(&iv),
            Payload {
                msg: plaintext,
                aad: aad.unwrap_or_default(),
            },
        )
        .map_err(|e| CryptoError::Environment(format!("AES-GCM encryption failed: {}", e)))?;

    Ok(SealedPayload { iv, ciphertext })
}

/// Decrypt and authenticate a sealed payload
///
/// # Errors
///
/// - `InvalidInput` if the key is not 32 bytes
/// - `Integrity` if the tag does not verify. No plaintext is returned in
///   that case.
pub fn open(key: &[u8], sealed: &SealedPayload, aad: Option<&[u8]>) -> Result<Vec<u8>, CryptoError> {
    let cipher = cipher_for(key, "open")?;

    if sealed.ciphertext.len() < TAG_LEN {
        return Err(CryptoError::integrity(
            "open",
            format!(
                "ciphertext shorter than the {}-byte tag ({} bytes)",
                TAG_LEN,
                sealed.ciphertext.len()
            ),
        ));
    }

    cipher
        .decrypt(
            Nonce::from_slice(&sealed.iv),
            Payload {
                msg: &sealed.ciphertext,
                aad: aad.unwrap_or_default(),
            },
        )
        .map_err(|_| {
            CryptoError::integrity(
                "open",
                "authentication tag mismatch (wrong key, IV, AAD or tampered ciphertext)",
            )
        })
}

mod b64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(d)?;
        STANDARD.decode(s).map_err(serde::de::Error::custom)
    }
}

mod b64_iv {
    use super::IV_LEN;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(iv: &[u8; IV_LEN], s: S) -> Result<S::Ok, S::Error> {
        super::b64_bytes::serialize(iv, s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<[u8; IV_LEN], D::Error> {
        let bytes = super::b64_bytes::deserialize(d)?;
        bytes.as_slice().try_into().map_err(|_| {
            serde::de::Error::custom(format!("iv must be {} bytes, got {}", IV_LEN, bytes.len()))
        })
    }
}
