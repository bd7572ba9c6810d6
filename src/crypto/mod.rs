// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Envelope Encryption Module
//!
//! Cryptographic primitives that protect chat content before it is written
//! to durable storage:
//!
//! - **Random**: OS CSPRNG access with a flagged, degraded fallback for nonces
//! - **AES-GCM**: AES-256-GCM sealing with a fresh 12-byte IV per call
//! - **Envelope**: master key generation and HKDF-SHA256 per-object key derivation
//!
//! ## Security Considerations
//!
//! - Derived keys are recomputed on demand and never persisted
//! - Key buffers are zeroed on drop (best effort)
//! - Tag verification failures surface as `CryptoError::Integrity` and are
//!   never retried here
//!
//! ## Protocol Flow
//!
//! 1. Uploader generates a fresh master key per object
//! 2. Storage assigns the object's 32-byte transaction id
//! 3. `derive_key(master, txid)` produces the object's AES key
//! 4. Payload is sealed (optionally as canonical JSON) and uploaded
//! 5. Reader holding the master key re-derives and opens

pub mod aes_gcm;
pub mod envelope;
pub mod error;
pub mod random;

pub use self::aes_gcm::{SealedPayload, IV_LEN, KEY_LEN, TAG_LEN};
pub use self::envelope::{
    canonical_json, derive_key, generate_master_key, open, open_json, seal, seal_json, DerivedKey,
    MasterKey, DEFAULT_MASTER_KEY_LEN, MIN_MASTER_KEY_LEN, OBJECT_ID_LEN,
};
pub use self::error::CryptoError;
pub use self::random::SecureRandom;
