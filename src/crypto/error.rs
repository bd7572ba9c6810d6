// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Crypto Error Types
//!
//! Error taxonomy for the envelope encryption helper.
//!
//! ## Error Variants
//!
//! - **InvalidInput**: cheap invariant violations (short master key, object id
//!   not 32 bytes, key import failure). Programming errors, never retried.
//! - **Integrity**: AEAD tag verification failed (tampered ciphertext, wrong
//!   key, wrong IV, mismatched AAD). The caller must abort the operation.
//! - **Serialization** / **Deserialization**: JSON wrapper failures.
//! - **Environment**: no secure random source or primitive available. Fatal.
//!
//! Signature verification failures are *not* represented here: the SIWS
//! verifier reports those as `false`.

use thiserror::Error;

/// Error type for all envelope encryption operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Input violated a checked invariant
    #[error("Invalid input for {operation}: {reason}")]
    InvalidInput {
        /// Which operation rejected the input (e.g. "derive_key")
        operation: String,
        /// Specific failure reason
        reason: String,
    },

    /// Authentication tag did not verify
    #[error("Integrity check failed during {operation}: {reason}")]
    Integrity {
        /// Which operation was being performed
        operation: String,
        /// Specific failure reason
        reason: String,
    },

    /// Value could not be serialized before sealing
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// Opened plaintext was not valid JSON for the requested type
    #[error("Deserialization failed: {0}")]
    Deserialization(String),

    /// Runtime lacks a secure random source or crypto primitive
    #[error("Crypto environment unavailable: {0}")]
    Environment(String),
}

impl CryptoError {
    pub(crate) fn invalid_input(operation: &str, reason: impl Into<String>) -> Self {
        CryptoError::InvalidInput {
            operation: operation.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn integrity(operation: &str, reason: impl Into<String>) -> Self {
        CryptoError::Integrity {
            operation: operation.to_string(),
            reason: reason.into(),
        }
    }

    /// True for failures that indicate tampering or a wrong key
    pub fn is_integrity(&self) -> bool {
        matches!(self, CryptoError::Integrity { .. })
    }
}

impl From<rand::Error> for CryptoError {
    fn from(err: rand::Error) -> Self {
        CryptoError::Environment(format!("secure random source failed: {}", err))
    }
}
