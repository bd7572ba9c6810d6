// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Shared validation primitives for sign-in challenges

use chrono::{DateTime, SecondsFormat, Utc};
use regex::Regex;
use std::sync::OnceLock;

/// Nonces are 8 to 64 ASCII alphanumerics
pub const NONCE_PATTERN: &str = r"^[A-Za-z0-9]{8,64}$";

/// Ed25519 public keys are 32 bytes
pub const PUBLIC_KEY_LEN: usize = 32;

fn nonce_regex() -> &'static Regex {
    static NONCE_RE: OnceLock<Regex> = OnceLock::new();
    NONCE_RE.get_or_init(|| Regex::new(NONCE_PATTERN).expect("nonce pattern is valid"))
}

/// True if `nonce` is non-empty and matches [`NONCE_PATTERN`]
pub fn is_valid_nonce(nonce: &str) -> bool {
    !nonce.is_empty() && nonce_regex().is_match(nonce)
}

/// Format a timestamp in canonical form, e.g. `2025-01-31T12:00:00.000Z`
pub fn to_canonical_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse `value` only if it is already in canonical form
///
/// The value must survive a parse/re-serialize round trip byte for byte, so
/// offsets other than `Z`, missing milliseconds and extra precision are all
/// rejected.
pub fn parse_canonical_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc3339(value).ok()?.with_timezone(&Utc);
    if to_canonical_timestamp(parsed) == value {
        Some(parsed)
    } else {
        None
    }
}

/// True if `issued_at` lies within `window_ms` of `now`, in either direction
pub fn is_within_window(issued_at: DateTime<Utc>, now: DateTime<Utc>, window_ms: u64) -> bool {
    let diff = (now - issued_at).num_milliseconds().unsigned_abs();
    diff <= window_ms
}

/// Byte-array shape guards for a sign-in response
pub fn has_valid_public_key(public_key: &[u8]) -> bool {
    public_key.len() == PUBLIC_KEY_LEN
}

pub fn is_non_empty(bytes: &[u8]) -> bool {
    !bytes.is_empty()
}
