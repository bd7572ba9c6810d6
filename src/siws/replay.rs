// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Replay Ledger
//!
//! Short-TTL record of `(address, nonce)` pairs that already produced a
//! successful sign-in. The HTTP boundary consults it around each call to
//! the verifier so a captured response cannot be replayed inside the
//! freshness window. The verifier itself stays pure.
//!
//! **Storage**: in memory only; entries expire after the configured TTL.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

type LedgerKey = (String, String);

/// Thread-safe set of recently used sign-in nonces
///
/// # Example
///
/// ```ignore
/// let ledger = NonceLedger::new(Duration::minutes(30));
/// assert!(ledger.check_and_record("addr", "nonce", Utc::now()).await);
/// assert!(!ledger.check_and_record("addr", "nonce", Utc::now()).await);
/// ```
#[derive(Clone)]
pub struct NonceLedger {
    entries: Arc<RwLock<HashMap<LedgerKey, DateTime<Utc>>>>,
    ttl: Duration,
}

impl NonceLedger {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// TTL in whole seconds, saturating at the largest representable duration
    pub fn from_secs(ttl_secs: u64) -> Self {
        let ttl = i64::try_from(ttl_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or_else(|| Duration::milliseconds(i64::MAX));
        Self::new(ttl)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn expiry(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_add_signed(self.ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// True if the pair was recorded and has not expired as of `now`
    pub async fn contains(&self, address: &str, nonce: &str, now: DateTime<Utc>) -> bool {
        let entries = self.entries.read().await;
        entries
            .get(&(address.to_string(), nonce.to_string()))
            .map_or(false, |expires_at| *expires_at > now)
    }

    /// Record the pair unless it is already live
    ///
    /// Returns `false` when the pair was seen before and has not expired,
    /// i.e. the request is a replay.
    pub async fn check_and_record(&self, address: &str, nonce: &str, now: DateTime<Utc>) -> bool {
        let mut entries = self.entries.write().await;
        let key = (address.to_string(), nonce.to_string());
        if let Some(expires_at) = entries.get(&key) {
            if *expires_at > now {
                tracing::warn!("🚫 Replayed sign-in nonce for address {}", address);
                return false;
            }
        }
        let expires_at = self.expiry(now);
        entries.insert(key, expires_at);
        true
    }

    /// Drop expired entries, returning how many were removed
    pub async fn prune_expired(&self, now: DateTime<Utc>) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, expires_at| *expires_at > now);
        let removed = before - entries.len();
        if removed > 0 {
            tracing::debug!(
                "🗑️  Pruned {} expired sign-in nonces (remaining: {})",
                removed,
                entries.len()
            );
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl Default for NonceLedger {
    fn default() -> Self {
        Self::from_secs(crate::config::DEFAULT_REPLAY_TTL_SECS)
    }
}
