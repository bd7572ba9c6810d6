// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Sign-in challenges and their generator

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::to_canonical_timestamp;
use crate::config::SiwsConfig;
use crate::crypto::SecureRandom;

/// The only supported challenge version
pub const SIWS_VERSION: &str = "1";
/// Length of generated nonces
pub const NONCE_LEN: usize = 32;

/// Challenge a wallet is asked to sign. Never stored server-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInChallenge {
    pub domain: String,
    pub statement: String,
    pub version: String,
    pub nonce: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_before: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<String>>,
}

/// Issues fresh challenges for the configured service
///
/// No ledger of issued nonces is kept: uniqueness comes from 32 characters
/// over a 62-symbol alphabet (~190 bits) plus the freshness window.
pub struct ChallengeGenerator {
    config: SiwsConfig,
    rng: SecureRandom,
}

impl ChallengeGenerator {
    pub fn new(config: SiwsConfig, rng: SecureRandom) -> Self {
        if rng.is_degraded() {
            tracing::warn!("⚠️  Challenge generator running with a DEGRADED random source");
        }
        Self { config, rng }
    }

    pub fn generate(&self) -> SignInChallenge {
        self.generate_at(Utc::now())
    }

    pub fn generate_at(&self, now: DateTime<Utc>) -> SignInChallenge {
        let challenge = SignInChallenge {
            domain: self.config.domain.clone(),
            statement: self.config.statement.clone(),
            version: SIWS_VERSION.to_string(),
            nonce: self.rng.alphanumeric(NONCE_LEN),
            chain_id: self.config.chain_id.clone(),
            issued_at: Some(to_canonical_timestamp(now)),
            address: None,
            uri: self.config.uri.clone(),
            expiration_time: None,
            not_before: None,
            request_id: None,
            resources: None,
        };
        tracing::debug!(
            "Issued sign-in challenge for {} at {:?}",
            challenge.domain,
            challenge.issued_at
        );
        challenge
    }

    pub fn is_degraded(&self) -> bool {
        self.rng.is_degraded()
    }
}
