// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Sign-In-With-Solana verification
//!
//! Decides whether a wallet response proves that the holder of
//! `account.publicKey` consented to this exact challenge, recently, for this
//! exact service. Checks run cheapest first and the first failure wins:
//!
//! 1. domain, version, chain id, statement (exact match)
//! 2. nonce format and canonical `issuedAt` inside the freshness window
//! 3. signature type and byte-array shapes
//! 4. base58(publicKey) == address, before any curve math
//! 5. signed message equals the message rebuilt from the challenge
//! 6. Ed25519 signature over the signed message
//!
//! A failed check is a normal outcome and yields `false`, never an error.

use chrono::{DateTime, Utc};
use ed25519_dalek::{Signature, VerifyingKey};

use super::challenge::{SignInChallenge, SIWS_VERSION};
use super::message::SignInMessage;
use super::response::{SignInResponse, SIGNATURE_TYPE_ED25519};
use super::validation::{
    has_valid_public_key, is_non_empty, is_valid_nonce, is_within_window,
    parse_canonical_timestamp, PUBLIC_KEY_LEN,
};
use crate::config::SiwsConfig;

/// Stateless verifier bound to one service's sign-in contract
#[derive(Debug, Clone)]
pub struct SiwsVerifier {
    config: SiwsConfig,
}

impl SiwsVerifier {
    pub fn new(config: SiwsConfig) -> Self {
        Self { config }
    }

    /// Verify against the current wall clock
    pub fn verify(&self, challenge: &SignInChallenge, response: &SignInResponse) -> bool {
        self.verify_at(challenge, response, Utc::now())
    }

    /// Verify as of `now`
    pub fn verify_at(
        &self,
        challenge: &SignInChallenge,
        response: &SignInResponse,
        now: DateTime<Utc>,
    ) -> bool {
        match self.check(challenge, response, now) {
            Ok(()) => true,
            Err(reason) => {
                tracing::debug!("SIWS verification rejected: {}", reason);
                false
            }
        }
    }

    fn check(
        &self,
        challenge: &SignInChallenge,
        response: &SignInResponse,
        now: DateTime<Utc>,
    ) -> Result<(), &'static str> {
        if challenge.domain != self.config.domain {
            return Err("domain mismatch");
        }
        if challenge.version != SIWS_VERSION {
            return Err("unsupported version");
        }
        if let Some(expected) = &self.config.chain_id {
            if challenge.chain_id.as_ref() != Some(expected) {
                return Err("chain id mismatch");
            }
        }
        if challenge.statement != self.config.statement {
            return Err("statement mismatch");
        }
        if !is_valid_nonce(&challenge.nonce) {
            return Err("malformed nonce");
        }

        let issued_at = challenge
            .issued_at
            .as_deref()
            .ok_or("missing issuedAt")?;
        let issued_at = parse_canonical_timestamp(issued_at).ok_or("non-canonical issuedAt")?;
        if !is_within_window(issued_at, now, self.config.freshness_window_ms) {
            return Err("issuedAt outside freshness window");
        }

        if let Some(signature_type) = &response.signature_type {
            if signature_type != SIGNATURE_TYPE_ED25519 {
                return Err("unsupported signature type");
            }
        }

        let public_key = &response.account.public_key;
        if !has_valid_public_key(public_key) {
            return Err("public key must be 32 bytes");
        }
        if !is_non_empty(&response.signature) {
            return Err("empty signature");
        }
        if !is_non_empty(&response.signed_message) {
            return Err("empty signed message");
        }

        let derived_address = bs58::encode(public_key).into_string();
        if derived_address != response.account.address {
            return Err("address does not match public key");
        }
        if let Some(address) = &challenge.address {
            if *address != derived_address {
                return Err("challenge address does not match public key");
            }
        }

        let expected = SignInMessage::for_challenge(challenge, &derived_address);
        let parsed = SignInMessage::parse(&response.signed_message).ok_or("unparseable signed message")?;
        if parsed != expected {
            return Err("signed message does not match challenge");
        }
        if expected.format().as_bytes() != response.signed_message.as_slice() {
            return Err("signed message is not in canonical layout");
        }

        verify_ed25519(public_key, &response.signature, &response.signed_message)
    }
}

fn verify_ed25519(public_key: &[u8], signature: &[u8], message: &[u8]) -> Result<(), &'static str> {
    let key_bytes: &[u8; PUBLIC_KEY_LEN] = public_key
        .try_into()
        .map_err(|_| "public key must be 32 bytes")?;
    let verifying_key = VerifyingKey::from_bytes(key_bytes).map_err(|_| "invalid public key")?;
    let signature = Signature::from_slice(signature).map_err(|_| "malformed signature")?;
    verifying_key
        .verify_strict(message, &signature)
        .map_err(|_| "bad signature")
}
