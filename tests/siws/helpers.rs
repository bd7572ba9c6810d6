// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Shared fixtures for SIWS tests

use chrono::{DateTime, TimeZone, Utc};
use ed25519_dalek::{Signer, SigningKey};
use rand::rngs::OsRng;
use siws_vault::config::SiwsConfig;
use siws_vault::siws::{
    validation::to_canonical_timestamp, SignInAccount, SignInChallenge, SignInMessage,
    SignInResponse, SiwsVerifier,
};

pub const DOMAIN: &str = "app.example.com";
pub const STATEMENT: &str = "Sign in to your private AI assistant.";
pub const CHAIN_ID: &str = "solana:mainnet";
pub const NONCE: &str = "q8W3nT5vZ1kL7pR2xC9mB4yH6jD0fG3s";

/// Fixed verification instant
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

pub fn verifier() -> SiwsVerifier {
    SiwsVerifier::new(SiwsConfig::new(DOMAIN, STATEMENT).with_chain_id(CHAIN_ID))
}

pub fn keypair() -> SigningKey {
    SigningKey::generate(&mut OsRng)
}

pub fn address_of(key: &SigningKey) -> String {
    bs58::encode(key.verifying_key().as_bytes()).into_string()
}

pub fn challenge_at(issued_at: DateTime<Utc>) -> SignInChallenge {
    SignInChallenge {
        domain: DOMAIN.to_string(),
        statement: STATEMENT.to_string(),
        version: "1".to_string(),
        nonce: NONCE.to_string(),
        chain_id: Some(CHAIN_ID.to_string()),
        issued_at: Some(to_canonical_timestamp(issued_at)),
        address: None,
        uri: Some("https://app.example.com".to_string()),
        expiration_time: None,
        not_before: None,
        request_id: None,
        resources: None,
    }
}

/// Sign the message text a wallet would produce for `challenge`
pub fn sign(key: &SigningKey, challenge: &SignInChallenge) -> SignInResponse {
    let address = address_of(key);
    let message = SignInMessage::for_challenge(challenge, &address)
        .format()
        .into_bytes();
    SignInResponse {
        account: SignInAccount {
            address,
            public_key: key.verifying_key().as_bytes().to_vec(),
        },
        signature: key.sign(&message).to_bytes().to_vec(),
        signed_message: message,
        signature_type: Some("ed25519".to_string()),
    }
}
