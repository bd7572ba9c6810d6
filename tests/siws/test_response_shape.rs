// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Wire shape of challenges and responses

use super::helpers::*;
use serde_json::json;
use siws_vault::siws::{SignInChallenge, SignInResponse};

#[test]
fn test_response_from_wallet_json() {
    let key = keypair();
    let challenge = challenge_at(now());
    let signed = sign(&key, &challenge);

    let wire = json!({
        "account": {
            "address": signed.account.address,
            "publicKey": signed.account.public_key,
        },
        "signature": signed.signature,
        "signedMessage": signed.signed_message,
        "signatureType": "ed25519",
    });
    let parsed: SignInResponse = serde_json::from_value(wire).unwrap();
    assert_eq!(parsed, signed);
    assert!(verifier().verify_at(&challenge, &parsed, now()));
}

#[test]
fn test_byte_out_of_range_rejected() {
    let wire = json!({
        "account": { "address": "x", "publicKey": [1, 2, 256] },
        "signature": [1],
        "signedMessage": [1],
    });
    assert!(serde_json::from_value::<SignInResponse>(wire).is_err());
}

#[test]
fn test_challenge_round_trips_camel_case() {
    let challenge = challenge_at(now());
    let value = serde_json::to_value(&challenge).unwrap();

    assert_eq!(value["chainId"], CHAIN_ID);
    assert_eq!(value["issuedAt"], "2025-06-01T12:00:00.000Z");
    assert!(value.get("address").is_none());
    assert!(value.get("requestId").is_none());

    let back: SignInChallenge = serde_json::from_value(value).unwrap();
    assert_eq!(back, challenge);
}
