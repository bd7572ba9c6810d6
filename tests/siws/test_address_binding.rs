// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Address/key binding tests

use super::helpers::*;

#[test]
fn test_mismatched_address_rejected_with_valid_signature() {
    let key = keypair();
    let other = keypair();
    let challenge = challenge_at(now());
    let mut response = sign(&key, &challenge);

    response.account.address = address_of(&other);
    assert!(!verifier().verify_at(&challenge, &response, now()));
}

#[test]
fn test_mismatched_address_rejected_with_garbage_signature() {
    let key = keypair();
    let other = keypair();
    let challenge = challenge_at(now());
    let mut response = sign(&key, &challenge);

    response.account.address = address_of(&other);
    response.signature = vec![0xde, 0xad, 0xbe, 0xef];
    assert!(!verifier().verify_at(&challenge, &response, now()));
}

#[test]
fn test_address_case_matters() {
    let key = keypair();
    let challenge = challenge_at(now());
    let mut response = sign(&key, &challenge);

    response.account.address = response.account.address.to_lowercase();
    assert!(!verifier().verify_at(&challenge, &response, now()));
}

#[test]
fn test_challenge_address_must_match_key() {
    let key = keypair();
    let mut challenge = challenge_at(now());

    challenge.address = Some(address_of(&key));
    let response = sign(&key, &challenge);
    assert!(verifier().verify_at(&challenge, &response, now()));

    challenge.address = Some(address_of(&keypair()));
    let response = sign(&key, &challenge);
    assert!(!verifier().verify_at(&challenge, &response, now()));
}

#[test]
fn test_signature_by_other_key_rejected() {
    let key = keypair();
    let impostor = keypair();
    let challenge = challenge_at(now());
    let genuine = sign(&key, &challenge);
    let forged = sign(&impostor, &challenge);

    let mut response = genuine.clone();
    response.signature = forged.signature;
    assert!(!verifier().verify_at(&challenge, &response, now()));
}
