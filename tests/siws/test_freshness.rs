// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Freshness window tests
//!
//! A challenge is accepted only while |now - issuedAt| <= 10 minutes, in
//! both directions.

use super::helpers::*;
use chrono::Duration;

fn verify_issued(offset: Duration) -> bool {
    let key = keypair();
    let challenge = challenge_at(now() + offset);
    let response = sign(&key, &challenge);
    verifier().verify_at(&challenge, &response, now())
}

#[test]
fn test_just_inside_window_in_past() {
    assert!(verify_issued(-(Duration::minutes(10) - Duration::seconds(1))));
}

#[test]
fn test_just_outside_window_in_past() {
    assert!(!verify_issued(-(Duration::minutes(10) + Duration::seconds(1))));
}

#[test]
fn test_just_inside_window_in_future() {
    assert!(verify_issued(Duration::minutes(10) - Duration::seconds(1)));
}

#[test]
fn test_just_outside_window_in_future() {
    assert!(!verify_issued(Duration::minutes(10) + Duration::seconds(1)));
}

#[test]
fn test_same_challenge_expires_later() {
    let key = keypair();
    let challenge = challenge_at(now());
    let response = sign(&key, &challenge);
    let v = verifier();

    assert!(v.verify_at(&challenge, &response, now()));
    assert!(v.verify_at(&challenge, &response, now() + Duration::minutes(9)));
    assert!(!v.verify_at(&challenge, &response, now() + Duration::minutes(11)));
}

#[test]
fn test_missing_issued_at_rejected() {
    let key = keypair();
    let mut challenge = challenge_at(now());
    challenge.issued_at = None;
    let response = sign(&key, &challenge);
    assert!(!verifier().verify_at(&challenge, &response, now()));
}

#[test]
fn test_non_canonical_issued_at_rejected() {
    let key = keypair();
    for issued_at in [
        "2025-06-01T12:00:00Z",
        "2025-06-01T12:00:00.000+00:00",
        "2025-06-01T14:00:00.000+02:00",
        "2025-06-01T12:00:00.0Z",
    ] {
        let mut challenge = challenge_at(now());
        challenge.issued_at = Some(issued_at.to_string());
        let response = sign(&key, &challenge);
        assert!(
            !verifier().verify_at(&challenge, &response, now()),
            "{} should be rejected",
            issued_at
        );
    }
}
