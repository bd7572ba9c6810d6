// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Replay ledger lifetime against the freshness window
//!
//! A future-dated challenge stays fresh for up to twice the window after it
//! is first accepted, so the ledger must remember it at least that long.

use super::helpers::*;
use chrono::Duration;
use siws_vault::config::{DEFAULT_FRESHNESS_WINDOW_MS, DEFAULT_REPLAY_TTL_SECS};
use siws_vault::siws::NonceLedger;

#[tokio::test]
async fn test_future_dated_sign_in_cannot_be_replayed() {
    let key = keypair();
    let challenge = challenge_at(now() + Duration::minutes(10));
    let response = sign(&key, &challenge);
    let verifier = verifier();
    let ledger = NonceLedger::from_secs(DEFAULT_REPLAY_TTL_SECS);
    let address = response.account.address.clone();

    assert!(verifier.verify_at(&challenge, &response, now()));
    assert!(ledger.check_and_record(&address, &challenge.nonce, now()).await);

    // Every instant at which the response is still fresh must hit the ledger
    let mut seconds = 1;
    while seconds <= 21 * 60 {
        let at = now() + Duration::seconds(seconds);
        if verifier.verify_at(&challenge, &response, at) {
            assert!(
                ledger.contains(&address, &challenge.nonce, at).await,
                "fresh but forgotten {}s after first use",
                seconds
            );
            assert!(!ledger.check_and_record(&address, &challenge.nonce, at).await);
        }
        seconds += 30;
    }
}

#[tokio::test]
async fn test_replay_at_edge_of_window() {
    let key = keypair();
    let challenge = challenge_at(now() + Duration::minutes(10));
    let response = sign(&key, &challenge);
    let verifier = verifier();
    let ledger = NonceLedger::from_secs(DEFAULT_REPLAY_TTL_SECS);
    let address = response.account.address.clone();

    assert!(ledger.check_and_record(&address, &challenge.nonce, now()).await);

    let edge = now() + Duration::milliseconds(2 * DEFAULT_FRESHNESS_WINDOW_MS as i64);
    assert!(verifier.verify_at(&challenge, &response, edge));
    assert!(ledger.contains(&address, &challenge.nonce, edge).await);

    let after = edge + Duration::seconds(1);
    assert!(!verifier.verify_at(&challenge, &response, after));
}
