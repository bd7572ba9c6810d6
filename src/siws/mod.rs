// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Sign-In-With-Solana
//!
//! Challenge/response proof that a client controls a wallet's private key.
//! No server-side session state is needed: validity is re-derived from the
//! challenge's embedded timestamp and the service's domain/statement
//! contract.
//!
//! ## Flow
//!
//! 1. Server (or client) issues a `SignInChallenge` with a random nonce
//! 2. Wallet signs the formatted SIWS message text
//! 3. `SiwsVerifier::verify` checks freshness, address binding and the
//!    Ed25519 signature
//! 4. The boundary records `(address, nonce)` in the `NonceLedger`

pub mod challenge;
pub mod message;
pub mod replay;
pub mod response;
pub mod validation;
pub mod verifier;

pub use challenge::{ChallengeGenerator, SignInChallenge, NONCE_LEN, SIWS_VERSION};
pub use message::SignInMessage;
pub use replay::NonceLedger;
pub use response::{SignInAccount, SignInResponse, SIGNATURE_TYPE_ED25519};
pub use verifier::SiwsVerifier;
