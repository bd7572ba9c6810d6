// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod siws;
pub mod version;

// Re-export main types
pub use config::{AppConfig, ServerConfig, SiwsConfig};
pub use crypto::{
    derive_key, generate_master_key, open, open_json, seal, seal_json, CryptoError, DerivedKey,
    MasterKey, SealedPayload,
};
pub use siws::{
    ChallengeGenerator, NonceLedger, SignInAccount, SignInChallenge, SignInResponse, SiwsVerifier,
};
