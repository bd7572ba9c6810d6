// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Wallet output for a sign-in request

use serde::{Deserialize, Serialize};

/// The only signature scheme the verifier accepts
pub const SIGNATURE_TYPE_ED25519: &str = "ed25519";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInAccount {
    /// Base58 wallet address claimed by the client
    pub address: String,
    #[serde(with = "byte_array")]
    pub public_key: Vec<u8>,
}

/// Signed response produced by the wallet, consumed by one verification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub account: SignInAccount,
    #[serde(with = "byte_array")]
    pub signature: Vec<u8>,
    #[serde(with = "byte_array")]
    pub signed_message: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature_type: Option<String>,
}

/// Byte buffers travel as JSON arrays of integers in `[0, 255]`.
///
/// A base64 string is also accepted on input. Elements outside the byte
/// range fail deserialization, which the HTTP boundary reports as 400.
mod byte_array {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Array(Vec<u8>),
        Base64(String),
    }

    pub fn serialize<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.collect_seq(bytes)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        match Repr::deserialize(d) {
            Ok(Repr::Array(bytes)) => Ok(bytes),
            Ok(Repr::Base64(s)) => STANDARD
                .decode(s)
                .map_err(|e| serde::de::Error::custom(format!("invalid base64 bytes: {}", e))),
            Err(_) => Err(serde::de::Error::custom(
                "expected an array of integers in [0, 255] or a base64 string",
            )),
        }
    }
}
