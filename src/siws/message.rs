// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Sign-In-With-Solana message text
//!
//! The text a wallet signs follows the Solana wallet-standard layout:
//!
//! ```text
//! {domain} wants you to sign in with your Solana account:
//! {address}
//!
//! {statement}
//!
//! URI: {uri}
//! Version: {version}
//! Chain ID: {chainId}
//! Nonce: {nonce}
//! Issued At: {issuedAt}
//! Expiration Time: {expirationTime}
//! Not Before: {notBefore}
//! Request ID: {requestId}
//! Resources:
//! - {resource}
//! ```
//!
//! Absent fields are omitted, and so is the whole field block when every
//! field is absent.

use super::challenge::SignInChallenge;

const HEADER_SUFFIX: &str = " wants you to sign in with your Solana account:";

const URI: &str = "URI: ";
const VERSION: &str = "Version: ";
const CHAIN_ID: &str = "Chain ID: ";
const NONCE: &str = "Nonce: ";
const ISSUED_AT: &str = "Issued At: ";
const EXPIRATION_TIME: &str = "Expiration Time: ";
const NOT_BEFORE: &str = "Not Before: ";
const REQUEST_ID: &str = "Request ID: ";
const RESOURCES: &str = "Resources:";
const RESOURCE_ITEM: &str = "- ";

const FIELD_PREFIXES: [&str; 9] = [
    URI,
    VERSION,
    CHAIN_ID,
    NONCE,
    ISSUED_AT,
    EXPIRATION_TIME,
    NOT_BEFORE,
    REQUEST_ID,
    RESOURCES,
];

/// Structured form of a sign-in message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignInMessage {
    pub domain: String,
    pub address: String,
    pub statement: Option<String>,
    pub uri: Option<String>,
    pub version: Option<String>,
    pub chain_id: Option<String>,
    pub nonce: Option<String>,
    pub issued_at: Option<String>,
    pub expiration_time: Option<String>,
    pub not_before: Option<String>,
    pub request_id: Option<String>,
    pub resources: Option<Vec<String>>,
}

impl SignInMessage {
    /// The message a wallet is expected to sign for `challenge` as `address`
    pub fn for_challenge(challenge: &SignInChallenge, address: &str) -> Self {
        Self {
            domain: challenge.domain.clone(),
            address: address.to_string(),
            statement: Some(challenge.statement.clone()).filter(|s| !s.is_empty()),
            uri: challenge.uri.clone(),
            version: Some(challenge.version.clone()).filter(|s| !s.is_empty()),
            chain_id: challenge.chain_id.clone(),
            nonce: Some(challenge.nonce.clone()).filter(|s| !s.is_empty()),
            issued_at: challenge.issued_at.clone(),
            expiration_time: challenge.expiration_time.clone(),
            not_before: challenge.not_before.clone(),
            request_id: challenge.request_id.clone(),
            resources: challenge.resources.clone(),
        }
    }

    /// Render the message text
    pub fn format(&self) -> String {
        let mut message = format!("{}{}\n{}", self.domain, HEADER_SUFFIX, self.address);

        if let Some(statement) = &self.statement {
            message.push_str("\n\n");
            message.push_str(statement);
        }

        let mut fields: Vec<String> = Vec::new();
        let simple = [
            (URI, &self.uri),
            (VERSION, &self.version),
            (CHAIN_ID, &self.chain_id),
            (NONCE, &self.nonce),
            (ISSUED_AT, &self.issued_at),
            (EXPIRATION_TIME, &self.expiration_time),
            (NOT_BEFORE, &self.not_before),
            (REQUEST_ID, &self.request_id),
        ];
        for (prefix, value) in simple {
            if let Some(value) = value {
                fields.push(format!("{}{}", prefix, value));
            }
        }
        if let Some(resources) = &self.resources {
            fields.push(RESOURCES.to_string());
            for resource in resources {
                fields.push(format!("{}{}", RESOURCE_ITEM, resource));
            }
        }

        if !fields.is_empty() {
            message.push_str("\n\n");
            message.push_str(&fields.join("\n"));
        }

        message
    }

    /// Parse signed message bytes. Returns `None` for anything that does not
    /// follow the layout exactly.
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        let text = std::str::from_utf8(bytes).ok()?;
        let lines: Vec<&str> = text.split('\n').collect();

        let domain = lines.first()?.strip_suffix(HEADER_SUFFIX)?;
        let address = *lines.get(1)?;
        if domain.is_empty() || address.is_empty() || address.contains(char::is_whitespace) {
            return None;
        }

        let mut message = SignInMessage {
            domain: domain.to_string(),
            address: address.to_string(),
            ..Default::default()
        };

        let rest = &lines[2..];
        if rest.is_empty() {
            return Some(message);
        }

        // Every following block is introduced by an empty line
        let mut idx = 0;
        if !rest[idx].is_empty() {
            return None;
        }
        idx += 1;
        let first: &str = rest.get(idx)?;
        if !is_field_line(first) {
            if first.is_empty() {
                return None;
            }
            message.statement = Some(first.to_string());
            idx += 1;
            if idx == rest.len() {
                return Some(message);
            }
            if !rest[idx].is_empty() {
                return None;
            }
            idx += 1;
            if idx == rest.len() {
                return None;
            }
        }

        let slots: [(&str, &mut Option<String>); 8] = [
            (URI, &mut message.uri),
            (VERSION, &mut message.version),
            (CHAIN_ID, &mut message.chain_id),
            (NONCE, &mut message.nonce),
            (ISSUED_AT, &mut message.issued_at),
            (EXPIRATION_TIME, &mut message.expiration_time),
            (NOT_BEFORE, &mut message.not_before),
            (REQUEST_ID, &mut message.request_id),
        ];
        for (prefix, slot) in slots {
            if let Some(value) = rest.get(idx).and_then(|line| line.strip_prefix(prefix)) {
                if value.is_empty() {
                    return None;
                }
                *slot = Some(value.to_string());
                idx += 1;
            }
        }

        if rest.get(idx) == Some(&RESOURCES) {
            idx += 1;
            let mut resources = Vec::new();
            while let Some(resource) = rest.get(idx).and_then(|line| line.strip_prefix(RESOURCE_ITEM)) {
                resources.push(resource.to_string());
                idx += 1;
            }
            message.resources = Some(resources);
        }

        if idx != rest.len() {
            return None;
        }
        Some(message)
    }
}

fn is_field_line(line: &str) -> bool {
    FIELD_PREFIXES.iter().any(|prefix| line.starts_with(*prefix))
}
