// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Service configuration
//!
//! Loaded from a TOML file, then overridden by environment variables:
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//!
//! [siws]
//! domain = "app.example.com"
//! statement = "Sign in to the private assistant."
//! chain_id = "solana:mainnet"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Default freshness window: 10 minutes
pub const DEFAULT_FRESHNESS_WINDOW_MS: u64 = 600_000;
/// Default lifetime of replay ledger entries
///
/// A response stays fresh from `issuedAt - window` to `issuedAt + window`,
/// so ledger entries must outlive twice the freshness window.
pub const DEFAULT_REPLAY_TTL_SECS: u64 = 1_800;
/// Upper bound on the replay ledger TTL: one day
pub const MAX_REPLAY_TTL_SECS: u64 = 86_400;

pub const DEFAULT_DOMAIN: &str = "localhost:3000";
pub const DEFAULT_STATEMENT: &str =
    "Sign in to your private AI assistant. This request will not trigger a blockchain transaction or cost any fees.";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: String, reason: String },
}

/// Sign-in contract enforced by the verifier and used by the generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiwsConfig {
    /// Canonical host name; compared case-sensitively
    pub domain: String,
    /// Fixed consent text
    pub statement: String,
    /// Expected network identifier, e.g. `solana:mainnet`
    pub chain_id: Option<String>,
    /// URI placed in issued challenges
    pub uri: Option<String>,
    pub freshness_window_ms: u64,
    pub replay_ttl_secs: u64,
}

impl Default for SiwsConfig {
    fn default() -> Self {
        Self {
            domain: DEFAULT_DOMAIN.to_string(),
            statement: DEFAULT_STATEMENT.to_string(),
            chain_id: None,
            uri: None,
            freshness_window_ms: DEFAULT_FRESHNESS_WINDOW_MS,
            replay_ttl_secs: DEFAULT_REPLAY_TTL_SECS,
        }
    }
}

impl SiwsConfig {
    pub fn new(domain: impl Into<String>, statement: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            statement: statement.into(),
            ..Default::default()
        }
    }

    pub fn with_chain_id(mut self, chain_id: impl Into<String>) -> Self {
        self.chain_id = Some(chain_id.into());
        self
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    pub fn with_freshness_window_ms(mut self, window_ms: u64) -> Self {
        self.freshness_window_ms = window_ms;
        self
    }

    pub fn with_replay_ttl_secs(mut self, ttl_secs: u64) -> Self {
        self.replay_ttl_secs = ttl_secs;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.domain.trim().is_empty() {
            return Err(invalid("siws.domain", "must not be empty"));
        }
        if self.statement.is_empty() {
            return Err(invalid("siws.statement", "must not be empty"));
        }
        if self.statement.contains('\n') {
            return Err(invalid("siws.statement", "must be a single line"));
        }
        if self.freshness_window_ms == 0 {
            return Err(invalid("siws.freshness_window_ms", "must be greater than zero"));
        }
        if self.chain_id.as_deref() == Some("") {
            return Err(invalid("siws.chain_id", "must not be empty when set"));
        }
        if self.replay_ttl_secs > MAX_REPLAY_TTL_SECS {
            return Err(invalid(
                "siws.replay_ttl_secs",
                format!("must be at most {} seconds", MAX_REPLAY_TTL_SECS),
            ));
        }
        // A pair forgotten by the ledger must no longer pass freshness
        let ttl_ms = self.replay_ttl_secs.saturating_mul(1_000);
        if ttl_ms <= self.freshness_window_ms.saturating_mul(2) {
            return Err(invalid(
                "siws.replay_ttl_secs",
                format!(
                    "must exceed twice the freshness window ({} ms), got {} s",
                    self.freshness_window_ms, self.replay_ttl_secs
                ),
            ));
        }
        Ok(())
    }
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_permissive: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            cors_permissive: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub siws: SiwsConfig,
}

impl AppConfig {
    /// Parse TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    /// Load from an optional file, apply environment overrides and validate
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.siws.validate()?;
        Ok(config)
    }

    /// Override fields from `lookup` (normally the process environment)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("SIWS_DOMAIN") {
            self.siws.domain = val;
        }
        if let Some(val) = lookup("SIWS_STATEMENT") {
            self.siws.statement = val;
        }
        if let Some(val) = lookup("SIWS_CHAIN_ID") {
            self.siws.chain_id = Some(val).filter(|v| !v.is_empty());
        }
        if let Some(val) = lookup("SIWS_URI") {
            self.siws.uri = Some(val).filter(|v| !v.is_empty());
        }
        if let Some(val) = lookup("SIWS_FRESHNESS_MS") {
            self.siws.freshness_window_ms = parse_number("SIWS_FRESHNESS_MS", &val)?;
        }
        if let Some(val) = lookup("SIWS_REPLAY_TTL_SECS") {
            self.siws.replay_ttl_secs = parse_number("SIWS_REPLAY_TTL_SECS", &val)?;
        }
        if let Some(val) = lookup("API_HOST") {
            self.server.host = val;
        }
        if let Some(val) = lookup("API_PORT") {
            self.server.port = parse_number("API_PORT", &val)?;
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_number<T: std::str::FromStr>(field: &str, val: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    val.parse()
        .map_err(|e: T::Err| invalid(field, format!("'{}' is not a valid number: {}", val, e)))
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field: field.to_string(),
        reason: reason.into(),
    }
}
