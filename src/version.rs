// Version information for siws-vault

/// Full version string with feature description
pub const VERSION: &str = "v0.1.0-siws-envelope-2025-10-19";

/// Semantic version number
pub const VERSION_NUMBER: &str = env!("CARGO_PKG_VERSION");

/// Build date
pub const BUILD_DATE: &str = "2025-10-19";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "siws-verification",
    "ed25519",
    "challenge-issuance",
    "replay-ledger",
    "hkdf-sha256-derivation",
    "aes-256-gcm",
    "canonical-json-sealing",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("siws-vault {} ({})", VERSION_NUMBER, BUILD_DATE)
}
