// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Result};
use clap::Args;
use std::path::PathBuf;
use tracing::info;

use crate::api::{VerifyRequest, VerifyResponse};
use crate::config::AppConfig;
use crate::crypto::SecureRandom;
use crate::siws::{ChallengeGenerator, SiwsVerifier};

/// Arguments for the challenge command
#[derive(Args, Debug)]
pub struct ChallengeArgs {
    /// TOML config file (env overrides still apply)
    #[arg(long, env = "SIWS_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Arguments for the verify command
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// JSON file holding {"input": challenge, "output": response}
    #[arg(long)]
    pub request: PathBuf,

    /// TOML config file (env overrides still apply)
    #[arg(long, env = "SIWS_CONFIG")]
    pub config: Option<PathBuf>,
}

fn load_config(path: Option<&PathBuf>) -> Result<AppConfig> {
    dotenv::dotenv().ok();
    Ok(AppConfig::load(path.map(|p| p.as_path()))?)
}

/// Print a fresh challenge as JSON
pub fn challenge(args: ChallengeArgs) -> Result<()> {
    let config = load_config(args.config.as_ref())?;
    let generator = ChallengeGenerator::new(config.siws, SecureRandom::detect());
    let challenge = generator.generate();
    println!("{}", serde_json::to_string_pretty(&challenge)?);
    Ok(())
}

/// Verify a saved request offline and print {"verified": bool}
pub fn verify(args: VerifyArgs) -> Result<()> {
    let config = load_config(args.config.as_ref())?;
    let content = std::fs::read_to_string(&args.request)
        .map_err(|e| anyhow!("Failed to read {}: {}", args.request.display(), e))?;
    let request: VerifyRequest = serde_json::from_str(&content)
        .map_err(|e| anyhow!("Malformed sign-in request: {}", e))?;

    let verifier = SiwsVerifier::new(config.siws);
    let verified = verifier.verify(&request.input, &request.output);
    info!(
        "Verified sign-in for {}: {}",
        request.output.account.address, verified
    );

    println!("{}", serde_json::to_string(&VerifyResponse { verified })?);
    Ok(())
}
