// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod signin;
pub mod vault;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// siws-vault CLI
#[derive(Parser, Debug)]
#[command(name = "siws-cli")]
#[command(version)]
#[command(about = "Sign-In-With-Solana and envelope encryption tools", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Issue a fresh sign-in challenge
    Challenge(signin::ChallengeArgs),

    /// Verify a saved {input, output} sign-in request
    Verify(signin::VerifyArgs),

    /// Generate a random master key
    Keygen(vault::KeygenArgs),

    /// Derive the per-object key for a storage object id
    Derive(vault::DeriveArgs),

    /// Seal a file for upload
    Seal(vault::SealArgs),

    /// Open a sealed file
    Open(vault::OpenArgs),
}

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Challenge(args) => signin::challenge(args),
        Commands::Verify(args) => signin::verify(args),
        Commands::Keygen(args) => vault::keygen(args),
        Commands::Derive(args) => vault::derive(args),
        Commands::Seal(args) => vault::seal_file(args),
        Commands::Open(args) => vault::open_file(args),
    }
}
