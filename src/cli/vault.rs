// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use clap::Args;
use std::path::PathBuf;
use tracing::{error, info};
use zeroize::Zeroizing;

use crate::crypto::{
    derive_key, generate_master_key, open, seal, DerivedKey, SealedPayload,
    DEFAULT_MASTER_KEY_LEN, OBJECT_ID_LEN,
};

/// Arguments for the keygen command
#[derive(Args, Debug)]
pub struct KeygenArgs {
    /// Key length in bytes (minimum 16)
    #[arg(long, default_value_t = DEFAULT_MASTER_KEY_LEN)]
    pub length: usize,
}

/// Master key and object id shared by derive/seal/open
#[derive(Args, Debug)]
pub struct KeyArgs {
    /// Base64 master key (can also be set via SIWS_MASTER_KEY env var)
    #[arg(long, env = "SIWS_MASTER_KEY", hide_env_values = true)]
    pub master_key: String,

    /// Storage object id, 32 bytes as hex (0x prefix optional)
    #[arg(long)]
    pub object_id: String,
}

/// Arguments for the derive command
#[derive(Args, Debug)]
pub struct DeriveArgs {
    #[command(flatten)]
    pub key: KeyArgs,
}

/// Arguments for the seal command
#[derive(Args, Debug)]
pub struct SealArgs {
    #[command(flatten)]
    pub key: KeyArgs,

    /// Plaintext file to seal
    #[arg(long)]
    pub input: PathBuf,

    /// Destination for the sealed payload JSON
    #[arg(long)]
    pub output: PathBuf,

    /// Additional authenticated data
    #[arg(long)]
    pub aad: Option<String>,
}

/// Arguments for the open command
#[derive(Args, Debug)]
pub struct OpenArgs {
    #[command(flatten)]
    pub key: KeyArgs,

    /// Sealed payload JSON file
    #[arg(long)]
    pub input: PathBuf,

    /// Destination for the recovered plaintext
    #[arg(long)]
    pub output: PathBuf,

    /// Additional authenticated data used when sealing
    #[arg(long)]
    pub aad: Option<String>,
}

/// Parse a 32-byte object id from hex
pub fn parse_object_id(value: &str) -> Result<[u8; OBJECT_ID_LEN]> {
    let hex_clean = value.strip_prefix("0x").unwrap_or(value);
    let bytes = hex::decode(hex_clean).map_err(|e| anyhow!("Invalid object id hex: {}", e))?;
    bytes.as_slice().try_into().map_err(|_| {
        anyhow!(
            "Invalid object id length: expected {} bytes, got {}",
            OBJECT_ID_LEN,
            bytes.len()
        )
    })
}

fn derive_from_args(args: &KeyArgs) -> Result<DerivedKey> {
    let master = Zeroizing::new(
        STANDARD
            .decode(args.master_key.trim())
            .map_err(|e| anyhow!("Invalid master key base64: {}", e))?,
    );
    let object_id = parse_object_id(&args.object_id)?;
    Ok(derive_key(&master, &object_id)?)
}

/// Print a fresh base64 master key
pub fn keygen(args: KeygenArgs) -> Result<()> {
    let key = generate_master_key(args.length)?;
    println!("{}", STANDARD.encode(key.as_bytes()));
    Ok(())
}

/// Print the derived key as hex
pub fn derive(args: DeriveArgs) -> Result<()> {
    let key = derive_from_args(&args.key)?;
    println!("{}", hex::encode(key.as_bytes()));
    Ok(())
}

pub fn seal_file(args: SealArgs) -> Result<()> {
    let key = derive_from_args(&args.key)?;
    let plaintext = Zeroizing::new(
        std::fs::read(&args.input)
            .map_err(|e| anyhow!("Failed to read {}: {}", args.input.display(), e))?,
    );

    let sealed = seal(&key, &plaintext, args.aad.as_deref().map(str::as_bytes))?;
    std::fs::write(&args.output, serde_json::to_vec_pretty(&sealed)?)
        .map_err(|e| anyhow!("Failed to write {}: {}", args.output.display(), e))?;

    info!(
        "Sealed {} bytes from {} into {}",
        plaintext.len(),
        args.input.display(),
        args.output.display()
    );
    Ok(())
}

pub fn open_file(args: OpenArgs) -> Result<()> {
    let key = derive_from_args(&args.key)?;
    let content = std::fs::read(&args.input)
        .map_err(|e| anyhow!("Failed to read {}: {}", args.input.display(), e))?;
    let sealed: SealedPayload = serde_json::from_slice(&content)
        .map_err(|e| anyhow!("Malformed sealed payload: {}", e))?;

    let plaintext = match open(&key, &sealed, args.aad.as_deref().map(str::as_bytes)) {
        Ok(plaintext) => Zeroizing::new(plaintext),
        Err(e) => {
            error!("Refusing to write output: {}", e);
            return Err(e.into());
        }
    };

    std::fs::write(&args.output, plaintext.as_slice())
        .map_err(|e| anyhow!("Failed to write {}: {}", args.output.display(), e))?;
    info!("Opened {} into {}", args.input.display(), args.output.display());
    Ok(())
}
