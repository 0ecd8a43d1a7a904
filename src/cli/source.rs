// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context as _, Result};
use clap::Args;
use std::path::{Path, PathBuf};

use super::{Context, KeyArgs};
use crate::client::SourceInfo;
use crate::crypto::CLIENT_KEY_ENV;

/// Arguments for publish-source command
#[derive(Args, Debug)]
pub struct PublishSourceArgs {
    /// JSON file with the source description (camelCase fields)
    #[arg(long)]
    pub file: PathBuf,

    #[command(flatten)]
    pub key: KeyArgs,

    /// Validate and print the source without sending a transaction
    #[arg(long)]
    pub dry_run: bool,
}

pub fn load_source_info(path: &Path) -> Result<SourceInfo> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let source: SourceInfo = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a valid source description", path.display()))?;
    source.validate()?;
    Ok(source)
}

pub async fn publish_source(ctx: &Context, args: PublishSourceArgs) -> Result<()> {
    let source = load_source_info(&args.file)?;

    println!("\n📋 Source Details:");
    println!("  Name:            {}", source.name);
    println!("  Environments:    {:#05b}", source.image_envs.bitmask());
    println!("  Min payment:     {} wei", source.min_payment);
    println!("  Max expiry:      {}s", source.max_expiry_duration);
    println!("  Delivery method: {:?}", source.delivery_method);

    if args.dry_run {
        println!("\n🔍 DRY RUN MODE - No transaction will be submitted");
        return Ok(());
    }

    let client = ctx.signing_client(args.key.private_key.as_deref(), CLIENT_KEY_ENV)?;
    let address = client.publish_source(&source).await?;
    println!("\n✅ Source published at {:?}", address);
    Ok(())
}
