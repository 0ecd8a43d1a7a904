// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use clap::Args;
use ethers::types::Address;

use super::Context;
use crate::crypto::MASTER_KEY_ENV;

/// Arguments for set-agent command
#[derive(Args, Debug)]
pub struct SetAgentArgs {
    /// Agent address
    #[arg(long)]
    pub agent: Address,

    /// Revoke the agent instead of authorizing it
    #[arg(long)]
    pub revoke: bool,

    /// Master wallet key (can also be set via MASTER_PRIVATE_KEY env var)
    #[arg(long, env = "MASTER_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: Option<String>,
}

pub async fn set_agent(ctx: &Context, args: SetAgentArgs) -> Result<()> {
    let client = ctx.signing_client(args.private_key.as_deref(), MASTER_KEY_ENV)?;
    let value = !args.revoke;

    println!(
        "\n{} agent {:?} for {:?}...",
        if value { "🔑 Authorizing" } else { "🚫 Revoking" },
        args.agent,
        client.address()
    );
    let tx_hash = client.set_agent(args.agent, value).await?;
    println!("✅ Agent updated");
    println!("   Transaction hash: {:?}", tx_hash);
    Ok(())
}
