// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod agent;
pub mod source;
pub mod task;

use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::client::OgpuClient;
use crate::config::{ChainConfig, ChainId, ChainRegistry, Settings};

/// OpenGPU marketplace CLI
#[derive(Parser, Debug)]
#[command(name = "ogpu-cli")]
#[command(version)]
#[command(about = "Publish sources and tasks to the OpenGPU marketplace", long_about = None)]
pub struct Cli {
    /// Chain to use (mainnet, testnet or a chain ID)
    #[arg(long, global = true, env = "OGPU_CHAIN")]
    pub chain: Option<ChainId>,

    /// TOML settings file with RPC and contract overrides
    #[arg(long, global = true, env = "OGPU_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Publish a source described by a JSON file
    PublishSource(source::PublishSourceArgs),

    /// Publish a task to a source
    PublishTask(task::PublishTaskArgs),

    /// List the responses submitted for a task
    Responses(task::TaskArgs),

    /// Show the confirmed response of a task
    ConfirmedResponse(task::TaskArgs),

    /// Confirm a response (manual confirmation sources)
    ConfirmResponse(task::ConfirmResponseArgs),

    /// Cancel a task
    CancelTask(task::CancelTaskArgs),

    /// Show the status of a task
    TaskStatus(task::TaskArgs),

    /// Authorize or revoke an agent
    SetAgent(agent::SetAgentArgs),

    /// List supported chains and their contract addresses
    Chains,
}

/// Private key for commands that send transactions
#[derive(Args, Debug, Clone)]
pub struct KeyArgs {
    /// Private key (can also be set via CLIENT_PRIVATE_KEY env var)
    #[arg(long, env = "CLIENT_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: Option<String>,
}

/// Chain selection resolved from flags, settings and the process default
#[derive(Debug, Clone)]
pub struct Context {
    pub registry: ChainRegistry,
    pub chain: ChainConfig,
}

impl Context {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let settings = match &cli.config {
            Some(path) => Settings::from_file(path)?,
            None => Settings::from_env()?,
        };
        let chain_id = match cli.chain {
            Some(chain) => chain,
            None => settings.default_chain()?.unwrap_or_else(ChainConfig::active_chain),
        };
        ChainConfig::set_chain(chain_id);

        let registry = settings.into_registry()?;
        let chain = registry
            .get_chain(chain_id.id())
            .cloned()
            .ok_or_else(|| anyhow!("Chain {} is not configured", chain_id))?;
        Ok(Self { registry, chain })
    }

    pub fn read_client(&self) -> Result<OgpuClient> {
        Ok(OgpuClient::new(self.chain.clone(), None)?)
    }

    pub fn signing_client(&self, private_key: Option<&str>, env_var: &str) -> Result<OgpuClient> {
        let key = private_key.ok_or_else(|| {
            anyhow!("Private key required. Use --private-key or set {} env var", env_var)
        })?;
        Ok(OgpuClient::with_private_key(self.chain.clone(), key)?)
    }
}

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let ctx = Context::from_cli(&cli)?;
    println!("🔗 Using {} ({})", ctx.chain.name, ctx.chain.chain_id);

    match cli.command {
        Commands::PublishSource(args) => source::publish_source(&ctx, args).await,
        Commands::PublishTask(args) => task::publish_task(&ctx, args).await,
        Commands::Responses(args) => task::list_responses(&ctx, args).await,
        Commands::ConfirmedResponse(args) => task::show_confirmed_response(&ctx, args).await,
        Commands::ConfirmResponse(args) => task::confirm_response(&ctx, args).await,
        Commands::CancelTask(args) => task::cancel_task(&ctx, args).await,
        Commands::TaskStatus(args) => task::show_task_status(&ctx, args).await,
        Commands::SetAgent(args) => agent::set_agent(&ctx, args).await,
        Commands::Chains => list_chains(&ctx),
    }
}

fn list_chains(ctx: &Context) -> Result<()> {
    println!("{}", crate::version::get_version_string());
    println!("Features: {}", crate::version::FEATURES.join(", "));

    let default_id = ctx.registry.get_default_chain_id();
    for chain in ctx.registry.get_all_chains() {
        let marker = if chain.chain_id == ctx.chain.chain_id {
            "*"
        } else if chain.chain_id == default_id {
            "d"
        } else {
            " "
        };
        println!("\n{} {} ({})", marker, chain.name, chain.chain_id);
        println!("    RPC:        {}", chain.rpc_url);
        println!("    Token:      {}", chain.native_token.symbol);
        println!("    Nexus:      {}", chain.contracts.nexus);
        println!("    Controller: {}", chain.contracts.controller);
        println!("    Terminal:   {}", chain.contracts.terminal);
        if !chain.is_deployed() {
            println!("    ⚠️  Contract addresses not configured");
        }
    }
    Ok(())
}
