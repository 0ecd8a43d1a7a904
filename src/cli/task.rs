// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Context as _, Result};
use clap::Args;
use ethers::types::{Address, U256};
use ethers::utils::{format_ether, parse_ether};

use super::{Context, KeyArgs};
use crate::client::types::unix_now;
use crate::client::{ClientError, Response, TaskInfo, TaskInput};
use crate::crypto::CLIENT_KEY_ENV;

/// Arguments for publish-task command
#[derive(Args, Debug)]
pub struct PublishTaskArgs {
    /// Source address the task is published to
    #[arg(long)]
    pub source: Address,

    /// Exposed function providers should run
    #[arg(long)]
    pub function: String,

    /// Function input as JSON
    #[arg(long, default_value = "{}")]
    pub data: String,

    /// Payment in OGPU (e.g. 0.01)
    #[arg(long)]
    pub payment: String,

    /// Seconds until the task expires
    #[arg(long, default_value_t = 3600)]
    pub expires_in: u64,

    #[command(flatten)]
    pub key: KeyArgs,
}

#[derive(Args, Debug)]
pub struct TaskArgs {
    /// Task address
    #[arg(long)]
    pub task: Address,
}

#[derive(Args, Debug)]
pub struct ConfirmResponseArgs {
    /// Response address
    #[arg(long)]
    pub response: Address,

    #[command(flatten)]
    pub key: KeyArgs,
}

#[derive(Args, Debug)]
pub struct CancelTaskArgs {
    /// Task address
    #[arg(long)]
    pub task: Address,

    #[command(flatten)]
    pub key: KeyArgs,
}

impl PublishTaskArgs {
    pub fn to_task_info(&self, now: u64) -> Result<TaskInfo> {
        let data: serde_json::Value =
            serde_json::from_str(&self.data).context("--data must be valid JSON")?;
        let payment: U256 = parse_ether(self.payment.as_str())
            .map_err(|e| anyhow!("invalid payment '{}': {}", self.payment, e))?;

        let expiry_time = now
            .checked_add(self.expires_in)
            .ok_or_else(|| anyhow!("--expires-in {} is too large", self.expires_in))?;

        Ok(TaskInfo {
            source: self.source,
            config: TaskInput::new(self.function.clone(), &data)?,
            expiry_time,
            payment,
        })
    }
}

pub async fn publish_task(ctx: &Context, args: PublishTaskArgs) -> Result<()> {
    let task_info = args.to_task_info(unix_now())?;
    let client = ctx.signing_client(args.key.private_key.as_deref(), CLIENT_KEY_ENV)?;

    println!("\n🚀 Publishing task '{}'...", task_info.config.function_name);
    let address = client.publish_task(&task_info).await?;
    println!("✅ Task published at {:?}", address);
    Ok(())
}

pub async fn list_responses(ctx: &Context, args: TaskArgs) -> Result<()> {
    let responses = ctx.read_client()?.get_task_responses(args.task).await?;
    if responses.is_empty() {
        println!("No responses yet for task {:?}", args.task);
        return Ok(());
    }

    println!("\n📋 {} response(s) for task {:?}:", responses.len(), args.task);
    for response in &responses {
        print_response(response);
    }
    Ok(())
}

pub async fn show_confirmed_response(ctx: &Context, args: TaskArgs) -> Result<()> {
    match ctx.read_client()?.get_confirmed_response(args.task).await {
        Ok(response) => {
            print_response(&response);
            Ok(())
        }
        Err(ClientError::NoConfirmedResponse(_)) => {
            println!("Task {:?} has no confirmed response yet", args.task);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn show_task_status(ctx: &Context, args: TaskArgs) -> Result<()> {
    let status = ctx.read_client()?.get_task_status(args.task).await?;
    println!("Task {:?}: {:?}", args.task, status);
    Ok(())
}

pub async fn confirm_response(ctx: &Context, args: ConfirmResponseArgs) -> Result<()> {
    let client = ctx.signing_client(args.key.private_key.as_deref(), CLIENT_KEY_ENV)?;
    let tx_hash = client.confirm_response(args.response).await?;
    println!("✅ Response confirmed");
    println!("   Transaction hash: {:?}", tx_hash);
    Ok(())
}

pub async fn cancel_task(ctx: &Context, args: CancelTaskArgs) -> Result<()> {
    let client = ctx.signing_client(args.key.private_key.as_deref(), CLIENT_KEY_ENV)?;
    let tx_hash = client.cancel_task(args.task).await?;
    println!("✅ Task canceled");
    println!("   Transaction hash: {:?}", tx_hash);
    Ok(())
}

fn print_response(response: &Response) {
    println!("\n  Response {:?}", response.address);
    println!("    Provider:  {:?}", response.provider);
    println!("    Status:    {:?}", response.status);
    println!("    Confirmed: {}", response.confirmed);
    println!("    Payment:   {} OGPU", format_ether(response.payment));
    println!("    Timestamp: {}", response.timestamp);
    println!("    Data:      {}", response.data);
}
