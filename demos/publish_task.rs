// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Publish a task to an existing source. Needs CLIENT_PRIVATE_KEY.
use ethers::types::Address;
use ethers::utils::parse_ether;
use ogpu::client::{publish_task, TaskInfo, TaskInput};
use ogpu::config::{ChainConfig, ChainId};
use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Serialize)]
struct MyTaskModel {
    input: String,
    additional_param: i64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    ChainConfig::set_chain(ChainId::OgpuTestnet);

    let config = TaskInput::new(
        "some_function",
        &MyTaskModel {
            input: "a photo of an astronaut riding a horse on mars".to_string(),
            additional_param: 42,
        },
    )?;

    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
    let task_info = TaskInfo {
        source: "0x4288fCDF9815718358cb481A82A4dB123e6D0b45".parse::<Address>()?,
        config,
        expiry_time: now + 3600,
        payment: parse_ether(0.01)?,
    };

    let task_address = publish_task(&task_info).await?;
    println!("Task published at: {:?}", task_address);
    Ok(())
}
