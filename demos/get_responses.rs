// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! List every response submitted for a task.
use ethers::types::Address;
use ogpu::client::get_task_responses;
use ogpu::config::{ChainConfig, ChainId};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    ChainConfig::set_chain(ChainId::OgpuTestnet);

    let task: Address = "0x9A52457785367B7cFDf7594847C506B6c80032dE".parse()?;
    let responses = get_task_responses(task).await?;

    println!("Responses:");
    for response in responses {
        println!("Address: {:?}", response.address);
        println!("Task: {:?}", response.task);
        println!("Provider: {:?}", response.provider);
        println!("Data: {}", response.data);
        println!("Payment: {}", response.payment);
        println!("Status: {:?}", response.status);
        println!("Timestamp: {}", response.timestamp);
        println!("Confirmed: {}", response.confirmed);
        println!("{}", "-".repeat(40));
    }
    Ok(())
}
