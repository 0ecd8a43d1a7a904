// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use ethers::types::Address;
use ogpu::client::get_confirmed_response;
use ogpu::config::{ChainConfig, ChainId};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    ChainConfig::set_chain(ChainId::OgpuTestnet);

    let task: Address = "0xC983F060a9e3EB54aF67AAdC65CC10E8aD90C5f3".parse()?;
    let response = get_confirmed_response(task).await?;

    println!("Address: {:?}", response.address);
    println!("Data: {}", response.data);
    Ok(())
}
