// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Confirm a response for a manual-confirmation source. Needs CLIENT_PRIVATE_KEY.
use ethers::types::Address;
use ogpu::client::confirm_response;
use ogpu::config::{ChainConfig, ChainId};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    ChainConfig::set_chain(ChainId::OgpuTestnet);

    let response: Address = "0x575162Fb2b19Fd6C3bC8af5Fd1D4F9b832311a34".parse()?;
    let tx_hash = confirm_response(response).await?;
    println!("Response confirmed in transaction: {:?}", tx_hash);
    Ok(())
}
