// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Authorize an agent for the master wallet in MASTER_PRIVATE_KEY.
use anyhow::Context;
use ethers::types::Address;
use ogpu::client::set_agent;
use ogpu::crypto::MASTER_KEY_ENV;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let private_key = std::env::var(MASTER_KEY_ENV)
        .with_context(|| format!("{} must be set", MASTER_KEY_ENV))?;
    let agent: Address = "0xeBa8Cf76e6415A03D28f9D40c54440c894a67956".parse()?;

    let tx_hash = set_agent(agent, true, &private_key).await?;
    println!("Agent set in transaction: {:?}", tx_hash);
    Ok(())
}
