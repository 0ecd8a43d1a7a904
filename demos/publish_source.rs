// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Publish a CPU source on testnet. Needs CLIENT_PRIVATE_KEY.
use ethers::types::U256;
use ethers::utils::parse_ether;
use ogpu::client::{publish_source, DeliveryMethod, ImageEnvironments, SourceInfo};
use ogpu::config::{ChainConfig, ChainId};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    ChainConfig::set_chain(ChainId::OgpuTestnet);

    let source_info = SourceInfo {
        name: "test-source".to_string(),
        description: "test-description".to_string(),
        logo_url: "https://www.dextools.io/resources/tokens/logos/ether/0x067def80d66fb69c276e53b641f37ff7525162f6.png".to_string(),
        image_envs: ImageEnvironments::cpu(
            "https://cipfs.ogpuscan.io/ipfs/QmNWFLL13ujf3KUTJvfNx42bA5fWDV96qqUdjY6nwpuwD9",
        ),
        min_payment: parse_ether(0.01)?,
        min_available_lockup: U256::zero(),
        max_expiry_duration: 86400,
        privacy_enabled: false,
        optional_params_url: None,
        delivery_method: DeliveryMethod::FirstResponse,
    };

    let source_address = publish_source(&source_info).await?;
    println!("Source published at: {:?}", source_address);
    Ok(())
}
