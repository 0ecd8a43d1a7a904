// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use ogpu::config::{ChainConfig, ChainId, ChainRegistry};

// The only test in this binary that changes the active chain.
#[test]
fn test_set_chain_switches_active_config() {
    ChainConfig::set_chain(ChainId::OgpuMainnet);
    assert_eq!(ChainConfig::active_chain(), ChainId::OgpuMainnet);
    assert_eq!(ChainConfig::current().chain_id, 1071);
    assert_eq!(ChainRegistry::new().get_default_chain_id(), 1071);

    ChainConfig::set_chain(ChainId::OgpuTestnet);
    assert_eq!(ChainConfig::current().chain_id, 200820172034);
    assert_eq!(ChainConfig::current().name, ChainId::OgpuTestnet.name());
}

#[test]
fn test_chain_id_parsing() {
    assert_eq!("testnet".parse::<ChainId>().unwrap(), ChainId::OgpuTestnet);
    assert_eq!("OGPU_MAINNET".parse::<ChainId>().unwrap(), ChainId::OgpuMainnet);
    assert_eq!("200820172034".parse::<ChainId>().unwrap(), ChainId::OgpuTestnet);
    assert!("84532".parse::<ChainId>().is_err());
}

#[test]
fn test_registry_lists_both_chains() {
    let registry = ChainRegistry::new();
    let ids: Vec<u64> = registry.get_all_chains().iter().map(|c| c.chain_id).collect();
    assert_eq!(ids, vec![1071, 200820172034]);

    for chain in registry.get_all_chains() {
        assert_eq!(chain.native_token.symbol, "OGPU");
        assert_eq!(chain.native_token.decimals, 18);
    }
}
