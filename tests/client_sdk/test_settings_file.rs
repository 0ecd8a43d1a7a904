// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use ogpu::client::ClientError;
use ogpu::config::{ChainId, Settings};
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_settings_file_overrides_chain() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
default_chain = "mainnet"

[chains.mainnet]
rpc_url = "http://localhost:8545"
controller = "0x4288fCDF9815718358cb481A82A4dB123e6D0b45"
tx_timeout_secs = 30
"#
    )
    .unwrap();

    let settings = Settings::from_file(file.path()).unwrap();
    assert_eq!(settings.default_chain().unwrap(), Some(ChainId::OgpuMainnet));

    let registry = settings.into_registry().unwrap();
    let mainnet = registry.get_chain(1071).unwrap();
    assert_eq!(mainnet.rpc_url, "http://localhost:8545");
    assert_eq!(mainnet.tx_timeout_secs, 30);
    assert!(mainnet.controller_address().is_ok());
    assert_eq!(registry.get_default_chain_id(), 1071);
}

#[test]
fn test_missing_settings_file() {
    let result = Settings::from_file("/nonexistent/ogpu.toml");
    assert!(matches!(result, Err(ClientError::Config(_))));
}

#[test]
fn test_unknown_chain_in_settings() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[chains.goerli]\nrpc_url = \"http://localhost:8545\"").unwrap();

    let settings = Settings::from_file(file.path()).unwrap();
    assert!(settings.into_registry().is_err());
}
