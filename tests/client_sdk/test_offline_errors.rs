// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Client operations that fail before any RPC traffic
use async_trait::async_trait;
use ethers::types::{Address, U256};
use ogpu::client::{
    ClientError, ClientResult, DeliveryMethod, ImageEnvironments, MetadataUploader, OgpuClient,
    SourceInfo, TaskInfo, TaskInput,
};
use ogpu::config::{ChainConfig, ContractAddresses, TokenInfo};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::Mutex;

const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
const ZERO: &str = "0x0000000000000000000000000000000000000000";

fn chain(contract: &str) -> ChainConfig {
    ChainConfig {
        chain_id: 200820172034,
        name: "OGPU Testnet".to_string(),
        rpc_url: "http://127.0.0.1:9".to_string(),
        native_token: TokenInfo {
            symbol: "OGPU".to_string(),
            decimals: 18,
        },
        contracts: ContractAddresses {
            nexus: contract.to_string(),
            controller: contract.to_string(),
            terminal: contract.to_string(),
        },
        confirmation_blocks: 1,
        tx_timeout_secs: 5,
    }
}

fn task_info() -> TaskInfo {
    TaskInfo {
        source: "0x4288fCDF9815718358cb481A82A4dB123e6D0b45".parse().unwrap(),
        config: TaskInput::new("multiply", &json!({"a": 6, "b": 7})).unwrap(),
        expiry_time: u64::MAX / 2,
        payment: U256::exp10(16),
    }
}

#[tokio::test]
async fn test_unconfigured_contracts_rejected() {
    let client = OgpuClient::with_private_key(chain(ZERO), TEST_KEY).unwrap();

    let err = client.publish_task(&task_info()).await.unwrap_err();
    assert!(matches!(err, ClientError::ContractNotConfigured { ref contract, .. } if contract == "Controller"));

    let err = client.set_agent(Address::repeat_byte(1), true).await.unwrap_err();
    assert!(matches!(err, ClientError::ContractNotConfigured { ref contract, .. } if contract == "Terminal"));
}

#[tokio::test]
async fn test_write_without_signer_rejected() {
    let client = OgpuClient::new(chain("0x4288fCDF9815718358cb481A82A4dB123e6D0b45"), None).unwrap();
    assert!(client.address().is_zero());

    let err = client.publish_task(&task_info()).await.unwrap_err();
    assert!(matches!(err, ClientError::MissingSigner));

    let err = client
        .confirm_response(Address::repeat_byte(2))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::MissingSigner));
}

#[tokio::test]
async fn test_invalid_descriptors_rejected_first() {
    let client = OgpuClient::with_private_key(chain(ZERO), TEST_KEY).unwrap();

    let mut expired = task_info();
    expired.expiry_time = 1;
    assert!(matches!(
        client.publish_task(&expired).await,
        Err(ClientError::InvalidTask(_))
    ));

    let source = SourceInfo {
        name: "test-source".to_string(),
        description: "test-description".to_string(),
        logo_url: "https://example.com/logo.png".to_string(),
        image_envs: ImageEnvironments::default(),
        min_payment: U256::exp10(16),
        min_available_lockup: U256::zero(),
        max_expiry_duration: 86400,
        privacy_enabled: false,
        optional_params_url: None,
        delivery_method: DeliveryMethod::FirstResponse,
    };
    assert!(matches!(
        client.publish_source(&source).await,
        Err(ClientError::InvalidSource(_))
    ));
}

#[test]
fn test_signer_address_derived_from_key() {
    let client = OgpuClient::with_private_key(chain(ZERO), TEST_KEY).unwrap();
    let expected: Address = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse().unwrap();
    assert_eq!(client.address(), expected);
}

#[test]
fn test_bad_private_key_rejected() {
    assert!(matches!(
        OgpuClient::with_private_key(chain(ZERO), "0x1234"),
        Err(ClientError::InvalidPrivateKey(_))
    ));
}

/// Records documents instead of storing them
#[derive(Default)]
struct RecordingUploader {
    documents: Mutex<Vec<Value>>,
}

#[async_trait]
impl MetadataUploader for RecordingUploader {
    async fn upload(&self, document: &Value) -> ClientResult<String> {
        self.documents.lock().await.push(document.clone());
        Ok("https://meta.example/source.json".to_string())
    }
}

#[tokio::test]
async fn test_custom_uploader_receives_source_metadata() {
    let uploader = Arc::new(RecordingUploader::default());
    let client = OgpuClient::with_private_key(chain("0x4288fCDF9815718358cb481A82A4dB123e6D0b45"), TEST_KEY)
        .unwrap()
        .with_uploader(uploader.clone());

    let source = SourceInfo {
        name: "multiplier".to_string(),
        description: "multiplies two numbers".to_string(),
        logo_url: "https://example.com/logo.png".to_string(),
        image_envs: ImageEnvironments::cpu("https://example.com/docker-compose.yml"),
        min_payment: U256::exp10(16),
        min_available_lockup: U256::zero(),
        max_expiry_duration: 86400,
        privacy_enabled: false,
        optional_params_url: None,
        delivery_method: DeliveryMethod::FirstResponse,
    };

    // The RPC endpoint is unreachable, so only the upload can succeed
    let err = client.publish_source(&source).await.unwrap_err();
    assert!(!matches!(err, ClientError::Metadata(_)));

    let documents = uploader.documents.lock().await;
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0]["name"], "multiplier");
    assert_eq!(documents[0]["logoUrl"], "https://example.com/logo.png");
}
