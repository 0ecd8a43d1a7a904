// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Marketplace client
//!
//! [`OgpuClient`] wraps one chain's provider and an optional signer. The
//! free functions at the bottom of this module build a client for the
//! chain selected with [`ChainConfig::set_chain`] and the key in
//! `CLIENT_PRIVATE_KEY`, for scripts that do a single call.
//!
//! ```no_run
//! use ogpu::client::{publish_task, TaskInfo, TaskInput};
//! use ogpu::config::{ChainConfig, ChainId};
//!
//! # async fn run() -> Result<(), ogpu::client::ClientError> {
//! ChainConfig::set_chain(ChainId::OgpuTestnet);
//! let task_info = TaskInfo {
//!     source: "0x4288fCDF9815718358cb481A82A4dB123e6D0b45".parse().unwrap(),
//!     config: TaskInput::new("multiply", &serde_json::json!({"a": 6, "b": 7}))?,
//!     expiry_time: 1_900_000_000,
//!     payment: ethers::utils::parse_ether(0.01).unwrap(),
//! };
//! let task_address = publish_task(&task_info).await?;
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod error;
pub mod metadata;
pub mod source;
pub mod task;
pub mod types;

use ethers::signers::LocalWallet;
use ethers::types::{Address, H256};
use std::sync::Arc;

pub use error::{ClientError, ClientResult};
pub use metadata::{DataUrlUploader, HttpUploader, MetadataUploader};
pub use types::{
    DeliveryMethod, ImageEnvironments, Response, ResponseStatus, SourceInfo, SourceMetadata,
    TaskInfo, TaskInput, TaskStatus,
};

use crate::config::chains::ChainConfig;
use crate::config::settings::Settings;
use crate::contracts::client::{Web3Client, Web3Config};
use crate::crypto::private_key::{load_optional_private_key, parse_private_key, CLIENT_KEY_ENV};

pub struct OgpuClient {
    chain: ChainConfig,
    web3: Web3Client,
    uploader: Arc<dyn MetadataUploader>,
}

impl OgpuClient {
    pub fn new(chain: ChainConfig, wallet: Option<LocalWallet>) -> ClientResult<Self> {
        let web3 = Web3Client::new(Web3Config::from(&chain), wallet)?;
        Ok(Self {
            chain,
            web3,
            uploader: Arc::new(DataUrlUploader),
        })
    }

    pub fn with_private_key(chain: ChainConfig, private_key: &str) -> ClientResult<Self> {
        Self::new(chain, Some(parse_private_key(private_key)?))
    }

    /// Client for the active chain, with settings-file overrides and the
    /// optional `CLIENT_PRIVATE_KEY` signer
    pub fn from_env() -> ClientResult<Self> {
        let chain = Self::active_chain_config()?;
        let wallet = load_optional_private_key(CLIENT_KEY_ENV)?;
        Self::new(chain, wallet)
    }

    pub(crate) fn active_chain_config() -> ClientResult<ChainConfig> {
        let active = ChainConfig::active_chain();
        let registry = Settings::from_env()?.into_registry()?;
        registry
            .get_chain(active.id())
            .cloned()
            .ok_or(ClientError::UnsupportedChain(active.id()))
    }

    pub fn with_uploader(mut self, uploader: Arc<dyn MetadataUploader>) -> Self {
        self.uploader = uploader;
        self
    }

    pub fn chain(&self) -> &ChainConfig {
        &self.chain
    }

    pub fn web3(&self) -> &Web3Client {
        &self.web3
    }

    /// Signer address, zero for read-only clients
    pub fn address(&self) -> Address {
        self.web3.address()
    }
}

pub async fn publish_source(source_info: &SourceInfo) -> ClientResult<Address> {
    OgpuClient::from_env()?.publish_source(source_info).await
}

pub async fn publish_task(task_info: &TaskInfo) -> ClientResult<Address> {
    OgpuClient::from_env()?.publish_task(task_info).await
}

pub async fn get_task_responses(task_address: Address) -> ClientResult<Vec<Response>> {
    OgpuClient::from_env()?.get_task_responses(task_address).await
}

pub async fn get_confirmed_response(task_address: Address) -> ClientResult<Response> {
    OgpuClient::from_env()?.get_confirmed_response(task_address).await
}

pub async fn get_task_status(task_address: Address) -> ClientResult<TaskStatus> {
    OgpuClient::from_env()?.get_task_status(task_address).await
}

pub async fn confirm_response(response_address: Address) -> ClientResult<H256> {
    OgpuClient::from_env()?.confirm_response(response_address).await
}

pub async fn cancel_task(task_address: Address) -> ClientResult<H256> {
    OgpuClient::from_env()?.cancel_task(task_address).await
}

pub use agent::set_agent;
