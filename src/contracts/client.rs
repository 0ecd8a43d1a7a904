// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use ethers::abi::Detokenize;
use ethers::contract::ContractCall;
use ethers::prelude::*;
use ethers::providers::{Http, Provider};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::client::error::{ClientError, ClientResult};
use crate::config::chains::ChainConfig;

pub type SignerClient = SignerMiddleware<Provider<Http>, LocalWallet>;

#[derive(Debug, Clone)]
pub struct Web3Config {
    pub rpc_url: String,
    pub chain_id: u64,
    pub confirmations: usize,
    pub polling_interval: Duration,
    pub tx_timeout: Duration,
}

impl Default for Web3Config {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            chain_id: 31337,
            confirmations: 1,
            polling_interval: Duration::from_millis(1000),
            tx_timeout: Duration::from_secs(120),
        }
    }
}

impl From<&ChainConfig> for Web3Config {
    fn from(chain: &ChainConfig) -> Self {
        Self {
            rpc_url: chain.rpc_url.clone(),
            chain_id: chain.chain_id,
            confirmations: chain.confirmation_blocks.max(1) as usize,
            tx_timeout: Duration::from_secs(chain.tx_timeout_secs),
            ..Default::default()
        }
    }
}

/// Provider plus optional signer for one chain
pub struct Web3Client {
    pub provider: Arc<Provider<Http>>,
    signer: Option<Arc<SignerClient>>,
    config: Web3Config,
}

impl Web3Client {
    /// Build the client without touching the network
    pub fn new(config: Web3Config, wallet: Option<LocalWallet>) -> ClientResult<Self> {
        let provider = Provider::<Http>::try_from(config.rpc_url.as_str())
            .map_err(|e| ClientError::Provider(format!("Failed to create provider: {}", e)))?
            .interval(config.polling_interval);

        let signer = wallet.map(|wallet| {
            let wallet = wallet.with_chain_id(config.chain_id);
            Arc::new(SignerMiddleware::new(provider.clone(), wallet))
        });

        Ok(Self {
            provider: Arc::new(provider),
            signer,
            config,
        })
    }

    pub fn config(&self) -> &Web3Config {
        &self.config
    }

    pub fn signer(&self) -> ClientResult<Arc<SignerClient>> {
        self.signer.clone().ok_or(ClientError::MissingSigner)
    }

    /// Signer address, or zero when read-only
    pub fn address(&self) -> Address {
        self.signer
            .as_ref()
            .map(|signer| signer.address())
            .unwrap_or_else(Address::zero)
    }

    /// Send a contract call and wait for its receipt
    ///
    /// Waits for `confirmations` blocks, bounded by `tx_timeout`. Fails when the
    /// transaction is dropped or mined with a failed status.
    pub async fn send_and_confirm<D: Detokenize>(
        &self,
        call: ContractCall<SignerClient, D>,
        label: &str,
    ) -> ClientResult<TransactionReceipt> {
        let pending = call.send().await.map_err(ClientError::contract)?;
        let tx_hash = pending.tx_hash();
        info!("{} transaction sent: {:?}", label, tx_hash);

        let receipt = tokio::time::timeout(
            self.config.tx_timeout,
            pending.confirmations(self.config.confirmations),
        )
        .await
        .map_err(|_| ClientError::ConfirmationTimeout {
            tx_hash,
            timeout_secs: self.config.tx_timeout.as_secs(),
        })?
        .map_err(|e| ClientError::Provider(e.to_string()))?
        .ok_or(ClientError::TransactionDropped(tx_hash))?;

        check_receipt(&receipt)?;
        debug!(
            "{} confirmed in block {:?}",
            label,
            receipt.block_number.unwrap_or_default()
        );
        Ok(receipt)
    }
}

/// Reject receipts whose status is not success
pub fn check_receipt(receipt: &TransactionReceipt) -> ClientResult<()> {
    match receipt.status {
        Some(status) if status == U64::from(1) => Ok(()),
        _ => {
            warn!("Transaction {:?} reverted", receipt.transaction_hash);
            Err(ClientError::TransactionReverted(receipt.transaction_hash))
        }
    }
}

/// Decode the first log of type `E` emitted by `emitter`
pub fn find_event<E: EthEvent>(
    receipt: &TransactionReceipt,
    emitter: Address,
) -> ClientResult<E> {
    receipt
        .logs
        .iter()
        .filter(|log| log.address == emitter)
        .find_map(|log| ethers::contract::parse_log::<E>(log.clone()).ok())
        .ok_or_else(|| ClientError::EventNotFound {
            event: E::name().into_owned(),
            tx_hash: receipt.transaction_hash,
        })
}
