// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Error types for marketplace client operations

use ethers::contract::ContractError;
use ethers::providers::Middleware;
use ethers::types::{Address, H256};
use thiserror::Error;

/// Errors returned by [`crate::client::OgpuClient`] and the free functions
#[derive(Error, Debug)]
pub enum ClientError {
    /// Chain id is not one of the known OGPU networks
    #[error("Unsupported chain id: {0}")]
    UnsupportedChain(u64),

    /// A contract address for the active chain is unset (zero address)
    #[error("{contract} contract is not configured on {chain}")]
    ContractNotConfigured { contract: String, chain: String },

    /// Private key missing or malformed
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    /// Write operation attempted without a signer
    #[error("Private key required for this operation (set CLIENT_PRIVATE_KEY)")]
    MissingSigner,

    /// Address string could not be parsed
    #[error("Invalid address '{0}'")]
    InvalidAddress(String),

    /// Source descriptor failed local validation
    #[error("Invalid source: {0}")]
    InvalidSource(String),

    /// Task descriptor failed local validation
    #[error("Invalid task: {0}")]
    InvalidTask(String),

    /// Metadata could not be uploaded or decoded
    #[error("Metadata error: {0}")]
    Metadata(String),

    /// RPC transport failure
    #[error("Provider error: {0}")]
    Provider(String),

    /// Contract call or transaction submission failed
    #[error("Contract error: {0}")]
    Contract(String),

    /// Transaction was not confirmed before the configured timeout
    #[error("Transaction {tx_hash:?} not confirmed within {timeout_secs}s")]
    ConfirmationTimeout { tx_hash: H256, timeout_secs: u64 },

    /// Transaction disappeared from the mempool
    #[error("Transaction {0:?} was dropped")]
    TransactionDropped(H256),

    /// Transaction mined with a failed status
    #[error("Transaction {0:?} reverted")]
    TransactionReverted(H256),

    /// Expected event missing from the receipt
    #[error("{event} event not found in transaction {tx_hash:?}")]
    EventNotFound { event: String, tx_hash: H256 },

    /// Task has no confirmed response yet
    #[error("No confirmed response for task {0:?}")]
    NoConfirmedResponse(Address),

    /// On-chain value could not be mapped to a client type
    #[error("Decode error: {0}")]
    Decode(String),

    /// Settings file could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    pub(crate) fn contract<M: Middleware>(err: ContractError<M>) -> Self {
        ClientError::Contract(err.to_string())
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
