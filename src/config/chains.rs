// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use ethers::types::Address;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::RwLock;

use crate::client::error::{ClientError, ClientResult};

const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

static ACTIVE_CHAIN: RwLock<ChainId> = RwLock::new(ChainId::OgpuMainnet);

/// Known OGPU networks
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChainId {
    OgpuMainnet,
    OgpuTestnet,
}

impl ChainId {
    pub const MAINNET_ID: u64 = 1071;
    pub const TESTNET_ID: u64 = 200820172034;

    pub fn id(self) -> u64 {
        match self {
            ChainId::OgpuMainnet => Self::MAINNET_ID,
            ChainId::OgpuTestnet => Self::TESTNET_ID,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ChainId::OgpuMainnet => "OGPU Mainnet",
            ChainId::OgpuTestnet => "OGPU Testnet",
        }
    }

    pub fn from_u64(id: u64) -> ClientResult<Self> {
        match id {
            Self::MAINNET_ID => Ok(ChainId::OgpuMainnet),
            Self::TESTNET_ID => Ok(ChainId::OgpuTestnet),
            other => Err(ClientError::UnsupportedChain(other)),
        }
    }

    pub fn all() -> [ChainId; 2] {
        [ChainId::OgpuMainnet, ChainId::OgpuTestnet]
    }

    fn env_prefix(self) -> &'static str {
        match self {
            ChainId::OgpuMainnet => "OGPU_MAINNET",
            ChainId::OgpuTestnet => "OGPU_TESTNET",
        }
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.id())
    }
}

impl FromStr for ChainId {
    type Err = ClientError;

    /// Accepts "mainnet", "testnet", the enum-style names or a numeric id
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "mainnet" | "ogpu_mainnet" => Ok(ChainId::OgpuMainnet),
            "testnet" | "ogpu_testnet" => Ok(ChainId::OgpuTestnet),
            other => other
                .parse::<u64>()
                .map_err(|_| ClientError::Config(format!("unknown chain '{}'", s)))
                .and_then(ChainId::from_u64),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenInfo {
    pub symbol: String,
    pub decimals: u8,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContractAddresses {
    pub nexus: String,
    pub controller: String,
    pub terminal: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChainConfig {
    pub chain_id: u64,
    pub name: String,
    pub rpc_url: String,
    pub native_token: TokenInfo,
    pub contracts: ContractAddresses,
    pub confirmation_blocks: u64,
    pub tx_timeout_secs: u64,
}

impl ChainConfig {
    pub fn ogpu_mainnet() -> Self {
        Self::from_env(ChainId::OgpuMainnet, "https://mainnet-rpc.ogpuscan.io")
    }

    pub fn ogpu_testnet() -> Self {
        Self::from_env(ChainId::OgpuTestnet, "https://testnet-rpc.ogpuscan.io")
    }

    pub fn for_chain(chain: ChainId) -> Self {
        match chain {
            ChainId::OgpuMainnet => Self::ogpu_mainnet(),
            ChainId::OgpuTestnet => Self::ogpu_testnet(),
        }
    }

    fn from_env(chain: ChainId, default_rpc: &str) -> Self {
        let prefix = chain.env_prefix();
        let env_or_zero = |name: &str| {
            std::env::var(format!("{}_{}", prefix, name))
                .unwrap_or_else(|_| ZERO_ADDRESS.to_string())
        };

        ChainConfig {
            chain_id: chain.id(),
            name: chain.name().to_string(),
            rpc_url: std::env::var(format!("{}_RPC_URL", prefix))
                .unwrap_or_else(|_| default_rpc.to_string()),
            native_token: TokenInfo {
                symbol: "OGPU".to_string(),
                decimals: 18,
            },
            contracts: ContractAddresses {
                nexus: env_or_zero("NEXUS"),
                controller: env_or_zero("CONTROLLER"),
                terminal: env_or_zero("TERMINAL"),
            },
            confirmation_blocks: 1,
            tx_timeout_secs: 120,
        }
    }

    /// Select the chain used by [`ChainConfig::current`] and the free client functions
    pub fn set_chain(chain: ChainId) {
        match ACTIVE_CHAIN.write() {
            Ok(mut active) => *active = chain,
            Err(poisoned) => *poisoned.into_inner() = chain,
        }
        tracing::info!("Active chain set to {}", chain);
    }

    pub fn active_chain() -> ChainId {
        match ACTIVE_CHAIN.read() {
            Ok(active) => *active,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    pub fn current() -> Self {
        Self::for_chain(Self::active_chain())
    }

    pub fn is_deployed(&self) -> bool {
        [
            &self.contracts.nexus,
            &self.contracts.controller,
            &self.contracts.terminal,
        ]
        .iter()
        .all(|addr| addr.as_str() != ZERO_ADDRESS)
    }

    pub fn nexus_address(&self) -> ClientResult<Address> {
        self.contract_address("Nexus", &self.contracts.nexus)
    }

    pub fn controller_address(&self) -> ClientResult<Address> {
        self.contract_address("Controller", &self.contracts.controller)
    }

    pub fn terminal_address(&self) -> ClientResult<Address> {
        self.contract_address("Terminal", &self.contracts.terminal)
    }

    fn contract_address(&self, contract: &str, raw: &str) -> ClientResult<Address> {
        let address =
            Address::from_str(raw).map_err(|_| ClientError::InvalidAddress(raw.to_string()))?;
        if address.is_zero() {
            return Err(ClientError::ContractNotConfigured {
                contract: contract.to_string(),
                chain: self.name.clone(),
            });
        }
        Ok(address)
    }
}

#[derive(Debug, Clone)]
pub struct ChainRegistry {
    chains: HashMap<u64, ChainConfig>,
    default_chain: u64,
}

impl ChainRegistry {
    pub fn new() -> Self {
        let chains = ChainId::all()
            .into_iter()
            .map(|id| (id.id(), ChainConfig::for_chain(id)))
            .collect();

        ChainRegistry {
            chains,
            default_chain: ChainConfig::active_chain().id(),
        }
    }

    pub fn get_chain(&self, chain_id: u64) -> Option<&ChainConfig> {
        self.chains.get(&chain_id)
    }

    pub fn get_chain_mut(&mut self, chain_id: u64) -> Option<&mut ChainConfig> {
        self.chains.get_mut(&chain_id)
    }

    pub fn set_default_chain(&mut self, chain: ChainId) {
        self.default_chain = chain.id();
    }

    pub fn get_all_chains(&self) -> Vec<&ChainConfig> {
        let mut chains: Vec<_> = self.chains.values().collect();
        chains.sort_by_key(|c| c.chain_id);
        chains
    }

    pub fn get_default_chain_id(&self) -> u64 {
        self.default_chain
    }
}

impl Default for ChainRegistry {
    fn default() -> Self {
        Self::new()
    }
}
