// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Optional TOML settings file
//!
//! ```toml
//! default_chain = "testnet"
//!
//! [chains.testnet]
//! rpc_url = "http://localhost:8545"
//! nexus = "0x..."
//! controller = "0x..."
//! terminal = "0x..."
//! confirmation_blocks = 2
//! ```
//!
//! Chain keys accept anything [`ChainId`]'s `FromStr` accepts.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

use super::chains::{ChainConfig, ChainId, ChainRegistry};
use crate::client::error::{ClientError, ClientResult};

pub const SETTINGS_ENV: &str = "OGPU_CONFIG";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChainOverride {
    pub rpc_url: Option<String>,
    pub nexus: Option<String>,
    pub controller: Option<String>,
    pub terminal: Option<String>,
    pub confirmation_blocks: Option<u64>,
    pub tx_timeout_secs: Option<u64>,
}

impl ChainOverride {
    fn apply(&self, config: &mut ChainConfig) {
        if let Some(rpc_url) = &self.rpc_url {
            config.rpc_url = rpc_url.clone();
        }
        if let Some(nexus) = &self.nexus {
            config.contracts.nexus = nexus.clone();
        }
        if let Some(controller) = &self.controller {
            config.contracts.controller = controller.clone();
        }
        if let Some(terminal) = &self.terminal {
            config.contracts.terminal = terminal.clone();
        }
        if let Some(blocks) = self.confirmation_blocks {
            config.confirmation_blocks = blocks;
        }
        if let Some(secs) = self.tx_timeout_secs {
            config.tx_timeout_secs = secs;
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    pub default_chain: Option<String>,
    #[serde(default)]
    pub chains: BTreeMap<String, ChainOverride>,
}

impl Settings {
    pub fn from_file(path: impl AsRef<Path>) -> ClientResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ClientError::Config(format!("{}: {}", path.display(), e)))?;
        let settings = Self::from_toml(&content)?;
        info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn from_toml(content: &str) -> ClientResult<Self> {
        toml::from_str(content).map_err(|e| ClientError::Config(e.to_string()))
    }

    /// Load from the path in `OGPU_CONFIG`, or defaults when unset
    pub fn from_env() -> ClientResult<Self> {
        match std::env::var(SETTINGS_ENV) {
            Ok(path) => Self::from_file(path),
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn default_chain(&self) -> ClientResult<Option<ChainId>> {
        self.default_chain
            .as_deref()
            .map(str::parse::<ChainId>)
            .transpose()
    }

    /// Build a registry with these overrides applied on top of the env defaults
    pub fn into_registry(self) -> ClientResult<ChainRegistry> {
        let mut registry = ChainRegistry::new();
        if let Some(chain) = self.default_chain()? {
            registry.set_default_chain(chain);
        }

        for (key, chain_override) in &self.chains {
            let chain = key.parse::<ChainId>()?;
            if let Some(config) = registry.get_chain_mut(chain.id()) {
                debug!("Applying settings override for {}", chain);
                chain_override.apply(config);
            }
        }

        Ok(registry)
    }
}
