// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use ethers::types::{Address, H256};
use tracing::info;

use super::error::ClientResult;
use super::OgpuClient;
use crate::contracts::types::Terminal;

impl OgpuClient {
    /// Authorize (`value = true`) or revoke an agent for the signer
    pub async fn set_agent(&self, agent_address: Address, value: bool) -> ClientResult<H256> {
        let terminal = Terminal::new(self.chain.terminal_address()?, self.web3.signer()?);
        info!(
            "{} agent {:?} for {:?}",
            if value { "Authorizing" } else { "Revoking" },
            agent_address,
            self.address()
        );

        let receipt = self
            .web3
            .send_and_confirm(terminal.set_agent(agent_address, value), "setAgent")
            .await?;
        Ok(receipt.transaction_hash)
    }
}

/// Set an agent on the active chain, signing with `private_key`
pub async fn set_agent(agent_address: Address, value: bool, private_key: &str) -> ClientResult<H256> {
    let chain = OgpuClient::active_chain_config()?;
    OgpuClient::with_private_key(chain, private_key)?
        .set_agent(agent_address, value)
        .await
}
