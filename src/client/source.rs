// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use ethers::types::Address;
use tracing::info;

use super::error::{ClientError, ClientResult};
use super::types::SourceInfo;
use super::OgpuClient;
use crate::contracts::client::find_event;
use crate::contracts::types::{Nexus, SourcePublishedFilter};

impl OgpuClient {
    /// Publish a source and return its on-chain address
    pub async fn publish_source(&self, source_info: &SourceInfo) -> ClientResult<Address> {
        source_info.validate()?;
        let nexus_address = self.chain.nexus_address()?;
        let signer = self.web3.signer()?;

        let metadata = serde_json::to_value(source_info.metadata())
            .map_err(|e| ClientError::Metadata(e.to_string()))?;
        let metadata_url = self.uploader.upload(&metadata).await?;

        let params = source_info.to_params(self.address(), metadata_url);
        info!(
            "Publishing source '{}' on {} (environments: {:#05b})",
            source_info.name, self.chain.name, params.image_environments
        );

        let nexus = Nexus::new(nexus_address, signer);
        let receipt = self
            .web3
            .send_and_confirm(nexus.publish_source(params), "publishSource")
            .await?;

        let event: SourcePublishedFilter = find_event(&receipt, nexus_address)?;
        info!("Source published at {:?}", event.source);
        Ok(event.source)
    }
}
