// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Off-chain metadata publishing
//!
//! Source metadata and task configs are JSON documents referenced on-chain
//! by URL. [`DataUrlUploader`] inlines them as `data:` URLs so no storage
//! service is needed; [`HttpUploader`] posts them to a pinning endpoint.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use super::error::{ClientError, ClientResult};

const DATA_URL_PREFIX: &str = "data:application/json;base64,";

#[async_trait]
pub trait MetadataUploader: Send + Sync {
    /// Store `document` and return the URL that references it
    async fn upload(&self, document: &serde_json::Value) -> ClientResult<String>;
}

#[derive(Debug, Clone, Default)]
pub struct DataUrlUploader;

#[async_trait]
impl MetadataUploader for DataUrlUploader {
    async fn upload(&self, document: &serde_json::Value) -> ClientResult<String> {
        encode_data_url(document)
    }
}

pub fn encode_data_url(document: &serde_json::Value) -> ClientResult<String> {
    let json = serde_json::to_vec(document).map_err(|e| ClientError::Metadata(e.to_string()))?;
    Ok(format!("{}{}", DATA_URL_PREFIX, STANDARD.encode(json)))
}

pub fn decode_data_url(url: &str) -> ClientResult<serde_json::Value> {
    let encoded = url
        .strip_prefix(DATA_URL_PREFIX)
        .ok_or_else(|| ClientError::Metadata("not a base64 JSON data URL".to_string()))?;
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|e| ClientError::Metadata(format!("invalid base64: {}", e)))?;
    serde_json::from_slice(&bytes).map_err(|e| ClientError::Metadata(e.to_string()))
}

#[derive(Deserialize)]
struct UploadResponse {
    url: String,
}

/// Posts documents to an HTTP endpoint answering `{"url": "..."}`
#[derive(Debug, Clone)]
pub struct HttpUploader {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpUploader {
    pub fn new(endpoint: impl Into<String>) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ClientError::Metadata(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl MetadataUploader for HttpUploader {
    async fn upload(&self, document: &serde_json::Value) -> ClientResult<String> {
        debug!("Uploading metadata to {}", self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .json(document)
            .send()
            .await
            .map_err(|e| ClientError::Metadata(format!("upload failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ClientError::Metadata(format!(
                "upload rejected with status {}",
                response.status()
            )));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| ClientError::Metadata(format!("unexpected upload response: {}", e)))?;
        info!("Metadata uploaded to {}", body.url);
        Ok(body.url)
    }
}
