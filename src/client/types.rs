// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use ethers::types::{Address, U256};
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::time::{SystemTime, UNIX_EPOCH};

use super::error::{ClientError, ClientResult};
use crate::contracts::types::{
    SourceParams, TaskParams, IMAGE_ENV_AMD, IMAGE_ENV_CPU, IMAGE_ENV_NVIDIA,
};

/// How a source's tasks are settled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryMethod {
    /// The client confirms one response explicitly
    ManualConfirmation = 0,
    /// The first submitted response is accepted
    FirstResponse = 1,
}

impl From<DeliveryMethod> for u8 {
    fn from(method: DeliveryMethod) -> Self {
        method as u8
    }
}

impl TryFrom<u8> for DeliveryMethod {
    type Error = ClientError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(DeliveryMethod::ManualConfirmation),
            1 => Ok(DeliveryMethod::FirstResponse),
            other => Err(ClientError::Decode(format!("unknown delivery method {}", other))),
        }
    }
}

/// Container image URLs per hardware environment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageEnvironments {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nvidia: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amd: Option<String>,
}

impl ImageEnvironments {
    pub fn cpu(url: impl Into<String>) -> Self {
        Self {
            cpu: Some(url.into()),
            ..Default::default()
        }
    }

    pub fn with_nvidia(mut self, url: impl Into<String>) -> Self {
        self.nvidia = Some(url.into());
        self
    }

    pub fn with_amd(mut self, url: impl Into<String>) -> Self {
        self.amd = Some(url.into());
        self
    }

    /// Bitmask of the environments that have an image
    pub fn bitmask(&self) -> u8 {
        let mut mask = 0;
        if self.cpu.is_some() {
            mask |= IMAGE_ENV_CPU;
        }
        if self.nvidia.is_some() {
            mask |= IMAGE_ENV_NVIDIA;
        }
        if self.amd.is_some() {
            mask |= IMAGE_ENV_AMD;
        }
        mask
    }

    fn urls(&self) -> impl Iterator<Item = (&'static str, &String)> {
        [("cpu", &self.cpu), ("nvidia", &self.nvidia), ("amd", &self.amd)]
            .into_iter()
            .filter_map(|(name, url)| url.as_ref().map(|u| (name, u)))
    }
}

/// Source descriptor published to Nexus
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceInfo {
    pub name: String,
    pub description: String,
    pub logo_url: String,
    pub image_envs: ImageEnvironments,
    pub min_payment: U256,
    pub min_available_lockup: U256,
    /// Seconds
    pub max_expiry_duration: u64,
    #[serde(default)]
    pub privacy_enabled: bool,
    #[serde(default)]
    pub optional_params_url: Option<String>,
    pub delivery_method: DeliveryMethod,
}

/// Off-chain part of a source, referenced by `imageMetadataUrl`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMetadata {
    pub name: String,
    pub description: String,
    pub logo_url: String,
    pub image_envs: ImageEnvironments,
}

impl SourceInfo {
    pub fn validate(&self) -> ClientResult<()> {
        if self.name.trim().is_empty() {
            return Err(ClientError::InvalidSource("name must not be empty".to_string()));
        }
        if self.image_envs.bitmask() == 0 {
            return Err(ClientError::InvalidSource(
                "at least one image environment is required".to_string(),
            ));
        }
        if self.max_expiry_duration == 0 {
            return Err(ClientError::InvalidSource(
                "max expiry duration must be positive".to_string(),
            ));
        }

        validate_url("logoUrl", &self.logo_url)?;
        for (env, image_url) in self.image_envs.urls() {
            validate_url(env, image_url)?;
        }
        if let Some(params_url) = &self.optional_params_url {
            validate_url("optionalParamsUrl", params_url)?;
        }
        Ok(())
    }

    pub fn metadata(&self) -> SourceMetadata {
        SourceMetadata {
            name: self.name.clone(),
            description: self.description.clone(),
            logo_url: self.logo_url.clone(),
            image_envs: self.image_envs.clone(),
        }
    }

    /// On-chain parameters, given the uploaded metadata URL
    pub fn to_params(&self, client: Address, image_metadata_url: String) -> SourceParams {
        SourceParams {
            client,
            image_metadata_url,
            image_environments: self.image_envs.bitmask(),
            min_payment: self.min_payment,
            min_available_lockup: self.min_available_lockup,
            max_expiry_duration: U256::from(self.max_expiry_duration),
            privacy_enabled: self.privacy_enabled,
            optional_params_url: self.optional_params_url.clone().unwrap_or_default(),
            delivery_method: self.delivery_method.into(),
        }
    }
}

fn validate_url(field: &str, raw: &str) -> ClientResult<()> {
    url::Url::parse(raw)
        .map(|_| ())
        .map_err(|e| ClientError::InvalidSource(format!("{} '{}' is not a valid URL: {}", field, raw, e)))
}

/// Function call a provider runs for a task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskInput {
    pub function_name: String,
    pub data: serde_json::Value,
}

impl TaskInput {
    pub fn new<T: Serialize>(function_name: impl Into<String>, data: &T) -> ClientResult<Self> {
        let data = serde_json::to_value(data)
            .map_err(|e| ClientError::InvalidTask(format!("data is not serializable: {}", e)))?;
        Ok(Self {
            function_name: function_name.into(),
            data,
        })
    }
}

/// Task published through the Controller
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInfo {
    pub source: Address,
    pub config: TaskInput,
    /// Unix seconds
    pub expiry_time: u64,
    pub payment: U256,
}

impl TaskInfo {
    pub fn validate(&self) -> ClientResult<()> {
        self.validate_at(unix_now())
    }

    pub(crate) fn validate_at(&self, now: u64) -> ClientResult<()> {
        if self.source.is_zero() {
            return Err(ClientError::InvalidTask("source address must not be zero".to_string()));
        }
        if self.config.function_name.trim().is_empty() {
            return Err(ClientError::InvalidTask("function name must not be empty".to_string()));
        }
        if self.expiry_time <= now {
            return Err(ClientError::InvalidTask(format!(
                "expiry time {} is not in the future",
                self.expiry_time
            )));
        }
        Ok(())
    }

    pub fn to_params(&self, config_url: String) -> TaskParams {
        TaskParams {
            source: self.source,
            config: config_url,
            expiry_time: U256::from(self.expiry_time),
            payment: self.payment,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    New = 0,
    Attempted = 1,
    Responded = 2,
    Finalized = 3,
    Expired = 4,
    Canceled = 5,
}

impl TryFrom<u8> for TaskStatus {
    type Error = ClientError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(TaskStatus::New),
            1 => Ok(TaskStatus::Attempted),
            2 => Ok(TaskStatus::Responded),
            3 => Ok(TaskStatus::Finalized),
            4 => Ok(TaskStatus::Expired),
            5 => Ok(TaskStatus::Canceled),
            other => Err(ClientError::Decode(format!("unknown task status {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseStatus {
    Submitted = 0,
    Confirmed = 1,
    Rejected = 2,
}

impl TryFrom<u8> for ResponseStatus {
    type Error = ClientError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ResponseStatus::Submitted),
            1 => Ok(ResponseStatus::Confirmed),
            2 => Ok(ResponseStatus::Rejected),
            other => Err(ClientError::Decode(format!("unknown response status {}", other))),
        }
    }
}

/// A provider's submitted result for a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub address: Address,
    pub task: Address,
    pub provider: Address,
    pub data: String,
    pub payment: U256,
    pub status: ResponseStatus,
    pub timestamp: u64,
    pub confirmed: bool,
}

pub(crate) fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
