// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use super::errors::ServiceError;

/// Runtime settings for an exposed service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    /// Where finished background runs are POSTed
    pub callback_url: Option<String>,
    pub callback_retries: u32,
    /// Applied to handlers exposed without their own timeout
    pub default_timeout: Option<Duration>,
    pub max_concurrent_runs: usize,
    /// Finished runs kept for `/runs`; the oldest are evicted first
    pub max_finished_runs: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5555,
            callback_url: None,
            callback_retries: 3,
            default_timeout: None,
            max_concurrent_runs: 4,
            max_finished_runs: 1024,
        }
    }
}

impl ServiceConfig {
    /// Load from `OGPU_SERVICE_*` variables, falling back to defaults
    pub fn from_env() -> Result<Self, ServiceError> {
        let mut config = Self::default();

        if let Ok(host) = std::env::var("OGPU_SERVICE_HOST") {
            config.host = host;
        }
        if let Some(port) = parse_env::<u16>("OGPU_SERVICE_PORT")? {
            config.port = port;
        }
        if let Ok(url) = std::env::var("OGPU_CALLBACK_URL") {
            if !url.trim().is_empty() {
                config.callback_url = Some(url);
            }
        }
        if let Some(retries) = parse_env::<u32>("OGPU_CALLBACK_RETRIES")? {
            config.callback_retries = retries;
        }
        if let Some(secs) = parse_env::<f64>("OGPU_DEFAULT_TIMEOUT_SECS")? {
            config.default_timeout = Some(duration_from_secs("OGPU_DEFAULT_TIMEOUT_SECS", secs)?);
        }
        if let Some(runs) = parse_env::<usize>("OGPU_MAX_CONCURRENT_RUNS")? {
            config.max_concurrent_runs = runs;
        }
        if let Some(kept) = parse_env::<usize>("OGPU_MAX_FINISHED_RUNS")? {
            config.max_finished_runs = kept;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.max_concurrent_runs == 0 {
            return Err(ServiceError::Config(
                "max_concurrent_runs must be at least 1".to_string(),
            ));
        }
        if self.max_finished_runs == 0 {
            return Err(ServiceError::Config(
                "max_finished_runs must be at least 1".to_string(),
            ));
        }
        if let Some(url) = &self.callback_url {
            url::Url::parse(url)
                .map_err(|e| ServiceError::Config(format!("invalid callback url '{}': {}", url, e)))?;
        }
        self.socket_addr().map(|_| ())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ServiceError> {
        format!("{}:{}", self.host, self.port)
            .parse::<SocketAddr>()
            .map_err(|e| ServiceError::Config(format!("invalid bind address: {}", e)))
    }
}

fn parse_env<T: FromStr>(name: &str) -> Result<Option<T>, ServiceError> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ServiceError::Config(format!("{} has invalid value '{}'", name, raw))),
        Err(_) => Ok(None),
    }
}

fn duration_from_secs(name: &str, secs: f64) -> Result<Duration, ServiceError> {
    if !secs.is_finite() || secs <= 0.0 {
        return Err(ServiceError::Config(format!("{} must be positive", name)));
    }
    Ok(Duration::from_secs_f64(secs))
}
