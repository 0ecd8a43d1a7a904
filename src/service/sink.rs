// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::runs::RunRecord;

/// Receives every finished background run
#[async_trait]
pub trait ResultSink: Send + Sync {
    async fn deliver(&self, record: &RunRecord) -> Result<()>;
}

/// Logs finished runs and nothing else
#[derive(Debug, Default, Clone)]
pub struct LogSink;

#[async_trait]
impl ResultSink for LogSink {
    async fn deliver(&self, record: &RunRecord) -> Result<()> {
        info!(
            "Run {} of '{}' for task {:?} finished: {:?}",
            record.run_id, record.function, record.task_address, record.status
        );
        Ok(())
    }
}

/// POSTs finished runs as JSON to a callback URL
#[derive(Debug, Clone)]
pub struct HttpCallbackSink {
    client: reqwest::Client,
    url: String,
    attempts: u32,
    backoff: Duration,
}

impl HttpCallbackSink {
    pub fn new(url: impl Into<String>, attempts: u32) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
            attempts: attempts.max(1),
            backoff: Duration::from_millis(500),
        })
    }

    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    async fn post_once(&self, record: &RunRecord) -> Result<()> {
        let response = self.client.post(&self.url).json(record).send().await?;
        if !response.status().is_success() {
            return Err(anyhow!("callback returned status {}", response.status()));
        }
        Ok(())
    }
}

#[async_trait]
impl ResultSink for HttpCallbackSink {
    async fn deliver(&self, record: &RunRecord) -> Result<()> {
        let mut last_error = None;

        for attempt in 1..=self.attempts {
            match self.post_once(record).await {
                Ok(()) => {
                    debug!("Delivered run {} to {}", record.run_id, self.url);
                    return Ok(());
                }
                Err(e) => {
                    warn!(
                        "Callback attempt {}/{} for run {} failed: {}",
                        attempt, self.attempts, record.run_id, e
                    );
                    last_error = Some(e);
                    if attempt < self.attempts {
                        tokio::time::sleep(self.backoff * attempt).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow!("no delivery attempts made")))
    }
}
