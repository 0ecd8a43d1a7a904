// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use chrono::{DateTime, Utc};
use ethers::types::Address;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::errors::ServiceError;
use super::handler::HandlerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Pending,
    Completed,
    Failed,
    TimedOut,
}

/// One execution of an exposed function for a task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    pub run_id: Uuid,
    pub function: String,
    pub task_address: Address,
    pub status: RunStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl RunRecord {
    pub fn pending(function: &str, task_address: Address) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            function: function.to_string(),
            task_address,
            status: RunStatus::Pending,
            output: None,
            error: None,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn finish(&mut self, result: Result<Value, HandlerError>) {
        match result {
            Ok(output) => {
                self.status = RunStatus::Completed;
                self.output = Some(output);
            }
            Err(err) => {
                self.status = match err {
                    HandlerError::Timeout(_) => RunStatus::TimedOut,
                    _ => RunStatus::Failed,
                };
                self.error = Some(err.to_string());
            }
        }
        self.finished_at = Some(Utc::now());
    }

    pub fn is_pending(&self) -> bool {
        self.status == RunStatus::Pending
    }
}

const DEFAULT_MAX_FINISHED: usize = 1024;

/// Latest run per task address
///
/// Pending runs are always kept. Once more than `max_finished` runs have
/// finished, the ones that finished earliest are dropped.
#[derive(Debug)]
pub struct RunStore {
    runs: RwLock<HashMap<Address, RunRecord>>,
    max_finished: usize,
}

impl Default for RunStore {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_MAX_FINISHED)
    }
}

impl RunStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(max_finished: usize) -> Self {
        Self {
            runs: RwLock::new(HashMap::new()),
            max_finished: max_finished.max(1),
        }
    }

    /// Record a new pending run; a finished run for the same task is replaced
    pub async fn begin(&self, function: &str, task_address: Address) -> Result<RunRecord, ServiceError> {
        let mut runs = self.runs.write().await;
        if runs.get(&task_address).is_some_and(RunRecord::is_pending) {
            return Err(ServiceError::RunInProgress(task_address));
        }
        let record = RunRecord::pending(function, task_address);
        runs.insert(task_address, record.clone());
        Ok(record)
    }

    pub async fn complete(
        &self,
        task_address: Address,
        result: Result<Value, HandlerError>,
    ) -> Option<RunRecord> {
        let mut runs = self.runs.write().await;
        let record = runs.get_mut(&task_address)?;
        record.finish(result);
        let finished = record.clone();
        evict_finished(&mut runs, self.max_finished);
        Some(finished)
    }

    pub async fn count(&self) -> usize {
        self.runs.read().await.len()
    }

    pub async fn get(&self, task_address: &Address) -> Option<RunRecord> {
        self.runs.read().await.get(task_address).cloned()
    }

    pub async fn pending_count(&self) -> usize {
        self.runs
            .read()
            .await
            .values()
            .filter(|r| r.is_pending())
            .count()
    }
}

fn evict_finished(runs: &mut HashMap<Address, RunRecord>, max_finished: usize) {
    let mut finished: Vec<(DateTime<Utc>, Address)> = runs
        .values()
        .filter_map(|r| r.finished_at.map(|at| (at, r.task_address)))
        .collect();
    if finished.len() <= max_finished {
        return;
    }

    finished.sort_unstable();
    let excess = finished.len() - max_finished;
    for (_, address) in finished.into_iter().take(excess) {
        runs.remove(&address);
    }
    debug!("Evicted {} finished run(s)", excess);
}
