// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Exposed functions
//!
//! A handler is a typed function `I -> anyhow::Result<O>`. Registration
//! erases the types: JSON input is deserialized into `I` up front, so bad
//! input is rejected before anything runs, and the output is serialized back
//! to JSON.
//!
//! Blocking handlers run on tokio's blocking pool. When their timeout fires
//! the caller gets [`HandlerError::Timeout`] straight away; the thread itself
//! cannot be interrupted and its eventual result is discarded. Async handlers
//! are aborted on timeout.
//!
//! A timed out blocking handler also gives back its background run slot
//! while its thread keeps going, so under repeated timeouts the number of
//! busy blocking threads can exceed `max_concurrent_runs`.

use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::{AbortHandle, JoinError};
use tracing::warn;

use super::errors::ServiceError;

pub type HandlerFuture = BoxFuture<'static, Result<Value, HandlerError>>;

type Prepare = dyn Fn(Value) -> Result<HandlerFuture, serde_json::Error> + Send + Sync;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HandlerError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Handler failed: {0}")]
    Failed(String),

    #[error("Handler timed out after {0:?}")]
    Timeout(Duration),

    #[error("Handler panicked: {0}")]
    Panicked(String),

    #[error("Output serialization failed: {0}")]
    Output(String),
}

impl From<JoinError> for HandlerError {
    fn from(err: JoinError) -> Self {
        if err.is_cancelled() {
            HandlerError::Failed("handler task was cancelled".to_string())
        } else {
            HandlerError::Panicked(err.to_string())
        }
    }
}

fn finish<O: Serialize>(result: anyhow::Result<O>) -> Result<Value, HandlerError> {
    let output = result.map_err(|e| HandlerError::Failed(format!("{:#}", e)))?;
    serde_json::to_value(output).map_err(|e| HandlerError::Output(e.to_string()))
}

struct AbortOnDrop(AbortHandle);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// A named, type-erased handler
pub struct ExposedFunction {
    name: String,
    timeout: Option<Duration>,
    prepare: Arc<Prepare>,
}

impl ExposedFunction {
    /// Wrap a synchronous handler
    pub fn blocking<I, O, F>(name: impl Into<String>, timeout: Option<Duration>, handler: F) -> Self
    where
        I: DeserializeOwned + Send + 'static,
        O: Serialize + Send + 'static,
        F: Fn(I) -> anyhow::Result<O> + Send + Sync + 'static,
    {
        let handler = Arc::new(handler);
        let prepare = move |value: Value| -> Result<HandlerFuture, serde_json::Error> {
            let input: I = serde_json::from_value(value)?;
            let handler = handler.clone();
            let run: HandlerFuture = Box::pin(async move {
                let result = tokio::task::spawn_blocking(move || handler(input)).await?;
                finish(result)
            });
            Ok(run)
        };

        Self {
            name: name.into(),
            timeout,
            prepare: Arc::new(prepare),
        }
    }

    /// Wrap an async handler
    pub fn asynchronous<I, O, F, Fut>(
        name: impl Into<String>,
        timeout: Option<Duration>,
        handler: F,
    ) -> Self
    where
        I: DeserializeOwned + Send + 'static,
        O: Serialize + Send + 'static,
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<O>> + Send + 'static,
    {
        let handler = Arc::new(handler);
        let prepare = move |value: Value| -> Result<HandlerFuture, serde_json::Error> {
            let input: I = serde_json::from_value(value)?;
            let handler = handler.clone();
            let run: HandlerFuture = Box::pin(async move {
                let task = tokio::spawn(handler(input));
                let _guard = AbortOnDrop(task.abort_handle());
                finish(task.await?)
            });
            Ok(run)
        };

        Self {
            name: name.into(),
            timeout,
            prepare: Arc::new(prepare),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub(crate) fn set_default_timeout(&mut self, timeout: Duration) {
        self.timeout.get_or_insert(timeout);
    }

    /// Deserialize `input` and return the run, with the timeout applied
    ///
    /// Nothing executes until the returned future is polled, so the timeout
    /// does not count time spent waiting for a run slot.
    pub fn prepare(&self, input: Value) -> Result<HandlerFuture, HandlerError> {
        let run = (self.prepare)(input).map_err(|e| HandlerError::InvalidInput(e.to_string()))?;

        let Some(limit) = self.timeout else {
            return Ok(run);
        };

        let name = self.name.clone();
        let limited: HandlerFuture = Box::pin(async move {
            match tokio::time::timeout(limit, run).await {
                Ok(result) => result,
                Err(_) => {
                    warn!("Function '{}' exceeded its {:?} timeout", name, limit);
                    Err(HandlerError::Timeout(limit))
                }
            }
        });
        Ok(limited)
    }

    pub async fn call(&self, input: Value) -> Result<Value, HandlerError> {
        self.prepare(input)?.await
    }
}

impl std::fmt::Debug for ExposedFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExposedFunction")
            .field("name", &self.name)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Exposed functions by name
#[derive(Debug, Default)]
pub struct HandlerRegistry {
    functions: HashMap<String, Arc<ExposedFunction>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, function: ExposedFunction) -> Result<(), ServiceError> {
        let name = function.name().to_string();
        if !is_valid_name(&name) {
            return Err(ServiceError::InvalidName(name));
        }
        if self.functions.contains_key(&name) {
            return Err(ServiceError::DuplicateHandler(name));
        }
        self.functions.insert(name, Arc::new(function));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<ExposedFunction>> {
        self.functions.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Functions sorted by name
    pub fn list(&self) -> Vec<Arc<ExposedFunction>> {
        let mut functions: Vec<_> = self.functions.values().cloned().collect();
        functions.sort_by(|a, b| a.name().cmp(b.name()));
        functions
    }
}

// Names become URL path segments.
fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Deserialize)]
    struct MultiplyInput {
        a: i64,
        b: i64,
    }

    #[derive(Serialize)]
    struct MultiplyOutput {
        result: i64,
    }

    fn multiply() -> ExposedFunction {
        ExposedFunction::blocking("multiply", None, |data: MultiplyInput| {
            Ok(MultiplyOutput {
                result: data.a * data.b,
            })
        })
    }

    #[tokio::test]
    async fn test_blocking_handler() {
        let output = multiply().call(json!({"a": 6, "b": 7})).await.unwrap();
        assert_eq!(output, json!({"result": 42}));
    }

    #[tokio::test]
    async fn test_invalid_input_rejected_before_run() {
        let err = multiply().prepare(json!({"a": 6})).err().unwrap();
        assert!(matches!(err, HandlerError::InvalidInput(msg) if msg.contains("b")));
    }

    #[tokio::test]
    async fn test_handler_error_propagates() {
        let failing = ExposedFunction::blocking("fail", None, |_: Value| -> anyhow::Result<()> {
            anyhow::bail!("model not loaded")
        });
        let err = failing.call(Value::Null).await.unwrap_err();
        assert_eq!(err, HandlerError::Failed("model not loaded".to_string()));
    }

    #[tokio::test]
    async fn test_blocking_timeout() {
        let slow = ExposedFunction::blocking(
            "slow",
            Some(Duration::from_millis(50)),
            |data: MultiplyInput| {
                std::thread::sleep(Duration::from_millis(300));
                Ok(MultiplyOutput {
                    result: data.a * data.b,
                })
            },
        );
        let err = slow.call(json!({"a": 1, "b": 2})).await.unwrap_err();
        assert_eq!(err, HandlerError::Timeout(Duration::from_millis(50)));
    }

    #[tokio::test]
    async fn test_async_timeout() {
        let slow = ExposedFunction::asynchronous(
            "slow_async",
            Some(Duration::from_millis(20)),
            |_: Value| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok::<_, anyhow::Error>(json!("never"))
            },
        );
        let err = slow.call(Value::Null).await.unwrap_err();
        assert!(matches!(err, HandlerError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_async_handler() {
        let double = ExposedFunction::asynchronous("double", None, |n: u32| async move {
            Ok::<_, anyhow::Error>(n * 2)
        });
        assert_eq!(double.call(json!(21)).await.unwrap(), json!(42));
    }

    #[tokio::test]
    async fn test_panicking_handler() {
        let panics = ExposedFunction::blocking("panics", None, |_: Value| -> anyhow::Result<()> {
            panic!("boom")
        });
        let err = panics.call(Value::Null).await.unwrap_err();
        assert!(matches!(err, HandlerError::Panicked(_)));
    }

    #[test]
    fn test_default_timeout_only_fills_missing() {
        let mut with = ExposedFunction::blocking("a", Some(Duration::from_secs(2)), |v: Value| Ok(v));
        let mut without = ExposedFunction::blocking("b", None, |v: Value| Ok(v));
        with.set_default_timeout(Duration::from_secs(30));
        without.set_default_timeout(Duration::from_secs(30));
        assert_eq!(with.timeout(), Some(Duration::from_secs(2)));
        assert_eq!(without.timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_registry_rejects_duplicates_and_bad_names() {
        let mut registry = HandlerRegistry::new();
        registry.register(multiply()).unwrap();
        assert!(matches!(
            registry.register(multiply()),
            Err(ServiceError::DuplicateHandler(_))
        ));
        assert!(matches!(
            registry.register(ExposedFunction::blocking("bad/name", None, |v: Value| Ok(v))),
            Err(ServiceError::InvalidName(_))
        ));
        assert_eq!(registry.len(), 1);
        assert!(registry.get("multiply").is_some());
    }
}
