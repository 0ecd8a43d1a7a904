// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Provider-side runtime
//!
//! A [`Service`] exposes typed functions over HTTP so the OpenGPU provider
//! infrastructure can hand task payloads to them. Build one with
//! [`Service::builder`], register init hooks and functions, then call
//! [`Service::start`].
//!
//! ```no_run
//! use ogpu::service::Service;
//! use serde::{Deserialize, Serialize};
//! use std::time::Duration;
//!
//! #[derive(Deserialize)]
//! struct Input { a: i64, b: i64 }
//!
//! #[derive(Serialize)]
//! struct Output { result: i64 }
//!
//! # async fn run() -> anyhow::Result<()> {
//! Service::builder()
//!     .init(|| Ok(()))
//!     .expose_with_timeout("multiply", Duration::from_secs(5), |d: Input| {
//!         Ok(Output { result: d.a * d.b })
//!     })
//!     .build()?
//!     .start()
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod errors;
pub mod handler;
pub mod http_server;
pub mod runs;
pub mod sink;

pub use config::ServiceConfig;
pub use errors::{ApiError, ErrorResponse, ServiceError};
pub use handler::{ExposedFunction, HandlerError, HandlerRegistry};
pub use http_server::{create_app, AppState};
pub use runs::{RunRecord, RunStatus, RunStore};
pub use sink::{HttpCallbackSink, LogSink, ResultSink};

use axum::Router;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

type InitHook = Box<dyn FnOnce() -> anyhow::Result<()> + Send + 'static>;

#[derive(Default)]
pub struct ServiceBuilder {
    config: Option<ServiceConfig>,
    sink: Option<Arc<dyn ResultSink>>,
    init_hooks: Vec<InitHook>,
    functions: Vec<ExposedFunction>,
}

impl ServiceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `hook` once before the server binds
    pub fn init<F>(mut self, hook: F) -> Self
    where
        F: FnOnce() -> anyhow::Result<()> + Send + 'static,
    {
        self.init_hooks.push(Box::new(hook));
        self
    }

    pub fn expose<I, O, F>(self, name: impl Into<String>, handler: F) -> Self
    where
        I: DeserializeOwned + Send + 'static,
        O: Serialize + Send + 'static,
        F: Fn(I) -> anyhow::Result<O> + Send + Sync + 'static,
    {
        self.function(ExposedFunction::blocking(name, None, handler))
    }

    pub fn expose_with_timeout<I, O, F>(
        self,
        name: impl Into<String>,
        timeout: Duration,
        handler: F,
    ) -> Self
    where
        I: DeserializeOwned + Send + 'static,
        O: Serialize + Send + 'static,
        F: Fn(I) -> anyhow::Result<O> + Send + Sync + 'static,
    {
        self.function(ExposedFunction::blocking(name, Some(timeout), handler))
    }

    pub fn expose_async<I, O, F, Fut>(self, name: impl Into<String>, handler: F) -> Self
    where
        I: DeserializeOwned + Send + 'static,
        O: Serialize + Send + 'static,
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<O>> + Send + 'static,
    {
        self.function(ExposedFunction::asynchronous(name, None, handler))
    }

    pub fn expose_async_with_timeout<I, O, F, Fut>(
        self,
        name: impl Into<String>,
        timeout: Duration,
        handler: F,
    ) -> Self
    where
        I: DeserializeOwned + Send + 'static,
        O: Serialize + Send + 'static,
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<O>> + Send + 'static,
    {
        self.function(ExposedFunction::asynchronous(name, Some(timeout), handler))
    }

    /// Register an already wrapped function
    pub fn function(mut self, function: ExposedFunction) -> Self {
        self.functions.push(function);
        self
    }

    pub fn config(mut self, config: ServiceConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn sink(mut self, sink: Arc<dyn ResultSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Validate the configuration and register every exposed function
    ///
    /// Without an explicit config, `ServiceConfig::from_env` is used.
    pub fn build(self) -> Result<Service, ServiceError> {
        let config = match self.config {
            Some(config) => {
                config.validate()?;
                config
            }
            None => ServiceConfig::from_env()?,
        };

        let mut registry = HandlerRegistry::new();
        for mut function in self.functions {
            if let Some(default) = config.default_timeout {
                function.set_default_timeout(default);
            }
            registry.register(function)?;
        }
        if registry.is_empty() {
            warn!("Service built without any exposed functions");
        }

        let sink: Arc<dyn ResultSink> = match (self.sink, &config.callback_url) {
            (Some(sink), _) => sink,
            (None, Some(url)) => Arc::new(
                HttpCallbackSink::new(url.clone(), config.callback_retries)
                    .map_err(|e| ServiceError::Config(format!("callback client: {}", e)))?,
            ),
            (None, None) => Arc::new(LogSink),
        };

        let state = AppState::new(registry, sink, &config);
        Ok(Service {
            config,
            state,
            init_hooks: self.init_hooks,
        })
    }
}

pub struct Service {
    config: ServiceConfig,
    state: AppState,
    init_hooks: Vec<InitHook>,
}

impl Service {
    pub fn builder() -> ServiceBuilder {
        ServiceBuilder::new()
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    pub fn router(&self) -> Router {
        create_app(self.state.clone())
    }

    /// Run init hooks in registration order; stops at the first failure
    pub async fn run_init_hooks(&mut self) -> Result<(), ServiceError> {
        let hooks = std::mem::take(&mut self.init_hooks);
        if hooks.is_empty() {
            return Ok(());
        }
        info!("Running {} init hook(s)", hooks.len());

        tokio::task::spawn_blocking(move || -> Result<(), ServiceError> {
            for (index, hook) in hooks.into_iter().enumerate() {
                hook().map_err(|e| ServiceError::InitFailed {
                    index,
                    reason: format!("{:#}", e),
                })?;
            }
            Ok(())
        })
        .await
        .map_err(|e| ServiceError::InitFailed {
            index: 0,
            reason: format!("init thread failed: {}", e),
        })?
    }

    /// Run init hooks, then serve until Ctrl-C
    pub async fn start(mut self) -> Result<(), ServiceError> {
        self.run_init_hooks().await?;

        let addr = self.config.socket_addr()?;
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServiceError::Server(format!("failed to bind {}: {}", addr, e)))?;

        info!(
            "🚀 {} service listening on {} with {} function(s)",
            crate::version::get_version_string(),
            addr,
            self.state.registry.len()
        );
        for function in self.state.registry.list() {
            info!("  exposed: {} (timeout: {:?})", function.name(), function.timeout());
        }

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServiceError::Server(e.to_string()))?;

        info!("Service stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
