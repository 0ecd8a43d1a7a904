// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use ethers::types::Address;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::config::ServiceConfig;
use super::errors::ApiError;
use super::handler::{ExposedFunction, HandlerError, HandlerRegistry};
use super::runs::RunStore;
use super::sink::ResultSink;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<HandlerRegistry>,
    pub runs: Arc<RunStore>,
    pub sink: Arc<dyn ResultSink>,
    pub run_slots: Arc<Semaphore>,
}

impl AppState {
    pub fn new(registry: HandlerRegistry, sink: Arc<dyn ResultSink>, config: &ServiceConfig) -> Self {
        Self {
            registry: Arc::new(registry),
            runs: Arc::new(RunStore::with_capacity(config.max_finished_runs)),
            sink,
            run_slots: Arc::new(Semaphore::new(config.max_concurrent_runs.max(1))),
        }
    }

    fn function(&self, name: &str) -> Result<Arc<ExposedFunction>, ApiError> {
        self.registry
            .get(name)
            .ok_or_else(|| ApiError::NotFound(format!("Function '{}' is not exposed", name)))
    }
}

#[derive(Debug, Serialize)]
struct FunctionInfo {
    name: String,
    timeout_secs: Option<f64>,
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/functions", get(functions_handler))
        .route("/call/:function", post(call_handler))
        .route("/run/:function/:task_address", post(run_handler))
        .route("/runs/:task_address", get(run_status_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let mut body = crate::version::get_version_info();
    body["status"] = json!("ok");
    body["functions"] = json!(state.registry.len());
    Json(body)
}

async fn functions_handler(State(state): State<AppState>) -> impl IntoResponse {
    let functions: Vec<FunctionInfo> = state
        .registry
        .list()
        .iter()
        .map(|f| FunctionInfo {
            name: f.name().to_string(),
            timeout_secs: f.timeout().map(|t| t.as_secs_f64()),
        })
        .collect();
    Json(functions)
}

async fn call_handler(
    State(state): State<AppState>,
    Path(function): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let exposed = state.function(&function)?;
    let input = parse_body(&body)?;

    let run = exposed
        .prepare(input)
        .map_err(|e| ApiError::from_handler(&function, e))?;
    let output = run.await.map_err(|e| ApiError::from_handler(&function, e))?;
    Ok(Json(output))
}

async fn run_handler(
    State(state): State<AppState>,
    Path((function, task_address)): Path<(String, String)>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let task_address: Address = task_address
        .parse()
        .map_err(|_| ApiError::InvalidRequest(format!("Invalid task address '{}'", task_address)))?;
    let exposed = state.function(&function)?;
    let input = parse_body(&body)?;

    let run = exposed
        .prepare(input)
        .map_err(|e| ApiError::from_handler(&function, e))?;
    let record = state.runs.begin(&function, task_address).await?;
    info!("Run {} of '{}' accepted for task {:?}", record.run_id, function, task_address);

    let runs = state.runs.clone();
    let sink = state.sink.clone();
    let slots = state.run_slots.clone();
    tokio::spawn(async move {
        // The permit covers the timed run; a detached blocking thread outlives it
        let result = match slots.acquire_owned().await {
            Ok(_permit) => run.await,
            Err(_) => Err(HandlerError::Failed("service is shutting down".to_string())),
        };

        let Some(finished) = runs.complete(task_address, result).await else {
            return;
        };
        if let Err(e) = sink.deliver(&finished).await {
            warn!("Failed to deliver run {}: {:#}", finished.run_id, e);
        }
    });

    Ok((StatusCode::ACCEPTED, Json(record)))
}

async fn run_status_handler(
    State(state): State<AppState>,
    Path(task_address): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let address: Address = task_address
        .parse()
        .map_err(|_| ApiError::InvalidRequest(format!("Invalid task address '{}'", task_address)))?;
    state
        .runs
        .get(&address)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("No run for task {:?}", address)))
}

// An empty body is a null input.
fn parse_body(body: &Bytes) -> Result<Value, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body)
        .map_err(|e| ApiError::ValidationError {
            field: "data".to_string(),
            message: format!("body is not valid JSON: {}", e),
        })
}
