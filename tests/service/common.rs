// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use ogpu::service::{ResultSink, RunRecord, Service, ServiceConfig};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tower::util::ServiceExt;

#[derive(Deserialize)]
pub struct MultiplyInput {
    pub a: i64,
    pub b: i64,
}

#[derive(Serialize)]
pub struct MultiplyOutput {
    pub result: i64,
}

/// Collects delivered runs
#[derive(Default)]
pub struct MemorySink {
    pub delivered: Mutex<Vec<RunRecord>>,
}

#[async_trait]
impl ResultSink for MemorySink {
    async fn deliver(&self, record: &RunRecord) -> anyhow::Result<()> {
        self.delivered.lock().await.push(record.clone());
        Ok(())
    }
}

pub fn test_config() -> ServiceConfig {
    ServiceConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        ..Default::default()
    }
}

pub fn test_app(sink: Arc<MemorySink>) -> Router {
    Service::builder()
        .config(test_config())
        .sink(sink)
        .expose("multiply", |data: MultiplyInput| {
            Ok(MultiplyOutput {
                result: data.a * data.b,
            })
        })
        .expose("sleepy", |ms: u64| {
            std::thread::sleep(Duration::from_millis(ms));
            Ok(ms)
        })
        .expose_with_timeout("slow", Duration::from_millis(50), |_: Value| {
            std::thread::sleep(Duration::from_millis(500));
            Ok("too late")
        })
        .expose("fail", |_: Value| -> anyhow::Result<()> {
            anyhow::bail!("model not loaded")
        })
        .expose_async("double", |n: i64| async move { Ok::<_, anyhow::Error>(n * 2) })
        .build()
        .expect("service should build")
        .router()
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// Poll `/runs/:task` until the run leaves `pending`
pub async fn wait_for_run(app: &Router, task: &str) -> Value {
    for _ in 0..200 {
        let (status, body) = send(app, Method::GET, &format!("/runs/{}", task), None).await;
        assert_eq!(status, StatusCode::OK);
        if body["status"] != "pending" {
            return body;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("run for {} never finished", task);
}
