// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::http::{Method, StatusCode};
use ogpu::service::{Service, ServiceConfig, ServiceError};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

use super::common::{send, test_app, test_config, MemorySink};

#[tokio::test]
async fn test_health_reports_function_count() {
    let app = test_app(Arc::new(MemorySink::default()));
    let (status, body) = send(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["functions"], 5);
    assert_eq!(body["version"], ogpu::version::VERSION);
    assert!(body["features"]
        .as_array()
        .unwrap()
        .contains(&json!("service-expose")));
    assert_eq!(body["chains"], json!(ogpu::version::SUPPORTED_CHAINS));
}

#[tokio::test]
async fn test_functions_listed_by_name() {
    let app = test_app(Arc::new(MemorySink::default()));
    let (status, body) = send(&app, Method::GET, "/functions", None).await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["double", "fail", "multiply", "sleepy", "slow"]);

    let slow = &body.as_array().unwrap()[4];
    assert_eq!(slow["timeout_secs"], json!(0.05));
    assert_eq!(body[2]["timeout_secs"], Value::Null);
}

#[tokio::test]
async fn test_default_timeout_applies_to_untimed_functions() {
    let app = Service::builder()
        .config(ServiceConfig {
            default_timeout: Some(Duration::from_millis(30)),
            ..test_config()
        })
        .expose("sleepy", |ms: u64| {
            std::thread::sleep(Duration::from_millis(ms));
            Ok(ms)
        })
        .build()
        .unwrap()
        .router();

    let (status, body) = send(&app, Method::POST, "/call/sleepy", Some("300")).await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body["error_type"], "timeout");
}

#[test]
fn test_invalid_function_name_rejected() {
    let result = Service::builder()
        .config(test_config())
        .expose("", |v: Value| Ok(v))
        .build();
    assert!(matches!(result, Err(ServiceError::InvalidName(_))));
}

#[test]
fn test_invalid_config_rejected() {
    let result = Service::builder()
        .config(ServiceConfig {
            callback_url: Some("::not a url::".to_string()),
            ..test_config()
        })
        .build();
    assert!(matches!(result, Err(ServiceError::Config(_))));
}

#[tokio::test]
async fn test_start_fails_when_init_hook_fails() {
    let service = Service::builder()
        .config(test_config())
        .init(|| anyhow::bail!("weights missing"))
        .expose("echo", |v: Value| Ok(v))
        .build()
        .unwrap();

    match service.start().await {
        Err(ServiceError::InitFailed { index, reason }) => {
            assert_eq!(index, 0);
            assert!(reason.contains("weights missing"));
        }
        other => panic!("expected InitFailed, got {:?}", other),
    }
}
