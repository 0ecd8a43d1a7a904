// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::http::{Method, StatusCode};
use serde_json::json;
use std::sync::Arc;

use super::common::{send, test_app, MemorySink};

#[tokio::test]
async fn test_call_returns_output() {
    let app = test_app(Arc::new(MemorySink::default()));
    let (status, body) = send(&app, Method::POST, "/call/multiply", Some(r#"{"a": 6, "b": 7}"#)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"result": 42}));
}

#[tokio::test]
async fn test_call_async_function() {
    let app = test_app(Arc::new(MemorySink::default()));
    let (status, body) = send(&app, Method::POST, "/call/double", Some("21")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(42));
}

#[tokio::test]
async fn test_unknown_function_is_404() {
    let app = test_app(Arc::new(MemorySink::default()));
    let (status, body) = send(&app, Method::POST, "/call/divide", Some("{}")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_type"], "not_found");
    assert!(body["request_id"].is_string());
}

#[tokio::test]
async fn test_bad_input_is_422() {
    let app = test_app(Arc::new(MemorySink::default()));
    let (status, body) = send(&app, Method::POST, "/call/multiply", Some(r#"{"a": "six"}"#)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error_type"], "validation_error");
    assert_eq!(body["details"]["field"], "data");
}

#[tokio::test]
async fn test_malformed_json_is_422() {
    let app = test_app(Arc::new(MemorySink::default()));
    let (status, body) = send(&app, Method::POST, "/call/multiply", Some("{a: 6")).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error_type"], "validation_error");
    assert_eq!(body["details"]["field"], "data");
}

#[tokio::test]
async fn test_timeout_is_504() {
    let app = test_app(Arc::new(MemorySink::default()));
    let (status, body) = send(&app, Method::POST, "/call/slow", None).await;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body["error_type"], "timeout");
    assert_eq!(body["details"]["timeout_secs"], json!(0.05));
}

#[tokio::test]
async fn test_handler_error_is_500() {
    let app = test_app(Arc::new(MemorySink::default()));
    let (status, body) = send(&app, Method::POST, "/call/fail", None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error_type"], "handler_failed");
    assert_eq!(body["message"], "model not loaded");
}
