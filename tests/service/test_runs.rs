// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::http::{Method, StatusCode};
use ogpu::service::{RunStatus, Service, ServiceConfig};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::common::{send, test_app, test_config, wait_for_run, MemorySink};

const TASK: &str = "0x9a52457785367b7cfdf7594847c506b6c80032de";

#[tokio::test]
async fn test_run_accepted_then_completed() {
    let sink = Arc::new(MemorySink::default());
    let app = test_app(sink.clone());

    let uri = format!("/run/multiply/{}", TASK);
    let (status, body) = send(&app, Method::POST, &uri, Some(r#"{"a": 6, "b": 7}"#)).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["status"], "pending");
    assert_eq!(body["function"], "multiply");
    let run_id = body["run_id"].clone();

    let finished = wait_for_run(&app, TASK).await;
    assert_eq!(finished["status"], "completed");
    assert_eq!(finished["output"], json!({"result": 42}));
    assert_eq!(finished["run_id"], run_id);
    assert!(finished["finished_at"].is_string());

    for _ in 0..100 {
        if !sink.delivered.lock().await.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    let delivered = sink.delivered.lock().await;
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].status, RunStatus::Completed);
}

#[tokio::test]
async fn test_pending_run_conflicts() {
    let app = test_app(Arc::new(MemorySink::default()));
    let uri = format!("/run/sleepy/{}", TASK);

    let (first, _) = send(&app, Method::POST, &uri, Some("200")).await;
    assert_eq!(first, StatusCode::ACCEPTED);

    let (second, body) = send(&app, Method::POST, &uri, Some("200")).await;
    assert_eq!(second, StatusCode::CONFLICT);
    assert_eq!(body["error_type"], "conflict");

    let finished = wait_for_run(&app, TASK).await;
    assert_eq!(finished["status"], "completed");

    let (third, _) = send(&app, Method::POST, &uri, Some("1")).await;
    assert_eq!(third, StatusCode::ACCEPTED);
}

#[tokio::test]
async fn test_run_timeout_recorded() {
    let app = test_app(Arc::new(MemorySink::default()));
    let (status, _) = send(&app, Method::POST, &format!("/run/slow/{}", TASK), None).await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let finished = wait_for_run(&app, TASK).await;
    assert_eq!(finished["status"], "timed_out");
    assert!(finished["error"].as_str().unwrap().contains("timed out"));
}

#[tokio::test]
async fn test_failed_run_recorded() {
    let app = test_app(Arc::new(MemorySink::default()));
    send(&app, Method::POST, &format!("/run/fail/{}", TASK), None).await;

    let finished = wait_for_run(&app, TASK).await;
    assert_eq!(finished["status"], "failed");
    assert!(finished.get("output").is_none());
}

#[tokio::test]
async fn test_run_rejects_bad_requests() {
    let app = test_app(Arc::new(MemorySink::default()));

    let (status, _) = send(&app, Method::POST, "/run/multiply/not-an-address", Some("{}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::POST, &format!("/run/divide/{}", TASK), Some("{}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::POST, &format!("/run/multiply/{}", TASK), Some(r#"{"a": 1}"#)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(&app, Method::POST, &format!("/run/multiply/{}", TASK), Some("{a: 6")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // Rejected requests never create a run
    let (status, _) = send(&app, Method::GET, &format!("/runs/{}", TASK), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_background_runs_respect_concurrency_limit() {
    let active = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));
    let (active_in, peak_in) = (active.clone(), peak.clone());

    let app = Service::builder()
        .config(ServiceConfig {
            max_concurrent_runs: 1,
            ..test_config()
        })
        .sink(Arc::new(MemorySink::default()))
        .expose("busy", move |ms: u64| {
            let now = active_in.fetch_add(1, Ordering::SeqCst) + 1;
            peak_in.fetch_max(now, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(ms));
            active_in.fetch_sub(1, Ordering::SeqCst);
            Ok(ms)
        })
        .build()
        .unwrap()
        .router();

    let tasks = [
        "0x00000000000000000000000000000000000000a1",
        "0x00000000000000000000000000000000000000a2",
        "0x00000000000000000000000000000000000000a3",
    ];
    for task in tasks {
        let (status, _) = send(&app, Method::POST, &format!("/run/busy/{}", task), Some("50")).await;
        assert_eq!(status, StatusCode::ACCEPTED);
    }
    for task in tasks {
        assert_eq!(wait_for_run(&app, task).await["status"], "completed");
    }

    assert_eq!(peak.load(Ordering::SeqCst), 1);
    assert_eq!(active.load(Ordering::SeqCst), 0);
}
