// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Service exposing one function, with an init hook for loading resources.
//!
//! cargo run --example single_task
//! curl -X POST localhost:5555/call/multiply -d '{"a": 6, "b": 7}'
use ogpu::service::Service;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Deserialize)]
struct MultiplyInput {
    a: i64,
    b: i64,
}

#[derive(Serialize)]
struct MultiplyOutput {
    result: i64,
}

fn multiply(data: MultiplyInput) -> anyhow::Result<MultiplyOutput> {
    info!("Starting multiplication: {} * {}", data.a, data.b);
    let result = data.a * data.b;
    info!("Result computed: {}", result);
    Ok(MultiplyOutput { result })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    Service::builder()
        .init(|| {
            info!("Loading models and resources...");
            info!("Setup complete!");
            Ok(())
        })
        .expose("multiply", multiply)
        .build()?
        .start()
        .await?;
    Ok(())
}
