// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! A handler that sleeps past its 2 second timeout.
//!
//! Calls to /call/multiply return 504; background runs end as `timed_out`.
use ogpu::service::Service;
use serde::{Deserialize, Serialize};
use std::time::Duration;
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
    std::thread::sleep(Duration::from_secs(3));
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
        .expose_with_timeout("multiply", Duration::from_secs(2), multiply)
        .build()?
        .start()
        .await?;
    Ok(())
}
