// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Service exposing several functions, one of them async.
use ogpu::service::Service;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

#[derive(Deserialize)]
struct Operands {
    a: i64,
    b: i64,
}

#[derive(Serialize)]
struct Output {
    result: i64,
}

#[derive(Deserialize)]
struct FetchInput {
    url: String,
}

#[derive(Serialize)]
struct FetchOutput {
    status: u16,
    bytes: usize,
}

async fn fetch(input: FetchInput) -> anyhow::Result<FetchOutput> {
    let response = reqwest::get(&input.url).await?;
    let status = response.status().as_u16();
    let bytes = response.bytes().await?.len();
    Ok(FetchOutput { status, bytes })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    Service::builder()
        .expose("multiply", |data: Operands| {
            info!("Starting multiplication: {} * {}", data.a, data.b);
            Ok(Output { result: data.a * data.b })
        })
        .expose("add", |data: Operands| {
            Ok(Output {
                result: data.a + data.b,
            })
        })
        .expose_async_with_timeout("fetch", Duration::from_secs(10), fetch)
        .build()?
        .start()
        .await?;
    Ok(())
}
