// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod client;
pub mod types;

pub use client::{check_receipt, find_event, SignerClient, Web3Client, Web3Config};
pub use types::{
    Controller, Nexus, ResponseContract, TaskContract, Terminal, IMAGE_ENV_AMD, IMAGE_ENV_CPU,
    IMAGE_ENV_NVIDIA,
};
