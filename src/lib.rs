// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Rust SDK for the OpenGPU marketplace
//!
//! - [`client`]: publish sources and tasks, read and confirm responses,
//!   manage agents
//! - [`service`]: expose functions to providers over HTTP
//! - [`config`]: chain selection and contract addresses
pub mod cli;
pub mod client;
pub mod config;
pub mod contracts;
pub mod crypto;
pub mod service;
pub mod version;

pub use client::{
    cancel_task, confirm_response, get_confirmed_response, get_task_responses, get_task_status,
    publish_source, publish_task, set_agent, ClientError, DeliveryMethod, ImageEnvironments,
    OgpuClient, Response, SourceInfo, TaskInfo, TaskInput,
};
pub use config::{ChainConfig, ChainId};
pub use service::{Service, ServiceConfig, ServiceError};
