// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod chains;
pub mod settings;

pub use chains::{ChainConfig, ChainId, ChainRegistry, ContractAddresses, TokenInfo};
pub use settings::{ChainOverride, Settings};
