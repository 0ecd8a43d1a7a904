// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Key handling for signing marketplace transactions
pub mod private_key;

pub use private_key::{
    load_optional_private_key, load_private_key, parse_private_key, CLIENT_KEY_ENV,
    MASTER_KEY_ENV,
};
