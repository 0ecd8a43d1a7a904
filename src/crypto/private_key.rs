// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Private key loading for transaction signing
//!
//! Keys are 32-byte hex strings with an optional `0x` prefix. The key
//! itself is never logged; only the derived address is.
//!
//! ```no_run
//! use ogpu::crypto::private_key::load_private_key;
//!
//! let wallet = load_private_key("CLIENT_PRIVATE_KEY")?;
//! # Ok::<(), ogpu::client::ClientError>(())
//! ```

use ethers::signers::{LocalWallet, Signer};
use std::env;
use tracing::info;

use crate::client::error::{ClientError, ClientResult};

/// Env var holding the key used for client writes
pub const CLIENT_KEY_ENV: &str = "CLIENT_PRIVATE_KEY";

/// Env var holding the principal key used by `set_agent`
pub const MASTER_KEY_ENV: &str = "MASTER_PRIVATE_KEY";

/// Parse and validate a hex private key into a wallet
pub fn parse_private_key(raw: &str) -> ClientResult<LocalWallet> {
    let key_str = raw.trim();

    if key_str.is_empty() {
        return Err(ClientError::InvalidPrivateKey("key is empty".to_string()));
    }

    let hex_str = key_str.strip_prefix("0x").unwrap_or(key_str);

    if hex_str.len() != 64 {
        return Err(ClientError::InvalidPrivateKey(format!(
            "expected 64 hex characters (32 bytes), got {} characters",
            hex_str.len()
        )));
    }

    let key_bytes = hex::decode(hex_str)
        .map_err(|e| ClientError::InvalidPrivateKey(format!("invalid hex: {}", e)))?;

    let wallet = LocalWallet::from_bytes(&key_bytes)
        .map_err(|e| ClientError::InvalidPrivateKey(e.to_string()))?;

    info!("Signer loaded for address {:?}", wallet.address());
    Ok(wallet)
}

/// Read a private key from `var`
pub fn load_private_key(var: &str) -> ClientResult<LocalWallet> {
    let raw = env::var(var)
        .map_err(|_| ClientError::InvalidPrivateKey(format!("{} environment variable not set", var)))?;
    parse_private_key(&raw)
}

/// Read a private key from `var` if it is set
pub fn load_optional_private_key(var: &str) -> ClientResult<Option<LocalWallet>> {
    match env::var(var) {
        Ok(raw) if !raw.trim().is_empty() => parse_private_key(&raw).map(Some),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "0x1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef";

    #[test]
    fn test_valid_key_with_prefix() {
        let wallet = parse_private_key(KEY).unwrap();
        assert!(!wallet.address().is_zero());
    }

    #[test]
    fn test_valid_key_without_prefix() {
        let with = parse_private_key(KEY).unwrap();
        let without = parse_private_key(&KEY[2..]).unwrap();
        assert_eq!(with.address(), without.address());
    }

    #[test]
    fn test_short_key_rejected() {
        let err = parse_private_key("0x1234").unwrap_err();
        assert!(err.to_string().contains("64 hex characters"));
    }

    #[test]
    fn test_non_hex_key_rejected() {
        let bad = format!("0x{}", "zz".repeat(32));
        assert!(matches!(
            parse_private_key(&bad),
            Err(ClientError::InvalidPrivateKey(_))
        ));
    }

    #[test]
    fn test_env_key_loading() {
        env::set_var("OGPU_TEST_PRIVATE_KEY_LOAD", KEY);
        assert!(load_private_key("OGPU_TEST_PRIVATE_KEY_LOAD").is_ok());
        env::remove_var("OGPU_TEST_PRIVATE_KEY_LOAD");

        assert!(load_private_key("OGPU_TEST_PRIVATE_KEY_LOAD").is_err());
        assert!(load_optional_private_key("OGPU_TEST_PRIVATE_KEY_LOAD")
            .unwrap()
            .is_none());
    }
}
