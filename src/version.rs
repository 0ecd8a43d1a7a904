// Version information for the OGPU SDK

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const VERSION_MAJOR: u32 = 0;
pub const VERSION_MINOR: u32 = 1;
pub const VERSION_PATCH: u32 = 0;

/// Capabilities reported by `ogpu-cli chains` and the service `/health` route
pub const FEATURES: &[&str] = &[
    "publish-source",
    "publish-task",
    "task-responses",
    "confirm-response",
    "cancel-task",
    "set-agent",
    "service-expose",
    "service-timeouts",
    "result-callbacks",
];

/// Supported chain IDs
pub const SUPPORTED_CHAINS: &[u64] = &[
    1071,         // OGPU Mainnet
    200820172034, // OGPU Testnet
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("OGPU SDK {}", VERSION)
}

pub fn get_version_info() -> serde_json::Value {
    serde_json::json!({
        "version": VERSION,
        "features": FEATURES,
        "chains": SUPPORTED_CHAINS,
    })
}
