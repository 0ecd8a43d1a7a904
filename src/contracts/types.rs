// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use ethers::prelude::*;

// Marketplace contract ABIs. Only the entry points used by the client are listed.
abigen!(
    Nexus,
    r#"[
        {
            "inputs": [
                {
                    "components": [
                        {"internalType": "address", "name": "client", "type": "address"},
                        {"internalType": "string", "name": "imageMetadataUrl", "type": "string"},
                        {"internalType": "uint8", "name": "imageEnvironments", "type": "uint8"},
                        {"internalType": "uint256", "name": "minPayment", "type": "uint256"},
                        {"internalType": "uint256", "name": "minAvailableLockup", "type": "uint256"},
                        {"internalType": "uint256", "name": "maxExpiryDuration", "type": "uint256"},
                        {"internalType": "bool", "name": "privacyEnabled", "type": "bool"},
                        {"internalType": "string", "name": "optionalParamsUrl", "type": "string"},
                        {"internalType": "uint8", "name": "deliveryMethod", "type": "uint8"}
                    ],
                    "internalType": "struct SourceParams",
                    "name": "params",
                    "type": "tuple"
                }
            ],
            "name": "publishSource",
            "outputs": [{"internalType": "address", "name": "", "type": "address"}],
            "stateMutability": "nonpayable",
            "type": "function"
        },
        {
            "anonymous": false,
            "inputs": [
                {"indexed": true, "internalType": "address", "name": "client", "type": "address"},
                {"indexed": false, "internalType": "address", "name": "source", "type": "address"}
            ],
            "name": "SourcePublished",
            "type": "event"
        }
    ]"#
);

abigen!(
    Controller,
    r#"[
        {
            "inputs": [
                {
                    "components": [
                        {"internalType": "address", "name": "source", "type": "address"},
                        {"internalType": "string", "name": "config", "type": "string"},
                        {"internalType": "uint256", "name": "expiryTime", "type": "uint256"},
                        {"internalType": "uint256", "name": "payment", "type": "uint256"}
                    ],
                    "internalType": "struct TaskParams",
                    "name": "params",
                    "type": "tuple"
                }
            ],
            "name": "publishTask",
            "outputs": [{"internalType": "address", "name": "", "type": "address"}],
            "stateMutability": "payable",
            "type": "function"
        },
        {
            "inputs": [{"internalType": "address", "name": "response", "type": "address"}],
            "name": "confirmResponse",
            "outputs": [],
            "stateMutability": "nonpayable",
            "type": "function"
        },
        {
            "inputs": [{"internalType": "address", "name": "task", "type": "address"}],
            "name": "cancelTask",
            "outputs": [],
            "stateMutability": "nonpayable",
            "type": "function"
        },
        {
            "anonymous": false,
            "inputs": [
                {"indexed": true, "internalType": "address", "name": "client", "type": "address"},
                {"indexed": true, "internalType": "address", "name": "source", "type": "address"},
                {"indexed": false, "internalType": "address", "name": "task", "type": "address"}
            ],
            "name": "TaskPublished",
            "type": "event"
        }
    ]"#
);

abigen!(
    Terminal,
    r#"[
        {
            "inputs": [
                {"internalType": "address", "name": "agent", "type": "address"},
                {"internalType": "bool", "name": "value", "type": "bool"}
            ],
            "name": "setAgent",
            "outputs": [],
            "stateMutability": "nonpayable",
            "type": "function"
        },
        {
            "anonymous": false,
            "inputs": [
                {"indexed": true, "internalType": "address", "name": "master", "type": "address"},
                {"indexed": true, "internalType": "address", "name": "agent", "type": "address"},
                {"indexed": false, "internalType": "bool", "name": "value", "type": "bool"}
            ],
            "name": "AgentSet",
            "type": "event"
        }
    ]"#
);

abigen!(
    TaskContract,
    r#"[
        {
            "inputs": [],
            "name": "getResponses",
            "outputs": [{"internalType": "address[]", "name": "", "type": "address[]"}],
            "stateMutability": "view",
            "type": "function"
        },
        {
            "inputs": [],
            "name": "getConfirmedResponse",
            "outputs": [{"internalType": "address", "name": "", "type": "address"}],
            "stateMutability": "view",
            "type": "function"
        },
        {
            "inputs": [],
            "name": "getStatus",
            "outputs": [{"internalType": "uint8", "name": "", "type": "uint8"}],
            "stateMutability": "view",
            "type": "function"
        }
    ]"#
);

abigen!(
    ResponseContract,
    r#"[
        {
            "inputs": [],
            "name": "getResponseParams",
            "outputs": [
                {"internalType": "address", "name": "task", "type": "address"},
                {"internalType": "address", "name": "provider", "type": "address"},
                {"internalType": "string", "name": "data", "type": "string"},
                {"internalType": "uint256", "name": "payment", "type": "uint256"}
            ],
            "stateMutability": "view",
            "type": "function"
        },
        {
            "inputs": [],
            "name": "getStatus",
            "outputs": [{"internalType": "uint8", "name": "", "type": "uint8"}],
            "stateMutability": "view",
            "type": "function"
        },
        {
            "inputs": [],
            "name": "getTimestamp",
            "outputs": [{"internalType": "uint256", "name": "", "type": "uint256"}],
            "stateMutability": "view",
            "type": "function"
        },
        {
            "inputs": [],
            "name": "confirmedFlag",
            "outputs": [{"internalType": "bool", "name": "", "type": "bool"}],
            "stateMutability": "view",
            "type": "function"
        }
    ]"#
);

// Image environment bitmask carried in SourceParams.imageEnvironments
pub const IMAGE_ENV_CPU: u8 = 1;
pub const IMAGE_ENV_NVIDIA: u8 = 2;
pub const IMAGE_ENV_AMD: u8 = 4;
