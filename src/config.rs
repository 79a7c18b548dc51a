// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_GATEWAY: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Canister ids the dashboard ships with for a local replica.
const DEFAULT_LOANS_ID: &str = "r7inp-6aaaa-aaaaa-aaabq-cai";
const DEFAULT_WALLET_ID: &str = "ryjl3-tyaaa-aaaaa-aaaba-cai";
const DEFAULT_GOVERNANCE_ID: &str = "rno2w-sqaaa-aaaaa-aaacq-cai";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("DECOFI_TIMEOUT_SECS must be a positive integer, got '{0}'")]
    InvalidTimeout(String),
    #[error("DECOFI_GATEWAY_URL must start with http:// or https://, got '{0}'")]
    InvalidGateway(String),
    #[error("{0} must not be empty")]
    Empty(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanisterIds {
    pub loans: String,
    pub wallet: String,
    pub governance: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub gateway_url: String,
    pub timeout: Duration,
    pub canisters: CanisterIds,
    /// Identity the sandbox attributes calls to.
    pub caller: String,
    pub sandbox_db: Option<PathBuf>,
    pub log_filter: String,
}

impl AppConfig {
    /// Read configuration from the process environment (and `.env`).
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; tests pass a map instead of the
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let gateway_url = get("DECOFI_GATEWAY_URL", DEFAULT_GATEWAY).trim().to_string();
        if !(gateway_url.starts_with("http://") || gateway_url.starts_with("https://")) {
            return Err(ConfigError::InvalidGateway(gateway_url));
        }

        let raw_timeout = get("DECOFI_TIMEOUT_SECS", &DEFAULT_TIMEOUT_SECS.to_string());
        let timeout = match raw_timeout.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => Duration::from_secs(secs),
            _ => return Err(ConfigError::InvalidTimeout(raw_timeout)),
        };

        let canisters = CanisterIds {
            loans: non_empty(
                "DECOFI_LOANS_CANISTER_ID",
                get("DECOFI_LOANS_CANISTER_ID", DEFAULT_LOANS_ID),
            )?,
            wallet: non_empty(
                "DECOFI_WALLET_CANISTER_ID",
                get("DECOFI_WALLET_CANISTER_ID", DEFAULT_WALLET_ID),
            )?,
            governance: non_empty(
                "DECOFI_GOVERNANCE_CANISTER_ID",
                get("DECOFI_GOVERNANCE_CANISTER_ID", DEFAULT_GOVERNANCE_ID),
            )?,
        };

        Ok(Self {
            gateway_url,
            timeout,
            canisters,
            caller: non_empty("DECOFI_CALLER", get("DECOFI_CALLER", "local-user"))?,
            sandbox_db: lookup("DECOFI_SANDBOX_DB")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            log_filter: get("DECOFI_LOG", "warn"),
        })
    }
}

fn non_empty(key: &'static str, value: String) -> Result<String, ConfigError> {
    let v = value.trim();
    if v.is_empty() {
        return Err(ConfigError::Empty(key));
    }
    Ok(v.to_string())
}
