// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use decofi::config::{AppConfig, ConfigError};

fn with(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
    let env: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    AppConfig::from_lookup(|key| env.get(key).cloned())
}

#[test]
fn defaults_target_local_replica() {
    let cfg = with(&[]).unwrap();
    assert_eq!(cfg.gateway_url, "http://localhost:8000");
    assert_eq!(cfg.timeout, Duration::from_secs(15));
    assert_eq!(cfg.caller, "local-user");
    assert_eq!(cfg.log_filter, "warn");
    assert!(cfg.sandbox_db.is_none());
    assert!(!cfg.canisters.loans.is_empty());
    assert_ne!(cfg.canisters.loans, cfg.canisters.wallet);
}

#[test]
fn overrides_are_trimmed() {
    let cfg = with(&[
        ("DECOFI_GATEWAY_URL", " https://ic0.app "),
        ("DECOFI_TIMEOUT_SECS", "3"),
        ("DECOFI_LOANS_CANISTER_ID", "aaaaa-aa"),
        ("DECOFI_CALLER", "  alice "),
        ("DECOFI_SANDBOX_DB", "/tmp/decofi.sqlite"),
    ])
    .unwrap();
    assert_eq!(cfg.gateway_url, "https://ic0.app");
    assert_eq!(cfg.timeout, Duration::from_secs(3));
    assert_eq!(cfg.canisters.loans, "aaaaa-aa");
    assert_eq!(cfg.caller, "alice");
    assert_eq!(cfg.sandbox_db, Some(PathBuf::from("/tmp/decofi.sqlite")));
}

#[test]
fn bad_timeout_is_rejected() {
    for raw in ["0", "-1", "soon", ""] {
        assert!(
            matches!(
                with(&[("DECOFI_TIMEOUT_SECS", raw)]),
                Err(ConfigError::InvalidTimeout(_))
            ),
            "{raw}"
        );
    }
}

#[test]
fn gateway_needs_http_scheme() {
    assert!(matches!(
        with(&[("DECOFI_GATEWAY_URL", "localhost:8000")]),
        Err(ConfigError::InvalidGateway(_))
    ));
}

#[test]
fn blank_ids_are_rejected() {
    assert!(matches!(
        with(&[("DECOFI_WALLET_CANISTER_ID", "   ")]),
        Err(ConfigError::Empty("DECOFI_WALLET_CANISTER_ID"))
    ));
    // a blank sandbox path just means "use the default location"
    assert!(with(&[("DECOFI_SANDBOX_DB", " ")]).unwrap().sandbox_db.is_none());
}
