// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use decofi::client::{CanisterTransport, HttpTransport};
use decofi::config::AppConfig;
use decofi::sandbox::Sandbox;
use decofi::{cli, commands, telemetry};

fn loans_transport(cfg: &AppConfig, remote: bool) -> Result<Box<dyn CanisterTransport>> {
    if remote {
        Ok(Box::new(HttpTransport::from_config(cfg)?))
    } else {
        Ok(Box::new(Sandbox::from_config(cfg)?))
    }
}

fn main() -> Result<()> {
    let matches = cli::build_cli().get_matches();

    let cfg = AppConfig::load()?;
    telemetry::init(&cfg.log_filter)?;

    let json = matches.get_flag("json");
    let remote = matches.get_flag("remote");

    match matches.subcommand() {
        Some(("quote", sub)) => commands::quote::quote(sub, json)?,
        Some(("preview", sub)) => commands::quote::preview(sub, json)?,
        Some(("schedule", sub)) => commands::quote::schedule(sub, json)?,
        Some(("advise", sub)) => commands::advisor::handle(sub, json)?,
        Some(("loan", sub)) => {
            let transport = loans_transport(&cfg, remote)?;
            commands::loans::handle(transport.as_ref(), sub, json)?
        }
        Some(("doctor", _)) => {
            let transport = loans_transport(&cfg, remote)?;
            commands::doctor::handle(transport.as_ref(), json)?
        }
        // wallet and governance have no sandbox
        Some(("wallet", sub)) => {
            commands::wallet::handle(&HttpTransport::from_config(&cfg)?, sub, json)?
        }
        Some(("gov", sub)) => {
            commands::governance::handle(&HttpTransport::from_config(&cfg)?, sub, json)?
        }
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
