// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use serde_json::Value;

use crate::client::{CanisterTransport, WalletClient};
use crate::models::TxRecord;
use crate::utils::{fmt_money, maybe_print_json, pretty_table};

pub fn handle(transport: &dyn CanisterTransport, m: &clap::ArgMatches, json: bool) -> Result<()> {
    let client = WalletClient::new(transport);
    match m.subcommand() {
        Some(("balance", _)) => {
            let balance = client.get_balance()?;
            if !maybe_print_json(json, &serde_json::json!({ "balance": balance }))? {
                println!("Balance: {}", fmt_money(&balance));
            }
        }
        Some(("txs", _)) => {
            let txs = client.get_transactions()?;
            let views: Vec<Value> = txs.iter().map(TxRecord::to_view).collect();
            if !maybe_print_json(json, &views)? {
                let rows = txs
                    .iter()
                    .map(|t| {
                        vec![
                            t.id.clone(),
                            t.timestamp.to_string(),
                            t.tx_type.to_string(),
                            fmt_money(&t.amount),
                            t.status.to_string(),
                            t.description.clone().unwrap_or_default(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["ID", "Date", "Type", "Amount", "Status", "Description"], rows)
                );
            }
        }
        _ => {}
    }
    Ok(())
}
