// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use std::fs;

use super::arg;
use crate::advisor::{FinancialProfile, recommend};
use crate::utils::{fmt_money, maybe_print_json, pretty_table};

pub fn handle(sub: &clap::ArgMatches, json: bool) -> Result<()> {
    let path = arg(sub, "profile")?;
    let raw = fs::read_to_string(path).with_context(|| format!("Reading profile {}", path))?;
    let profile: FinancialProfile =
        serde_json::from_str(&raw).with_context(|| format!("Parsing profile {}", path))?;
    let rec = recommend(&profile)?;
    if maybe_print_json(json, &rec)? {
        return Ok(());
    }

    println!("{}\n", rec.summary);

    let mix = rec
        .investment_recommendations
        .iter()
        .map(|i| {
            vec![
                i.kind.clone(),
                format!("{}%", i.allocation),
                format!("{:?}", i.risk_level).to_lowercase(),
                format!("{}%", i.expected_return),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Investment", "Allocation", "Risk", "Expected return"], mix)
    );

    let s = &rec.savings_recommendations;
    println!(
        "Monthly savings target: {}   Emergency fund target: {}",
        fmt_money(&s.monthly_savings_target),
        fmt_money(&s.emergency_fund_target)
    );
    if let Some(strategy) = &s.debt_reduction_strategy {
        println!("Debt: {}", strategy);
    }
    let products = s
        .savings_products
        .iter()
        .map(|p| {
            vec![
                p.name.clone(),
                format!("{}%", p.interest_rate),
                if p.recommended { "yes".into() } else { "".into() },
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Product", "Rate", "Recommended"], products));

    for (i, step) in rec.next_steps.iter().enumerate() {
        println!("{}. {}", i + 1, step);
    }
    Ok(())
}
