// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use serde_json::json;

use super::arg;
use crate::amortization::{LoanQuote, compute_simple_preview};
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, parse_months, pretty_table};

fn read_quote(sub: &clap::ArgMatches) -> Result<LoanQuote> {
    let amount = parse_decimal(arg(sub, "amount")?)?;
    let rate = parse_decimal(arg(sub, "rate")?)?;
    let months = parse_months(arg(sub, "months")?)?;
    Ok(LoanQuote::new(amount, rate, months)?)
}

pub fn quote(sub: &clap::ArgMatches, json_flag: bool) -> Result<()> {
    let q = read_quote(sub)?;
    let payment = q.monthly_payment()?;
    let interest = q.total_interest()?;
    let out = json!({
        "principal": q.principal,
        "annual_rate_percent": q.annual_rate_percent,
        "term_months": q.term_months,
        "monthly_payment": payment,
        "total_interest": interest,
        "total_repayment": q.principal + interest,
    });
    if !maybe_print_json(json_flag, &out)? {
        let rows = vec![
            vec!["Principal".into(), fmt_money(&q.principal)],
            vec!["Rate (APR %)".into(), q.annual_rate_percent.to_string()],
            vec!["Term (months)".into(), q.term_months.to_string()],
            vec!["Monthly payment".into(), fmt_money(&payment)],
            vec!["Total interest".into(), fmt_money(&interest)],
            vec!["Total repayment".into(), fmt_money(&(q.principal + interest))],
        ];
        println!("{}", pretty_table(&["Quote", "Value"], rows));
    }
    Ok(())
}

pub fn preview(sub: &clap::ArgMatches, json_flag: bool) -> Result<()> {
    let amount = parse_decimal(arg(sub, "amount")?)?;
    let rate = parse_decimal(arg(sub, "rate")?)?;
    let months = parse_months(arg(sub, "months")?)?;
    let estimate = compute_simple_preview(amount, months, rate)?;
    let out = json!({ "estimated_monthly_payment": estimate, "advisory": true });
    if !maybe_print_json(json_flag, &out)? {
        println!(
            "Estimated monthly payment: {} (flat {}% estimate; the service quote is authoritative)",
            fmt_money(&estimate),
            rate
        );
    }
    Ok(())
}

pub fn schedule(sub: &clap::ArgMatches, json_flag: bool) -> Result<()> {
    let q = read_quote(sub)?;
    let rows = q.schedule()?;
    if maybe_print_json(json_flag, &rows)? {
        return Ok(());
    }
    let data = rows
        .iter()
        .map(|i| {
            vec![
                i.period.to_string(),
                fmt_money(&i.payment),
                fmt_money(&i.interest),
                fmt_money(&i.principal),
                fmt_money(&i.balance),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Month", "Payment", "Interest", "Principal", "Balance"], data)
    );
    Ok(())
}
