// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use serde_json::Value;

use super::arg;
use crate::amortization::check_requested_amount;
use crate::client::{CanisterTransport, LoansClient};
use crate::models::{LoanApplication, LoanPayment, LoanPurpose};
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, parse_months, pretty_table};
use crate::wire::WireVariant;

pub fn handle(transport: &dyn CanisterTransport, m: &clap::ArgMatches, json: bool) -> Result<()> {
    let client = LoansClient::new(transport);
    match m.subcommand() {
        Some(("apply", sub)) => apply(&client, sub, json)?,
        Some(("list", _)) => list(&client, json)?,
        Some(("show", sub)) => show(&client, sub, json)?,
        Some(("pay", sub)) => pay(&client, sub, json)?,
        Some(("payments", sub)) => payments(&client, sub, json)?,
        Some(("eligibility", _)) => {
            let max = client.calculate_eligibility()?;
            if !maybe_print_json(json, &serde_json::json!({ "max_eligible": max }))? {
                println!("You are eligible for a loan up to {}", fmt_money(&max));
            }
        }
        Some(("approve", sub)) => {
            let loan = client.approve_loan(arg(sub, "id")?)?;
            print_loans(&[loan], json)?;
        }
        Some(("reject", sub)) => {
            let loan = client.reject_loan(arg(sub, "id")?)?;
            print_loans(&[loan], json)?;
        }
        _ => {}
    }
    Ok(())
}

type Client<'a> = LoansClient<&'a dyn CanisterTransport>;

fn apply(client: &Client<'_>, sub: &clap::ArgMatches, json: bool) -> Result<()> {
    let amount = parse_decimal(arg(sub, "amount")?)?;
    let months = parse_months(arg(sub, "months")?)?;
    let purpose_tag = arg(sub, "purpose")?;
    let purpose = LoanPurpose::from_tag(purpose_tag)
        .ok_or_else(|| anyhow!("Unknown loan purpose '{}'", purpose_tag))?;

    let ceiling = client
        .calculate_eligibility()
        .context("Could not determine loan eligibility")?;
    check_requested_amount(amount, ceiling)?;

    let loan = client.apply_for_loan(amount, months, purpose)?;
    if !maybe_print_json(json, &loan.to_view())? {
        println!(
            "Application {} submitted: {} over {} months at {}% ({} / month), status {}",
            loan.id,
            fmt_money(&loan.amount),
            loan.term_months,
            loan.interest_rate,
            fmt_money(&loan.monthly_payment),
            loan.status
        );
    }
    Ok(())
}

fn list(client: &Client<'_>, json: bool) -> Result<()> {
    let loans = client.get_loans()?;
    print_loans(&loans, json)
}

fn show(client: &Client<'_>, sub: &clap::ArgMatches, json: bool) -> Result<()> {
    let id = arg(sub, "id")?;
    let loan = client
        .get_loan_details(id)?
        .ok_or_else(|| anyhow!("Loan '{}' not found", id))?;
    print_loans(&[loan], json)
}

fn pay(client: &Client<'_>, sub: &clap::ArgMatches, json: bool) -> Result<()> {
    let id = arg(sub, "id")?;
    let amount = match sub.get_one::<String>("amount") {
        Some(raw) => parse_decimal(raw)?,
        None => {
            client
                .get_loan_details(id)?
                .ok_or_else(|| anyhow!("Loan '{}' not found", id))?
                .monthly_payment
        }
    };
    let payment = client.make_payment(id, amount)?;
    if !maybe_print_json(json, &payment.to_view())? {
        println!(
            "Payment {} of {} on loan {}: {}",
            payment.id,
            fmt_money(&payment.amount),
            payment.loan_id,
            payment.status
        );
    }
    Ok(())
}

fn payments(client: &Client<'_>, sub: &clap::ArgMatches, json: bool) -> Result<()> {
    let list = client.get_payments(arg(sub, "id")?)?;
    print_payments(&list, json)
}

fn print_loans(loans: &[LoanApplication], json: bool) -> Result<()> {
    let views: Vec<Value> = loans.iter().map(LoanApplication::to_view).collect();
    if maybe_print_json(json, &views)? {
        return Ok(());
    }
    let rows = loans
        .iter()
        .map(|l| {
            vec![
                l.id.clone(),
                fmt_money(&l.amount),
                l.term_months.to_string(),
                format!("{}%", l.interest_rate),
                l.purpose.to_string(),
                l.status.to_string(),
                fmt_money(&l.monthly_payment),
                l.application_date.map(|t| t.to_string()).unwrap_or_default(),
                l.approval_date.map(|t| t.to_string()).unwrap_or_else(|| "-".into()),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &[
                "ID", "Amount", "Months", "Rate", "Purpose", "Status", "Monthly", "Applied",
                "Approved",
            ],
            rows
        )
    );
    Ok(())
}

fn print_payments(payments: &[LoanPayment], json: bool) -> Result<()> {
    let views: Vec<Value> = payments.iter().map(LoanPayment::to_view).collect();
    if maybe_print_json(json, &views)? {
        return Ok(());
    }
    let rows = payments
        .iter()
        .map(|p| {
            vec![
                p.id.clone(),
                p.loan_id.clone(),
                fmt_money(&p.amount),
                p.timestamp.to_string(),
                p.status.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["ID", "Loan", "Amount", "Date", "Status"], rows)
    );
    Ok(())
}
