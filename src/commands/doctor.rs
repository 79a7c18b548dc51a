// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::client::{CanisterTransport, LoansClient};
use crate::models::{LoanApplication, LoanPayment, LoanStatus, PaymentStatus};
use crate::utils::{maybe_print_json, pretty_table};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub kind: &'static str,
    pub detail: String,
}

/// Consistency checks over one loan snapshot and its payments. The quoted
/// payment is the service's own and is not recomputed here.
pub fn check_loan(loan: &LoanApplication, payments: &[LoanPayment]) -> Vec<Issue> {
    let mut issues = Vec::new();

    // 1) Status past Pending (other than Rejected) needs an approval date
    let approved_states = [
        LoanStatus::Approved,
        LoanStatus::Active,
        LoanStatus::PaidOff,
        LoanStatus::Defaulted,
    ];
    if approved_states.contains(&loan.status) && loan.approval_date.is_none() {
        issues.push(Issue {
            kind: "missing_approval_date",
            detail: format!("loan {} is {}", loan.id, loan.status),
        });
    }

    // 2) Payments that belong to another loan
    for p in payments.iter().filter(|p| p.loan_id != loan.id) {
        issues.push(Issue {
            kind: "payment_foreign_loan",
            detail: format!(
                "payment {} listed under {} references {}",
                p.id, loan.id, p.loan_id
            ),
        });
    }

    // 3) Fully repaid but still Active
    let paid: Decimal = payments
        .iter()
        .filter(|p| p.loan_id == loan.id && p.status == PaymentStatus::Completed)
        .fold(Decimal::ZERO, |acc, p| {
            acc.checked_add(p.amount).unwrap_or(Decimal::MAX)
        });
    if loan.status == LoanStatus::Active && paid >= loan.total_repayable() {
        issues.push(Issue {
            kind: "repaid_still_active",
            detail: format!(
                "loan {} has {} paid of {}",
                loan.id,
                paid,
                loan.total_repayable()
            ),
        });
    }

    issues
}

pub fn handle(transport: &dyn CanisterTransport, json: bool) -> Result<()> {
    let client = LoansClient::new(transport);
    let mut issues = Vec::new();
    for loan in client.get_loans()? {
        let payments = client.get_payments(&loan.id)?;
        issues.extend(check_loan(&loan, &payments));
    }

    if maybe_print_json(json, &issues)? {
        return Ok(());
    }
    if issues.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        let rows = issues
            .into_iter()
            .map(|i| vec![i.kind.to_string(), i.detail])
            .collect();
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
