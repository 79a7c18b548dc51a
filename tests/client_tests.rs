// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::cell::RefCell;

use decofi::client::{Canister, CanisterTransport, GovernanceClient, LoansClient};
use decofi::error::{CoreError, CoreResult};
use decofi::models::{LoanPurpose, LoanStatus, VoteType};
use rust_decimal::Decimal;
use serde_json::{Value, json};

/// Replays one canned reply and records what was sent.
struct Canned {
    reply: CoreResult<Value>,
    calls: RefCell<Vec<(Canister, String, Vec<Value>)>>,
}

impl Canned {
    fn new(reply: CoreResult<Value>) -> Self {
        Self {
            reply,
            calls: RefCell::new(Vec::new()),
        }
    }

    fn last(&self) -> (Canister, String, Vec<Value>) {
        self.calls.borrow().last().cloned().unwrap()
    }
}

impl CanisterTransport for Canned {
    fn call(&self, canister: Canister, method: &str, args: Vec<Value>) -> CoreResult<Value> {
        self.calls
            .borrow_mut()
            .push((canister, method.to_string(), args));
        self.reply.clone()
    }
}

fn wire_loan(status: &str) -> Value {
    json!({
        "id": "3",
        "principal": "aaaaa-aa",
        "amount": 1200.5,
        "term_months": 6,
        "interest_rate": 5,
        "purpose": { "Education": null },
        "application_date": "1700000000000000000",
        "status": { status: null },
        "approval_date": [],
        "collateral_amount": [],
        "credit_score": [],
        "monthly_payment": 203.02
    })
}

#[test]
fn apply_encodes_wire_arguments() {
    let t = Canned::new(Ok(wire_loan("Pending")));
    let client = LoansClient::new(&t);
    let loan = client
        .apply_for_loan("1200.50".parse().unwrap(), 6, LoanPurpose::Education)
        .unwrap();
    assert_eq!(loan.status, LoanStatus::Pending);

    let (canister, method, args) = t.last();
    assert_eq!(canister, Canister::Loans);
    assert_eq!(method, "apply_for_loan");
    assert_eq!(args[0].as_f64(), Some(1200.5));
    assert_eq!(args[1], json!(6));
    assert_eq!(args[2], json!({ "Education": null }));
}

#[test]
fn details_decode_optional_reply() {
    let t = Canned::new(Ok(json!([])));
    assert_eq!(LoansClient::new(&t).get_loan_details("9").unwrap(), None);

    let t = Canned::new(Ok(json!([wire_loan("Approved")])));
    let loan = LoansClient::new(&t).get_loan_details("3").unwrap().unwrap();
    assert_eq!(loan.status, LoanStatus::Approved);
    assert_eq!(t.last().2, vec![json!("3")]);
}

#[test]
fn decode_failures_surface_to_caller() {
    let t = Canned::new(Ok(json!([wire_loan("Suspended")])));
    let err = LoansClient::new(&t).get_loans().unwrap_err();
    assert!(matches!(err, CoreError::UnknownVariant { ref tag, .. } if tag == "Suspended"));
}

#[test]
fn transport_errors_pass_through_unretried() {
    let t = Canned::new(Err(CoreError::RemoteUnavailable("connection refused".into())));
    let client = LoansClient::new(&t);
    assert!(matches!(
        client.get_loans(),
        Err(CoreError::RemoteUnavailable(_))
    ));
    assert_eq!(t.calls.borrow().len(), 1);
}

#[test]
fn eligibility_is_decimal() {
    let t = Canned::new(Ok(json!(7500.25)));
    let max = LoansClient::new(&t).calculate_eligibility().unwrap();
    assert_eq!(max, "7500.25".parse::<Decimal>().unwrap());
}

#[test]
fn payment_arguments() {
    let t = Canned::new(Ok(json!({
        "id": "payment-0",
        "loan_id": "3",
        "principal": "aaaaa-aa",
        "amount": 203.02,
        "timestamp": "1700000000000000000",
        "status": { "Pending": null }
    })));
    let p = LoansClient::new(&t)
        .make_payment("3", "203.02".parse().unwrap())
        .unwrap();
    assert_eq!(p.amount, "203.02".parse::<Decimal>().unwrap());
    let (_, method, args) = t.last();
    assert_eq!(method, "make_payment");
    assert_eq!(args, vec![json!("3"), json!(203.02)]);
}

#[test]
fn governance_vote_encodes_variant() {
    let t = Canned::new(Ok(json!({
        "proposalId": "p1",
        "voterPrincipal": "aaaaa-aa",
        "voteType": { "against": null },
        "votingPower": "5",
        "timestamp": "1700000000000000000"
    })));
    let vote = GovernanceClient::new(&t).vote("p1", VoteType::Against).unwrap();
    assert_eq!(vote.vote_type, VoteType::Against);
    let (canister, method, args) = t.last();
    assert_eq!(canister, Canister::Governance);
    assert_eq!(method, "vote");
    assert_eq!(args[1], json!({ "against": null }));
}
