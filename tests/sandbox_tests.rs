// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use decofi::client::{Canister, CanisterTransport, LoansClient, WalletClient};
use decofi::commands::doctor::check_loan;
use decofi::error::CoreError;
use decofi::models::{LoanPurpose, LoanStatus, PaymentStatus};
use decofi::sandbox::Sandbox;
use rust_decimal::Decimal;

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

#[test]
fn application_starts_pending_with_amortized_quote() {
    let sb = Sandbox::in_memory("alice").unwrap();
    let client = LoansClient::new(&sb);
    let loan = client
        .apply_for_loan(d("10000"), 12, LoanPurpose::Business)
        .unwrap();
    assert_eq!(loan.id, "0");
    assert_eq!(loan.status, LoanStatus::Pending);
    assert_eq!(loan.purpose, LoanPurpose::Business);
    assert_eq!(loan.interest_rate, d("5"));
    assert_eq!(loan.monthly_payment, d("856.07"));
    assert_eq!(loan.principal.as_deref(), Some("alice"));
    assert!(loan.application_date.is_some());
    assert!(loan.approval_date.is_none());

    let second = client
        .apply_for_loan(d("500"), 6, LoanPurpose::Medical)
        .unwrap();
    assert_eq!(second.id, "1");
    assert_eq!(client.get_loans().unwrap().len(), 2);
}

#[test]
fn invalid_application_is_rejected_by_service() {
    let sb = Sandbox::in_memory("alice").unwrap();
    let client = LoansClient::new(&sb);
    let err = client
        .apply_for_loan(d("1000"), 0, LoanPurpose::Personal)
        .unwrap_err();
    assert!(matches!(err, CoreError::RemoteRejected { .. }), "{:?}", err);
}

#[test]
fn full_lifecycle_to_paid_off() {
    let sb = Sandbox::in_memory("alice").unwrap();
    let client = LoansClient::new(&sb);
    let loan = client
        .apply_for_loan(d("10000"), 12, LoanPurpose::Housing)
        .unwrap();

    // no payments before approval
    let err = client.make_payment(&loan.id, d("856.07")).unwrap_err();
    assert!(matches!(err, CoreError::RemoteRejected { .. }));

    let active = client.approve_loan(&loan.id).unwrap();
    assert_eq!(active.status, LoanStatus::Active);
    assert!(active.approval_date.is_some());

    // a decided loan cannot be decided again
    assert!(matches!(
        client.reject_loan(&loan.id),
        Err(CoreError::RemoteRejected { .. })
    ));

    for _ in 0..11 {
        let p = client.make_payment(&loan.id, d("856.07")).unwrap();
        assert_eq!(p.status, PaymentStatus::Completed);
        assert_eq!(p.loan_id, loan.id);
    }
    let mid = client.get_loan_details(&loan.id).unwrap().unwrap();
    assert_eq!(mid.status, LoanStatus::Active);

    client.make_payment(&loan.id, d("856.07")).unwrap();
    let done = client.get_loan_details(&loan.id).unwrap().unwrap();
    assert_eq!(done.status, LoanStatus::PaidOff);
    assert!(done.status.is_terminal());

    let payments = client.get_payments(&loan.id).unwrap();
    assert_eq!(payments.len(), 12);
    let total: Decimal = payments.iter().map(|p| p.amount).sum();
    assert_eq!(total, d("10272.84"));

    assert!(check_loan(&done, &payments).is_empty());

    // paid off loans take no more money
    assert!(client.make_payment(&loan.id, d("1")).is_err());
}

#[test]
fn rejection_is_terminal() {
    let sb = Sandbox::in_memory("alice").unwrap();
    let client = LoansClient::new(&sb);
    let loan = client
        .apply_for_loan(d("2500"), 24, LoanPurpose::Education)
        .unwrap();
    let rejected = client.reject_loan(&loan.id).unwrap();
    assert_eq!(rejected.status, LoanStatus::Rejected);
    assert!(rejected.approval_date.is_none());
    assert!(client.approve_loan(&loan.id).is_err());
    assert!(client.make_payment(&loan.id, d("100")).is_err());
}

#[test]
fn sub_cent_application_is_refused() {
    let sb = Sandbox::in_memory("alice").unwrap();
    let client = LoansClient::new(&sb);
    // 0.50 over 30 years at 5 % is a fraction of a cent a month
    let err = client
        .apply_for_loan(d("0.5"), 360, LoanPurpose::Personal)
        .unwrap_err();
    assert!(matches!(err, CoreError::RemoteRejected { .. }), "{:?}", err);
    assert!(client.get_loans().unwrap().is_empty());
}

#[test]
fn approval_walks_the_lifecycle() {
    let sb = Sandbox::in_memory("alice").unwrap();
    let client = LoansClient::new(&sb);
    let loan = client
        .apply_for_loan(d("1200"), 12, LoanPurpose::Personal)
        .unwrap();
    let active = client.approve_loan(&loan.id).unwrap();
    assert!(LoanStatus::Pending.can_transition_to(LoanStatus::Approved));
    assert!(LoanStatus::Approved.can_transition_to(active.status));
    // an active loan is not pending any more
    for again in [client.approve_loan(&loan.id), client.reject_loan(&loan.id)] {
        match again.unwrap_err() {
            CoreError::RemoteRejected { message, .. } => assert!(message.contains("Active")),
            other => panic!("unexpected {:?}", other),
        }
    }
}

#[test]
fn unknown_loan() {
    let sb = Sandbox::in_memory("alice").unwrap();
    let client = LoansClient::new(&sb);
    assert_eq!(client.get_loan_details("nope").unwrap(), None);
    assert!(matches!(
        client.approve_loan("nope"),
        Err(CoreError::RemoteRejected { .. })
    ));
    assert!(client.get_payments("nope").unwrap().is_empty());
}

#[test]
fn eligibility_is_twice_token_balance() {
    let sb = Sandbox::in_memory("alice").unwrap();
    assert_eq!(LoansClient::new(&sb).calculate_eligibility().unwrap(), d("10000"));
    sb.set_token_balance("alice", d("1250.5")).unwrap();
    assert_eq!(LoansClient::new(&sb).calculate_eligibility().unwrap(), d("2501"));
}

#[test]
fn loans_are_scoped_to_caller() {
    let mut sb = Sandbox::in_memory("alice").unwrap();
    let id = LoansClient::new(&sb)
        .apply_for_loan(d("1000"), 12, LoanPurpose::Agriculture)
        .unwrap()
        .id;

    sb.set_caller("bob");
    let client = LoansClient::new(&sb);
    assert!(client.get_loans().unwrap().is_empty());
    // details are not filtered
    assert!(client.get_loan_details(&id).unwrap().is_some());
}

#[test]
fn sandbox_persists_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sandbox.sqlite");
    {
        let sb = Sandbox::open(&path, "alice").unwrap();
        LoansClient::new(&sb)
            .apply_for_loan(d("3000"), 36, LoanPurpose::Personal)
            .unwrap();
    }
    let sb = Sandbox::open(&path, "alice").unwrap();
    let client = LoansClient::new(&sb);
    let loans = client.get_loans().unwrap();
    assert_eq!(loans.len(), 1);
    assert_eq!(loans[0].amount, d("3000"));
    // counter survives reopening
    let next = client
        .apply_for_loan(d("100"), 1, LoanPurpose::Personal)
        .unwrap();
    assert_eq!(next.id, "1");
}

#[test]
fn sandbox_only_serves_loans() {
    let sb = Sandbox::in_memory("alice").unwrap();
    assert!(matches!(
        WalletClient::new(&sb).get_balance(),
        Err(CoreError::RemoteUnavailable(_))
    ));
    assert!(matches!(
        sb.call(Canister::Loans, "drain_pool", vec![]),
        Err(CoreError::RemoteUnavailable(_))
    ));
}
