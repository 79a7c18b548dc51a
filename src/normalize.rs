// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Canister replies to flat snapshots.
//!
//! Every normalizer accepts either the wire shape or the view-model produced
//! by `to_view`, so feeding a view back in yields an equal snapshot.

use serde_json::Value;

use crate::error::CoreResult;
use crate::models::{LoanApplication, LoanPayment, Proposal, Timestamp, TxRecord, Vote};
use crate::wire::{
    Shape, as_record, as_sequence, bounded, decimal, decode_optional, decode_variant, omissible,
    optional, required, text, unsigned,
};

pub fn normalize_loan(raw: &Value) -> CoreResult<LoanApplication> {
    let rec = as_record(raw, "loan")?;
    let shape = Shape::of(rec, &["status"]);
    Ok(LoanApplication {
        id: text(required(rec, &["id"])?, "id")?,
        principal: omissible(rec, &["principal"])
            .map(|v| text(v, "principal"))
            .transpose()?,
        amount: decimal(required(rec, &["amount"])?, "amount")?,
        term_months: bounded(required(rec, &["term_months", "termMonths"])?, "term_months")?,
        interest_rate: decimal(
            required(rec, &["interest_rate", "interestRate"])?,
            "interest_rate",
        )?,
        purpose: decode_variant(required(rec, &["purpose"])?)?,
        application_date: omissible(rec, &["application_date", "applicationDate"])
            .map(|v| timestamp(v, "application_date"))
            .transpose()?,
        status: decode_variant(required(rec, &["status"])?)?,
        approval_date: optional(rec, &["approval_date", "approvalDate"], shape)?
            .map(|v| timestamp(v, "approval_date"))
            .transpose()?,
        collateral_amount: optional(rec, &["collateral_amount", "collateralAmount"], shape)?
            .map(|v| decimal(v, "collateral_amount"))
            .transpose()?,
        credit_score: optional(rec, &["credit_score", "creditScore"], shape)?
            .map(|v| bounded(v, "credit_score"))
            .transpose()?,
        monthly_payment: decimal(
            required(rec, &["monthly_payment", "monthlyPayment"])?,
            "monthly_payment",
        )?,
    })
}

pub fn normalize_payment(raw: &Value) -> CoreResult<LoanPayment> {
    let rec = as_record(raw, "payment")?;
    Ok(LoanPayment {
        id: text(required(rec, &["id"])?, "id")?,
        loan_id: text(required(rec, &["loan_id", "loanId"])?, "loan_id")?,
        principal: omissible(rec, &["principal"])
            .map(|v| text(v, "principal"))
            .transpose()?,
        amount: decimal(required(rec, &["amount"])?, "amount")?,
        timestamp: timestamp(required(rec, &["timestamp"])?, "timestamp")?,
        status: decode_variant(required(rec, &["status"])?)?,
    })
}

pub fn normalize_transaction(raw: &Value) -> CoreResult<TxRecord> {
    let rec = as_record(raw, "transaction")?;
    let shape = Shape::of(rec, &["status"]);
    Ok(TxRecord {
        id: text(required(rec, &["id"])?, "id")?,
        amount: decimal(required(rec, &["amount"])?, "amount")?,
        from_principal: text(
            required(rec, &["fromPrincipal", "from_principal"])?,
            "fromPrincipal",
        )?,
        to_principal: optional(rec, &["toPrincipal", "to_principal"], shape)?
            .map(|v| text(v, "toPrincipal"))
            .transpose()?,
        timestamp: timestamp(required(rec, &["timestamp"])?, "timestamp")?,
        tx_type: decode_variant(required(rec, &["txType", "tx_type"])?)?,
        status: decode_variant(required(rec, &["status"])?)?,
        description: optional(rec, &["description"], shape)?
            .map(|v| text(v, "description"))
            .transpose()?,
    })
}

pub fn normalize_proposal(raw: &Value) -> CoreResult<Proposal> {
    let rec = as_record(raw, "proposal")?;
    Ok(Proposal {
        id: text(required(rec, &["id"])?, "id")?,
        title: text(required(rec, &["title"])?, "title")?,
        description: text(required(rec, &["description"])?, "description")?,
        proposer_principal: text(
            required(rec, &["proposerPrincipal", "proposer_principal"])?,
            "proposerPrincipal",
        )?,
        category: text(required(rec, &["category"])?, "category")?,
        status: decode_variant(required(rec, &["status"])?)?,
        votes_for: unsigned(required(rec, &["votesFor", "votes_for"])?, "votesFor")?,
        votes_against: unsigned(
            required(rec, &["votesAgainst", "votes_against"])?,
            "votesAgainst",
        )?,
        created_at: timestamp(required(rec, &["createdAt", "created_at"])?, "createdAt")?,
        deadline: timestamp(required(rec, &["deadline"])?, "deadline")?,
    })
}

pub fn normalize_vote(raw: &Value) -> CoreResult<Vote> {
    let rec = as_record(raw, "vote")?;
    Ok(Vote {
        proposal_id: text(required(rec, &["proposalId", "proposal_id"])?, "proposalId")?,
        voter_principal: text(
            required(rec, &["voterPrincipal", "voter_principal"])?,
            "voterPrincipal",
        )?,
        vote_type: decode_variant(required(rec, &["voteType", "vote_type"])?)?,
        voting_power: unsigned(
            required(rec, &["votingPower", "voting_power"])?,
            "votingPower",
        )?,
        timestamp: timestamp(required(rec, &["timestamp"])?, "timestamp")?,
    })
}

pub fn normalize_loans(raw: &Value) -> CoreResult<Vec<LoanApplication>> {
    normalize_all(raw, "loans", normalize_loan)
}

pub fn normalize_payments(raw: &Value) -> CoreResult<Vec<LoanPayment>> {
    normalize_all(raw, "payments", normalize_payment)
}

pub fn normalize_transactions(raw: &Value) -> CoreResult<Vec<TxRecord>> {
    normalize_all(raw, "transactions", normalize_transaction)
}

pub fn normalize_proposals(raw: &Value) -> CoreResult<Vec<Proposal>> {
    normalize_all(raw, "proposals", normalize_proposal)
}

/// `get_loan_details` replies with an optional loan.
pub fn normalize_loan_details(raw: &Value) -> CoreResult<Option<LoanApplication>> {
    match raw {
        Value::Null => Ok(None),
        Value::Array(seq) => decode_optional(seq.iter().collect())?
            .map(normalize_loan)
            .transpose(),
        single => normalize_loan(single).map(Some),
    }
}

fn normalize_all<T>(
    raw: &Value,
    what: &str,
    each: impl Fn(&Value) -> CoreResult<T>,
) -> CoreResult<Vec<T>> {
    as_sequence(raw, what)?.iter().map(each).collect()
}

fn timestamp(value: &Value, field: &str) -> CoreResult<Timestamp> {
    unsigned(value, field).map(Timestamp)
}
