// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Typed clients over the loans, wallet and governance canisters.
//!
//! A client owns (or borrows) a [`CanisterTransport`] handed to it by the
//! caller. There is no process-wide handle: build one per session and drop
//! it on logout.

use std::fmt;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::error::{CoreError, CoreResult};
use crate::models::{
    LoanApplication, LoanPayment, LoanPurpose, Proposal, TxRecord, Vote, VoteType,
};
use crate::normalize;
use crate::wire::{self, encode_variant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Canister {
    Loans,
    Wallet,
    Governance,
}

impl fmt::Display for Canister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Canister::Loans => "loans",
            Canister::Wallet => "wallet",
            Canister::Governance => "governance",
        })
    }
}

/// Carries one call to a canister method and returns its raw reply.
pub trait CanisterTransport {
    fn call(&self, canister: Canister, method: &str, args: Vec<Value>) -> CoreResult<Value>;
}

impl<T: CanisterTransport + ?Sized> CanisterTransport for &T {
    fn call(&self, canister: Canister, method: &str, args: Vec<Value>) -> CoreResult<Value> {
        (**self).call(canister, method, args)
    }
}

impl<T: CanisterTransport + ?Sized> CanisterTransport for Box<T> {
    fn call(&self, canister: Canister, method: &str, args: Vec<Value>) -> CoreResult<Value> {
        (**self).call(canister, method, args)
    }
}

/// JSON gateway in front of the replica. Each call is
/// `POST {gateway}/{canister_id}/{method}` with `{"args": [...]}`, answered
/// by `{"reply": ...}` or `{"error": "..."}`.
pub struct HttpTransport {
    http: reqwest::blocking::Client,
    gateway: String,
    loans_id: String,
    wallet_id: String,
    governance_id: String,
}

impl HttpTransport {
    pub fn from_config(cfg: &AppConfig) -> CoreResult<Self> {
        let http = crate::utils::http_client(cfg.timeout)
            .map_err(|e| CoreError::RemoteUnavailable(format!("building HTTP client: {e}")))?;
        Ok(Self {
            http,
            gateway: cfg.gateway_url.trim_end_matches('/').to_string(),
            loans_id: cfg.canisters.loans.clone(),
            wallet_id: cfg.canisters.wallet.clone(),
            governance_id: cfg.canisters.governance.clone(),
        })
    }

    fn canister_id(&self, canister: Canister) -> &str {
        match canister {
            Canister::Loans => &self.loans_id,
            Canister::Wallet => &self.wallet_id,
            Canister::Governance => &self.governance_id,
        }
    }
}

impl CanisterTransport for HttpTransport {
    fn call(&self, canister: Canister, method: &str, args: Vec<Value>) -> CoreResult<Value> {
        let url = format!("{}/{}/{}", self.gateway, self.canister_id(canister), method);
        debug!(%canister, method, %url, "canister call");
        let resp = self
            .http
            .post(&url)
            .json(&json!({ "args": args }))
            .send()
            .map_err(|e| CoreError::RemoteUnavailable(format!("{canister}.{method}: {e}")))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(CoreError::RemoteUnavailable(format!(
                "{canister}.{method}: HTTP {status}"
            )));
        }
        let body: Value = resp
            .json()
            .map_err(|e| CoreError::malformed(format!("{canister}.{method}: {e}")))?;
        unwrap_envelope(method, body)
    }
}

fn unwrap_envelope(method: &str, mut body: Value) -> CoreResult<Value> {
    if let Some(msg) = body.get("error") {
        let msg = msg.as_str().map(str::to_string).unwrap_or_else(|| msg.to_string());
        return Err(CoreError::rejected(method, msg));
    }
    body.get_mut("reply")
        .map(Value::take)
        .ok_or_else(|| CoreError::malformed(format!("{method}: reply envelope missing")))
}

/// Float64 argument; the canisters take amounts as IEEE doubles.
pub(crate) fn float_arg(field: &str, d: Decimal) -> CoreResult<Value> {
    d.to_f64()
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| {
            CoreError::invalid(field, format!("{d} is not representable as a double"))
        })
}

fn decode<T>(
    canister: Canister,
    method: &str,
    raw: Value,
    f: impl FnOnce(&Value) -> CoreResult<T>,
) -> CoreResult<T> {
    f(&raw).inspect_err(|e| {
        if e.is_decode_error() {
            warn!(%canister, method, error = %e, "undecodable reply");
        }
    })
}

pub struct LoansClient<T> {
    transport: T,
}

impl<T: CanisterTransport> LoansClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    fn call(&self, method: &str, args: Vec<Value>) -> CoreResult<Value> {
        self.transport.call(Canister::Loans, method, args)
    }

    pub fn apply_for_loan(
        &self,
        amount: Decimal,
        term_months: u32,
        purpose: LoanPurpose,
    ) -> CoreResult<LoanApplication> {
        let args = vec![
            float_arg("amount", amount)?,
            json!(term_months),
            encode_variant(&purpose),
        ];
        let raw = self.call("apply_for_loan", args)?;
        decode(Canister::Loans, "apply_for_loan", raw, normalize::normalize_loan)
    }

    pub fn get_loans(&self) -> CoreResult<Vec<LoanApplication>> {
        let raw = self.call("get_loans", vec![])?;
        decode(Canister::Loans, "get_loans", raw, normalize::normalize_loans)
    }

    pub fn get_loan_details(&self, id: &str) -> CoreResult<Option<LoanApplication>> {
        let raw = self.call("get_loan_details", vec![json!(id)])?;
        decode(
            Canister::Loans,
            "get_loan_details",
            raw,
            normalize::normalize_loan_details,
        )
    }

    pub fn approve_loan(&self, id: &str) -> CoreResult<LoanApplication> {
        let raw = self.call("approve_loan", vec![json!(id)])?;
        decode(Canister::Loans, "approve_loan", raw, normalize::normalize_loan)
    }

    pub fn reject_loan(&self, id: &str) -> CoreResult<LoanApplication> {
        let raw = self.call("reject_loan", vec![json!(id)])?;
        decode(Canister::Loans, "reject_loan", raw, normalize::normalize_loan)
    }

    pub fn make_payment(&self, loan_id: &str, amount: Decimal) -> CoreResult<LoanPayment> {
        let args = vec![json!(loan_id), float_arg("amount", amount)?];
        let raw = self.call("make_payment", args)?;
        decode(Canister::Loans, "make_payment", raw, normalize::normalize_payment)
    }

    pub fn get_payments(&self, loan_id: &str) -> CoreResult<Vec<LoanPayment>> {
        let raw = self.call("get_payments", vec![json!(loan_id)])?;
        decode(Canister::Loans, "get_payments", raw, normalize::normalize_payments)
    }

    /// Largest amount the caller may borrow, computed by the service.
    pub fn calculate_eligibility(&self) -> CoreResult<Decimal> {
        let raw = self.call("calculate_eligibility", vec![])?;
        decode(Canister::Loans, "calculate_eligibility", raw, |v| {
            wire::decimal(v, "eligibility")
        })
    }
}

pub struct WalletClient<T> {
    transport: T,
}

impl<T: CanisterTransport> WalletClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn get_balance(&self) -> CoreResult<Decimal> {
        let raw = self.transport.call(Canister::Wallet, "getBalance", vec![])?;
        decode(Canister::Wallet, "getBalance", raw, |v| wire::decimal(v, "balance"))
    }

    pub fn get_transactions(&self) -> CoreResult<Vec<TxRecord>> {
        let raw = self.transport.call(Canister::Wallet, "getTransactions", vec![])?;
        decode(
            Canister::Wallet,
            "getTransactions",
            raw,
            normalize::normalize_transactions,
        )
    }
}

pub struct GovernanceClient<T> {
    transport: T,
}

impl<T: CanisterTransport> GovernanceClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn get_active_proposals(&self) -> CoreResult<Vec<Proposal>> {
        self.proposals("getActiveProposals")
    }

    pub fn get_past_proposals(&self) -> CoreResult<Vec<Proposal>> {
        self.proposals("getPastProposals")
    }

    fn proposals(&self, method: &str) -> CoreResult<Vec<Proposal>> {
        let raw = self.transport.call(Canister::Governance, method, vec![])?;
        decode(Canister::Governance, method, raw, normalize::normalize_proposals)
    }

    pub fn vote(&self, proposal_id: &str, vote: VoteType) -> CoreResult<Vote> {
        let args = vec![json!(proposal_id), encode_variant(&vote)];
        let raw = self.transport.call(Canister::Governance, "vote", args)?;
        decode(Canister::Governance, "vote", raw, normalize::normalize_vote)
    }

    pub fn get_user_voting_power(&self) -> CoreResult<u64> {
        let raw = self
            .transport
            .call(Canister::Governance, "getUserVotingPower", vec![])?;
        decode(Canister::Governance, "getUserVotingPower", raw, |v| {
            wire::unsigned(v, "votingPower")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_is_unwrapped() {
        let body = json!({ "reply": [{ "Pending": null }] });
        assert_eq!(
            unwrap_envelope("get_loans", body).unwrap(),
            json!([{ "Pending": null }])
        );
        // a null reply is still a reply
        assert_eq!(
            unwrap_envelope("get_loan_details", json!({ "reply": null })).unwrap(),
            Value::Null
        );
    }

    #[test]
    fn error_is_a_rejection() {
        let body = json!({ "error": "Loan not found" });
        let err = unwrap_envelope("approve_loan", body).unwrap_err();
        assert_eq!(err, CoreError::rejected("approve_loan", "Loan not found"));

        // non-text errors keep their JSON rendering
        let err = unwrap_envelope("vote", json!({ "error": { "code": 3 } })).unwrap_err();
        assert!(matches!(
            err,
            CoreError::RemoteRejected { ref message, .. } if message == r#"{"code":3}"#
        ));
    }

    #[test]
    fn error_wins_over_reply() {
        let body = json!({ "reply": 1, "error": "quota exceeded" });
        assert!(matches!(
            unwrap_envelope("get_loans", body),
            Err(CoreError::RemoteRejected { .. })
        ));
    }

    #[test]
    fn bare_body_is_malformed() {
        for body in [json!({}), json!([1, 2]), json!("ok"), json!({ "result": 1 })] {
            assert!(matches!(
                unwrap_envelope("get_loans", body),
                Err(CoreError::MalformedResponse(_))
            ));
        }
    }
}
