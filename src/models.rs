// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::wire::WireVariant;

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal { $($variant:ident => $tag:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $tag)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];
        }

        impl WireVariant for $name {
            const FIELD: &'static str = $field;
            const TAGS: &'static [&'static str] = &[$($tag),+];

            fn tag(&self) -> &'static str {
                match self {
                    $($name::$variant => $tag),+
                }
            }

            fn from_tag(tag: &str) -> Option<Self> {
                match tag {
                    $($tag => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.tag())
            }
        }
    };
}

wire_enum! {
    /// Lifecycle of a loan application as reported by the loans canister.
    LoanStatus, "status" {
        Pending => "Pending",
        Approved => "Approved",
        Rejected => "Rejected",
        Active => "Active",
        PaidOff => "PaidOff",
        Defaulted => "Defaulted",
    }
}

wire_enum! {
    LoanPurpose, "purpose" {
        Personal => "Personal",
        Business => "Business",
        Education => "Education",
        Housing => "Housing",
        Agriculture => "Agriculture",
        Medical => "Medical",
    }
}

wire_enum! {
    PaymentStatus, "payment status" {
        Pending => "Pending",
        Completed => "Completed",
        Failed => "Failed",
    }
}

wire_enum! {
    TxType, "txType" {
        Deposit => "deposit",
        Withdrawal => "withdrawal",
        Transfer => "transfer",
        Interest => "interest",
        Reward => "reward",
        LoanPayment => "loanPayment",
    }
}

wire_enum! {
    TxStatus, "tx status" {
        Pending => "pending",
        Completed => "completed",
        Failed => "failed",
    }
}

wire_enum! {
    ProposalStatus, "proposal status" {
        Active => "active",
        Accepted => "accepted",
        Rejected => "rejected",
        Implemented => "implemented",
    }
}

wire_enum! {
    VoteType, "voteType" {
        For => "for",
        Against => "against",
    }
}

impl LoanStatus {
    /// Transitions the service is allowed to report between two snapshots.
    pub fn can_transition_to(self, next: LoanStatus) -> bool {
        use LoanStatus::*;
        matches!(
            (self, next),
            (Pending, Approved)
                | (Pending, Rejected)
                | (Approved, Active)
                | (Active, PaidOff)
                | (Active, Defaulted)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            LoanStatus::Rejected | LoanStatus::PaidOff | LoanStatus::Defaulted
        )
    }
}

/// Nanoseconds since the Unix epoch, as stamped by the replica.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub u64);

impl Timestamp {
    pub fn nanos(self) -> u64 {
        self.0
    }

    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        i64::try_from(self.0)
            .ok()
            .map(DateTime::<Utc>::from_timestamp_nanos)
    }

    pub fn now() -> Self {
        let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        Timestamp(u64::try_from(nanos).unwrap_or_default())
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(dt) => write!(f, "{}", dt.format("%Y-%m-%d")),
            None => write!(f, "{}ns", self.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanApplication {
    pub id: String,
    pub principal: Option<String>,
    pub amount: Decimal,
    pub term_months: u32,
    pub interest_rate: Decimal,
    pub purpose: LoanPurpose,
    pub application_date: Option<Timestamp>,
    pub status: LoanStatus,
    pub approval_date: Option<Timestamp>,
    pub collateral_amount: Option<Decimal>,
    pub credit_score: Option<u16>,
    pub monthly_payment: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanPayment {
    pub id: String,
    pub loan_id: String,
    pub principal: Option<String>,
    pub amount: Decimal,
    pub timestamp: Timestamp,
    pub status: PaymentStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxRecord {
    pub id: String,
    pub amount: Decimal,
    pub from_principal: String,
    pub to_principal: Option<String>,
    pub timestamp: Timestamp,
    pub tx_type: TxType,
    pub status: TxStatus,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proposal {
    pub id: String,
    pub title: String,
    pub description: String,
    pub proposer_principal: String,
    pub category: String,
    pub status: ProposalStatus,
    pub votes_for: u64,
    pub votes_against: u64,
    pub created_at: Timestamp,
    pub deadline: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vote {
    pub proposal_id: String,
    pub voter_principal: String,
    pub vote_type: VoteType,
    pub voting_power: u64,
    pub timestamp: Timestamp,
}

// View-models. Consumers were written against both snake_case and
// camelCase names; both are emitted here from the single canonical struct.

struct View(Map<String, Value>);

impl View {
    fn new() -> Self {
        View(Map::new())
    }

    fn put(mut self, name: &str, value: impl Serialize) -> Self {
        self.0.insert(
            name.to_string(),
            serde_json::to_value(value).unwrap_or(Value::Null),
        );
        self
    }

    fn both(self, snake: &str, camel: &str, value: impl Serialize + Clone) -> Self {
        self.put(snake, value.clone()).put(camel, value)
    }

    fn done(self) -> Value {
        Value::Object(self.0)
    }
}

fn ts(t: Timestamp) -> String {
    t.0.to_string()
}

impl LoanApplication {
    pub fn to_view(&self) -> Value {
        View::new()
            .put("id", &self.id)
            .put("principal", &self.principal)
            .put("amount", self.amount)
            .both("term_months", "termMonths", self.term_months)
            .both("interest_rate", "interestRate", self.interest_rate)
            .put("purpose", self.purpose)
            .both("application_date", "applicationDate", self.application_date.map(ts))
            .put("status", self.status)
            .both("approval_date", "approvalDate", self.approval_date.map(ts))
            .both("collateral_amount", "collateralAmount", self.collateral_amount)
            .both("credit_score", "creditScore", self.credit_score)
            .both("monthly_payment", "monthlyPayment", self.monthly_payment)
            .done()
    }

    /// Total owed over the full term at the quoted monthly payment,
    /// saturating at `Decimal::MAX`.
    pub fn total_repayable(&self) -> Decimal {
        self.monthly_payment
            .checked_mul(Decimal::from(self.term_months))
            .unwrap_or(Decimal::MAX)
    }
}

impl LoanPayment {
    pub fn to_view(&self) -> Value {
        View::new()
            .put("id", &self.id)
            .both("loan_id", "loanId", &self.loan_id)
            .put("principal", &self.principal)
            .put("amount", self.amount)
            .put("timestamp", ts(self.timestamp))
            .put("status", self.status)
            .done()
    }
}

impl TxRecord {
    pub fn to_view(&self) -> Value {
        View::new()
            .put("id", &self.id)
            .put("amount", self.amount)
            .both("from_principal", "fromPrincipal", &self.from_principal)
            .both("to_principal", "toPrincipal", &self.to_principal)
            .put("timestamp", ts(self.timestamp))
            .both("tx_type", "txType", self.tx_type)
            .put("status", self.status)
            .put("description", &self.description)
            .done()
    }
}

impl Proposal {
    pub fn to_view(&self) -> Value {
        View::new()
            .put("id", &self.id)
            .put("title", &self.title)
            .put("description", &self.description)
            .both("proposer_principal", "proposerPrincipal", &self.proposer_principal)
            .put("category", &self.category)
            .put("status", self.status)
            .both("votes_for", "votesFor", self.votes_for.to_string())
            .both("votes_against", "votesAgainst", self.votes_against.to_string())
            .both("created_at", "createdAt", ts(self.created_at))
            .put("deadline", ts(self.deadline))
            .done()
    }
}

impl Vote {
    pub fn to_view(&self) -> Value {
        View::new()
            .both("proposal_id", "proposalId", &self.proposal_id)
            .both("voter_principal", "voterPrincipal", &self.voter_principal)
            .both("vote_type", "voteType", self.vote_type)
            .both("voting_power", "votingPower", self.voting_power.to_string())
            .put("timestamp", ts(self.timestamp))
            .done()
    }
}
