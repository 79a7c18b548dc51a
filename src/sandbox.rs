// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Local stand-in for the loans canister.
//!
//! Stores loans and payments in SQLite and answers in the same reply shape
//! as the real service, so everything above the transport runs unchanged.

use std::path::Path;

use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;
use serde_json::{Map, Value, json};
use tracing::{debug, info};

use crate::amortization::compute_monthly_payment;
use crate::client::{Canister, CanisterTransport, float_arg};
use crate::config::AppConfig;
use crate::db;
use crate::error::{CoreError, CoreResult};
use crate::models::{LoanPurpose, LoanStatus, PaymentStatus, Timestamp};
use crate::wire::{WireVariant, bounded, decimal, decode_variant, encode_optional, text};

/// Annual rate the loans canister quotes every application at.
pub const SANDBOX_RATE_PERCENT: Decimal = Decimal::from_parts(5, 0, 0, false, 0);
/// Governance tokens assumed for a caller with no recorded balance.
pub const DEFAULT_TOKEN_BALANCE: Decimal = Decimal::from_parts(5000, 0, 0, false, 0);
/// Borrowing power per governance token.
pub const ELIGIBILITY_MULTIPLIER: Decimal = Decimal::from_parts(2, 0, 0, false, 0);

pub struct Sandbox {
    conn: Connection,
    caller: String,
}

fn storage(e: rusqlite::Error) -> CoreError {
    CoreError::RemoteUnavailable(format!("sandbox storage: {e}"))
}

fn stored_decimal(s: &str, field: &str) -> CoreResult<Decimal> {
    s.parse::<Decimal>()
        .map_err(|_| CoreError::RemoteUnavailable(format!("sandbox storage: bad {field} '{s}'")))
}

fn tag_record(tag: &str) -> Value {
    let mut m = Map::new();
    m.insert(tag.to_string(), Value::Null);
    Value::Object(m)
}

fn arg<'a>(method: &str, args: &'a [Value], idx: usize) -> CoreResult<&'a Value> {
    args.get(idx)
        .ok_or_else(|| CoreError::rejected(method, format!("missing argument {idx}")))
}

struct StoredLoan {
    id: String,
    principal: String,
    amount: String,
    term_months: u32,
    interest_rate: String,
    purpose: String,
    application_date: String,
    status: String,
    approval_date: Option<String>,
    collateral_amount: Option<String>,
    credit_score: Option<u16>,
    monthly_payment: String,
}

const LOAN_COLUMNS: &str = "id, principal, amount, term_months, interest_rate, purpose, \
     application_date, status, approval_date, collateral_amount, credit_score, monthly_payment";

impl StoredLoan {
    fn from_row(r: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: r.get(0)?,
            principal: r.get(1)?,
            amount: r.get(2)?,
            term_months: r.get(3)?,
            interest_rate: r.get(4)?,
            purpose: r.get(5)?,
            application_date: r.get(6)?,
            status: r.get(7)?,
            approval_date: r.get(8)?,
            collateral_amount: r.get(9)?,
            credit_score: r.get(10)?,
            monthly_payment: r.get(11)?,
        })
    }

    fn status(&self) -> CoreResult<LoanStatus> {
        LoanStatus::from_tag(&self.status).ok_or_else(|| {
            CoreError::RemoteUnavailable(format!("sandbox storage: bad status '{}'", self.status))
        })
    }

    fn total_repayable(&self) -> CoreResult<Decimal> {
        let monthly = stored_decimal(&self.monthly_payment, "monthly_payment")?;
        Ok(monthly
            .checked_mul(Decimal::from(self.term_months))
            .unwrap_or(Decimal::MAX))
    }

    fn to_wire(&self) -> CoreResult<Value> {
        let num =
            |s: &str, field: &str| stored_decimal(s, field).and_then(|d| float_arg(field, d));
        let collateral = self
            .collateral_amount
            .as_deref()
            .map(|s| num(s, "collateral_amount"))
            .transpose()?;
        Ok(json!({
            "id": self.id,
            "principal": self.principal,
            "amount": num(&self.amount, "amount")?,
            "term_months": self.term_months,
            "interest_rate": num(&self.interest_rate, "interest_rate")?,
            "purpose": tag_record(&self.purpose),
            "application_date": self.application_date,
            "status": tag_record(&self.status),
            "approval_date": encode_optional(self.approval_date.clone().map(Value::String)),
            "collateral_amount": encode_optional(collateral),
            "credit_score": encode_optional(self.credit_score.map(|c| json!(c))),
            "monthly_payment": num(&self.monthly_payment, "monthly_payment")?,
        }))
    }
}

struct StoredPayment {
    id: String,
    loan_id: String,
    principal: String,
    amount: String,
    timestamp: String,
    status: String,
}

impl StoredPayment {
    fn from_row(r: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: r.get(0)?,
            loan_id: r.get(1)?,
            principal: r.get(2)?,
            amount: r.get(3)?,
            timestamp: r.get(4)?,
            status: r.get(5)?,
        })
    }

    fn to_wire(&self) -> CoreResult<Value> {
        Ok(json!({
            "id": self.id,
            "loan_id": self.loan_id,
            "principal": self.principal,
            "amount": float_arg("amount", stored_decimal(&self.amount, "amount")?)?,
            "timestamp": self.timestamp,
            "status": tag_record(&self.status),
        }))
    }
}

impl Sandbox {
    pub fn open(path: &Path, caller: &str) -> Result<Self> {
        Ok(Self {
            conn: db::open_or_init(path)?,
            caller: caller.to_string(),
        })
    }

    pub fn in_memory(caller: &str) -> Result<Self> {
        Ok(Self {
            conn: db::open_in_memory()?,
            caller: caller.to_string(),
        })
    }

    pub fn from_config(cfg: &AppConfig) -> Result<Self> {
        let path = match &cfg.sandbox_db {
            Some(p) => p.clone(),
            None => db::sandbox_path()?,
        };
        debug!(path = %path.display(), caller = %cfg.caller, "opening sandbox");
        Self::open(&path, &cfg.caller)
    }

    pub fn caller(&self) -> &str {
        &self.caller
    }

    /// Act as a different identity for subsequent calls.
    pub fn set_caller(&mut self, caller: &str) {
        self.caller = caller.to_string();
    }

    pub fn set_token_balance(&self, principal: &str, tokens: Decimal) -> Result<()> {
        self.conn.execute(
            "INSERT INTO balances(principal, tokens) VALUES (?1, ?2)
             ON CONFLICT(principal) DO UPDATE SET tokens=excluded.tokens",
            params![principal, tokens.to_string()],
        )?;
        Ok(())
    }

    fn next_counter(&self, key: &str) -> CoreResult<u64> {
        let current: Option<String> = self
            .conn
            .query_row("SELECT value FROM settings WHERE key=?1", params![key], |r| r.get(0))
            .optional()
            .map_err(storage)?;
        let n = current.and_then(|s| s.parse::<u64>().ok()).unwrap_or(0);
        self.conn
            .execute(
                "INSERT INTO settings(key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value=excluded.value",
                params![key, (n + 1).to_string()],
            )
            .map_err(storage)?;
        Ok(n)
    }

    fn load_loan(&self, id: &str) -> CoreResult<Option<StoredLoan>> {
        let sql = format!("SELECT {LOAN_COLUMNS} FROM loans WHERE id=?1");
        self.conn
            .query_row(&sql, params![id], StoredLoan::from_row)
            .optional()
            .map_err(storage)
    }

    /// Move a loan along its lifecycle. Anything `can_transition_to`
    /// forbids is refused.
    fn transition(
        &self,
        method: &str,
        id: &str,
        from: LoanStatus,
        to: LoanStatus,
        approved_at: Option<Timestamp>,
    ) -> CoreResult<()> {
        if !from.can_transition_to(to) {
            return Err(CoreError::rejected(
                method,
                format!("Loan is {from}, it cannot become {to}"),
            ));
        }
        let updated = match approved_at {
            Some(ts) => self.conn.execute(
                "UPDATE loans SET status=?1, approval_date=?2 WHERE id=?3",
                params![to.tag(), ts.nanos().to_string(), id],
            ),
            None => self.conn.execute(
                "UPDATE loans SET status=?1 WHERE id=?2",
                params![to.tag(), id],
            ),
        };
        updated.map_err(storage)?;
        debug!(loan_id = id, %from, %to, "sandbox loan transition");
        Ok(())
    }

    fn apply_for_loan(&self, args: &[Value]) -> CoreResult<Value> {
        const M: &str = "apply_for_loan";
        let amount = decimal(arg(M, args, 0)?, "amount")?;
        let term: u32 = bounded(arg(M, args, 1)?, "term_months")?;
        let purpose: LoanPurpose = decode_variant(arg(M, args, 2)?)?;
        let monthly = compute_monthly_payment(amount, SANDBOX_RATE_PERCENT, term)
            .map_err(|e| CoreError::rejected(M, e.to_string()))?;

        let id = self.next_counter("loan_counter")?.to_string();
        let loan = StoredLoan {
            id: id.clone(),
            principal: self.caller.clone(),
            amount: amount.to_string(),
            term_months: term,
            interest_rate: SANDBOX_RATE_PERCENT.to_string(),
            purpose: purpose.tag().to_string(),
            application_date: Timestamp::now().nanos().to_string(),
            status: LoanStatus::Pending.tag().to_string(),
            approval_date: None,
            collateral_amount: None,
            credit_score: None,
            monthly_payment: monthly.to_string(),
        };
        self.conn
            .execute(
                &format!(
                    "INSERT INTO loans({LOAN_COLUMNS}) \
                     VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12)"
                ),
                params![
                    loan.id,
                    loan.principal,
                    loan.amount,
                    loan.term_months,
                    loan.interest_rate,
                    loan.purpose,
                    loan.application_date,
                    loan.status,
                    loan.approval_date,
                    loan.collateral_amount,
                    loan.credit_score,
                    loan.monthly_payment
                ],
            )
            .map_err(storage)?;
        info!(loan_id = %id, %amount, term, %purpose, "sandbox loan application recorded");
        loan.to_wire()
    }

    fn get_loans(&self) -> CoreResult<Value> {
        let sql = format!(
            "SELECT {LOAN_COLUMNS} FROM loans WHERE principal=?1 ORDER BY CAST(id AS INTEGER)"
        );
        let mut stmt = self.conn.prepare(&sql).map_err(storage)?;
        let rows = stmt
            .query_map(params![self.caller], StoredLoan::from_row)
            .map_err(storage)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row.map_err(storage)?.to_wire()?);
        }
        Ok(Value::Array(out))
    }

    fn get_loan_details(&self, args: &[Value]) -> CoreResult<Value> {
        let id = text(arg("get_loan_details", args, 0)?, "id")?;
        let found = self.load_loan(&id)?.map(|l| l.to_wire()).transpose()?;
        Ok(encode_optional(found))
    }

    fn decide(&self, method: &str, args: &[Value], approve: bool) -> CoreResult<Value> {
        let id = text(arg(method, args, 0)?, "id")?;
        let loan = self
            .load_loan(&id)?
            .ok_or_else(|| CoreError::rejected(method, "Loan not found"))?;
        let status = loan.status()?;
        let tx = self.conn.unchecked_transaction().map_err(storage)?;
        if approve {
            self.transition(method, &id, status, LoanStatus::Approved, Some(Timestamp::now()))?;
            // funds are disbursed on approval
            self.transition(method, &id, LoanStatus::Approved, LoanStatus::Active, None)?;
        } else {
            self.transition(method, &id, status, LoanStatus::Rejected, None)?;
        }
        tx.commit().map_err(storage)?;
        info!(loan_id = %id, approve, "sandbox loan decided");
        self.load_loan(&id)?
            .ok_or_else(|| CoreError::rejected(method, "Loan not found"))?
            .to_wire()
    }

    fn make_payment(&self, args: &[Value]) -> CoreResult<Value> {
        const M: &str = "make_payment";
        let loan_id = text(arg(M, args, 0)?, "loan_id")?;
        let amount = decimal(arg(M, args, 1)?, "amount")?;
        if amount <= Decimal::ZERO {
            return Err(CoreError::rejected(M, "Payment amount must be positive"));
        }

        let tx = self.conn.unchecked_transaction().map_err(storage)?;
        let loan = self
            .load_loan(&loan_id)?
            .ok_or_else(|| CoreError::rejected(M, "Loan not found"))?;
        if loan.status()? != LoanStatus::Active {
            return Err(CoreError::rejected(M, format!("Loan is {}, not Active", loan.status)));
        }

        let seq = self.next_counter("payment_counter")?;
        let payment = StoredPayment {
            id: format!("payment-{seq}"),
            loan_id: loan_id.clone(),
            principal: self.caller.clone(),
            amount: amount.to_string(),
            timestamp: Timestamp::now().nanos().to_string(),
            status: PaymentStatus::Completed.tag().to_string(),
        };
        self.conn
            .execute(
                "INSERT INTO payments(id, loan_id, principal, amount, timestamp, status)
                 VALUES (?1,?2,?3,?4,?5,?6)",
                params![
                    payment.id,
                    payment.loan_id,
                    payment.principal,
                    payment.amount,
                    payment.timestamp,
                    payment.status
                ],
            )
            .map_err(storage)?;

        let paid = self.completed_total(&loan_id)?;
        if paid >= loan.total_repayable()? {
            self.transition(M, &loan_id, LoanStatus::Active, LoanStatus::PaidOff, None)?;
            info!(loan_id = %loan_id, %paid, "sandbox loan paid off");
        }
        tx.commit().map_err(storage)?;
        payment.to_wire()
    }

    fn completed_total(&self, loan_id: &str) -> CoreResult<Decimal> {
        let mut stmt = self
            .conn
            .prepare("SELECT amount FROM payments WHERE loan_id=?1 AND status=?2")
            .map_err(storage)?;
        let rows = stmt
            .query_map(params![loan_id, PaymentStatus::Completed.tag()], |r| {
                r.get::<_, String>(0)
            })
            .map_err(storage)?;
        let mut total = Decimal::ZERO;
        for row in rows {
            let amount = stored_decimal(&row.map_err(storage)?, "amount")?;
            total = total.checked_add(amount).unwrap_or(Decimal::MAX);
        }
        Ok(total)
    }

    fn get_payments(&self, args: &[Value]) -> CoreResult<Value> {
        let loan_id = text(arg("get_payments", args, 0)?, "loan_id")?;
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, loan_id, principal, amount, timestamp, status
                 FROM payments WHERE loan_id=?1 ORDER BY seq",
            )
            .map_err(storage)?;
        let rows = stmt
            .query_map(params![loan_id], StoredPayment::from_row)
            .map_err(storage)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row.map_err(storage)?.to_wire()?);
        }
        Ok(Value::Array(out))
    }

    fn calculate_eligibility(&self) -> CoreResult<Value> {
        let tokens: Option<String> = self
            .conn
            .query_row(
                "SELECT tokens FROM balances WHERE principal=?1",
                params![self.caller],
                |r| r.get(0),
            )
            .optional()
            .map_err(storage)?;
        let tokens = match tokens {
            Some(s) => stored_decimal(&s, "tokens")?,
            None => DEFAULT_TOKEN_BALANCE,
        };
        float_arg("eligibility", tokens * ELIGIBILITY_MULTIPLIER)
    }
}

impl CanisterTransport for Sandbox {
    fn call(&self, canister: Canister, method: &str, args: Vec<Value>) -> CoreResult<Value> {
        if canister != Canister::Loans {
            return Err(CoreError::RemoteUnavailable(format!(
                "the sandbox only serves the loans canister, not {canister}"
            )));
        }
        debug!(method, caller = %self.caller, "sandbox call");
        match method {
            "apply_for_loan" => self.apply_for_loan(&args),
            "get_loans" => self.get_loans(),
            "get_loan_details" => self.get_loan_details(&args),
            "approve_loan" => self.decide(method, &args, true),
            "reject_loan" => self.decide(method, &args, false),
            "make_payment" => self.make_payment(&args),
            "get_payments" => self.get_payments(&args),
            "calculate_eligibility" => self.calculate_eligibility(),
            other => Err(CoreError::RemoteUnavailable(format!(
                "loans canister has no method '{other}'"
            ))),
        }
    }
}
