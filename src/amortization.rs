// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::prelude::*;
use rust_decimal::MathematicalOps;
use serde::Serialize;

use crate::error::{CoreError, CoreResult};

const MONTHS_PER_YEAR: u32 = 12;
const PERCENT: u32 = 100;
const CENTS: u32 = 2;

/// Longest term `LoanQuote::schedule` will lay out (100 years).
pub const MAX_SCHEDULE_MONTHS: u32 = 1200;

fn round_cents(d: Decimal) -> Decimal {
    d.round_dp_with_strategy(CENTS, RoundingStrategy::MidpointAwayFromZero)
}

fn validate(
    principal: Decimal,
    annual_rate_percent: Decimal,
    term_months: u32,
) -> CoreResult<()> {
    if principal <= Decimal::ZERO {
        return Err(CoreError::invalid(
            "principal",
            format!("must be positive, got {principal}"),
        ));
    }
    if term_months == 0 {
        return Err(CoreError::invalid("term_months", "must be at least 1"));
    }
    if annual_rate_percent < Decimal::ZERO {
        return Err(CoreError::invalid(
            "annual_rate_percent",
            format!("must not be negative, got {annual_rate_percent}"),
        ));
    }
    Ok(())
}

fn monthly_rate(annual_rate_percent: Decimal) -> Decimal {
    annual_rate_percent / Decimal::from(MONTHS_PER_YEAR) / Decimal::from(PERCENT)
}

/// Unrounded level payment of an amortizing loan.
///
/// A positive rate too small to survive the 28-digit decimal precision is
/// rejected rather than silently treated as interest-free.
pub fn exact_monthly_payment(
    principal: Decimal,
    annual_rate_percent: Decimal,
    term_months: u32,
) -> CoreResult<Decimal> {
    validate(principal, annual_rate_percent, term_months)?;
    let n = Decimal::from(term_months);
    if annual_rate_percent.is_zero() {
        return Ok(principal / n);
    }
    let r = monthly_rate(annual_rate_percent);
    let growth = (Decimal::ONE + r)
        .checked_powu(u64::from(term_months))
        .ok_or_else(|| {
            CoreError::invalid("term_months", "compounding factor exceeds decimal range")
        })?;
    let denom = growth - Decimal::ONE;
    if denom.is_zero() {
        return Err(below_precision(annual_rate_percent));
    }
    let payment = principal
        .checked_mul(r)
        .and_then(|x| x.checked_mul(growth))
        .and_then(|x| x.checked_div(denom))
        .ok_or_else(|| CoreError::invalid("principal", "payment exceeds decimal range"))?;
    // with a positive rate the loan must cost more than it lends
    match payment.checked_mul(n) {
        Some(total) if total > principal => Ok(payment),
        Some(_) => Err(below_precision(annual_rate_percent)),
        None => Err(CoreError::invalid("principal", "total repayment exceeds decimal range")),
    }
}

fn below_precision(annual_rate_percent: Decimal) -> CoreError {
    CoreError::invalid(
        "annual_rate_percent",
        format!("{annual_rate_percent} is below the precision of the payment formula"),
    )
}

/// Level monthly payment rounded to cents. This is the authoritative
/// figure; see [`compute_simple_preview`] for the advisory estimate.
///
/// A payment that would round to zero cents is refused: no loan is
/// quoted at less than one cent a month.
pub fn compute_monthly_payment(
    principal: Decimal,
    annual_rate_percent: Decimal,
    term_months: u32,
) -> CoreResult<Decimal> {
    let exact = exact_monthly_payment(principal, annual_rate_percent, term_months)?;
    let payment = round_cents(exact);
    if payment.is_zero() {
        return Err(CoreError::invalid(
            "term_months",
            format!("{principal} over {term_months} months is less than one cent a month"),
        ));
    }
    Ok(payment)
}

/// Flat-interest estimate shown before the service has quoted a rate.
/// Not compounding, never interchangeable with the amortized payment.
pub fn compute_simple_preview(
    amount: Decimal,
    term_months: u32,
    flat_annual_rate_percent: Decimal,
) -> CoreResult<Decimal> {
    validate(amount, flat_annual_rate_percent, term_months)?;
    let n = Decimal::from(term_months);
    amount
        .checked_mul(flat_annual_rate_percent)
        .and_then(|x| x.checked_mul(n))
        .map(|x| x / Decimal::from(MONTHS_PER_YEAR * PERCENT))
        .and_then(|interest| amount.checked_add(interest))
        .map(|total| round_cents(total / n))
        .ok_or_else(|| CoreError::invalid("amount", "preview exceeds decimal range"))
}

/// Pre-submit check of a requested amount against the ceiling returned by
/// `calculate_eligibility`.
pub fn check_requested_amount(amount: Decimal, ceiling: Decimal) -> CoreResult<()> {
    if amount <= Decimal::ZERO {
        return Err(CoreError::invalid("amount", "must be positive"));
    }
    if amount > ceiling {
        return Err(CoreError::invalid(
            "amount",
            format!("{amount} exceeds the eligibility limit of {}", round_cents(ceiling)),
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoanQuote {
    pub principal: Decimal,
    pub annual_rate_percent: Decimal,
    pub term_months: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Installment {
    pub period: u32,
    pub payment: Decimal,
    pub interest: Decimal,
    pub principal: Decimal,
    pub balance: Decimal,
}

impl LoanQuote {
    pub fn new(
        principal: Decimal,
        annual_rate_percent: Decimal,
        term_months: u32,
    ) -> CoreResult<Self> {
        validate(principal, annual_rate_percent, term_months)?;
        Ok(Self {
            principal,
            annual_rate_percent,
            term_months,
        })
    }

    pub fn monthly_payment(&self) -> CoreResult<Decimal> {
        compute_monthly_payment(self.principal, self.annual_rate_percent, self.term_months)
    }

    pub fn simple_preview(&self) -> CoreResult<Decimal> {
        compute_simple_preview(self.principal, self.term_months, self.annual_rate_percent)
    }

    /// Month-by-month breakdown in cents. Interest accrues on the running
    /// balance; the final installment settles whatever rounding left over.
    /// Terms above [`MAX_SCHEDULE_MONTHS`] are refused.
    pub fn schedule(&self) -> CoreResult<Vec<Installment>> {
        if self.term_months > MAX_SCHEDULE_MONTHS {
            return Err(CoreError::invalid(
                "term_months",
                format!(
                    "schedules are limited to {MAX_SCHEDULE_MONTHS} months, got {}",
                    self.term_months
                ),
            ));
        }
        let payment = self.monthly_payment()?;
        let r = monthly_rate(self.annual_rate_percent);
        let mut balance = self.principal;
        let mut rows = Vec::with_capacity(self.term_months as usize);
        for period in 1..=self.term_months {
            let interest = round_cents(balance * r);
            let last = period == self.term_months;
            let principal_part = if last {
                balance
            } else {
                (payment - interest).min(balance)
            };
            balance -= principal_part;
            rows.push(Installment {
                period,
                payment: principal_part + interest,
                interest,
                principal: principal_part,
                balance,
            });
        }
        Ok(rows)
    }

    /// Interest implied by paying the quoted payment every month, never
    /// negative. Independent of the schedule, so any term is accepted.
    pub fn total_interest(&self) -> CoreResult<Decimal> {
        let payment = self.monthly_payment()?;
        let paid = payment
            .checked_mul(Decimal::from(self.term_months))
            .ok_or_else(|| {
                CoreError::invalid("term_months", "total repayment exceeds decimal range")
            })?;
        Ok((paid - self.principal).max(Decimal::ZERO))
    }
}
